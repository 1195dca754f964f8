//! Recommendation request controller.
//!
//! Owns the per-session aggregate behind a lock and implements the request
//! lifecycle: validate readiness, build the prompt, perform the single
//! outbound call through `RecommendationSource`, and reconcile the outcome
//! back into the state machine via `SetRecommendations`.
//!
//! Re-entrancy policy (explicit, not accidental):
//! - a trigger while a request for the *same* (genre, mood, level) key is in
//!   flight joins it — no second network call;
//! - a trigger for a *different* key supersedes: the session epoch is bumped
//!   and the stale request's write is discarded when it resolves, so the
//!   last-initiated request wins.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::RecommendationSource;
use crate::selection::{reduce, Action, SelectionState};

/// Notification shown when a trigger fires with facets still unselected.
pub const INCOMPLETE_SELECTION_MESSAGE: &str = "Please select all options first";

/// The prompt sent to the model. Facets are embedded verbatim.
pub fn build_prompt(level: &str, genre: &str, mood: &str) -> String {
    format!("Recommend 6 books for a {level} {genre} reader feeling {mood}. Return the list clearly.")
}

/// The facet tuple a request was issued for. Two triggers with equal keys are
/// the same logical request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectionKey {
    genre: String,
    mood: String,
    level: String,
}

impl SelectionKey {
    fn of(selection: &SelectionState) -> Self {
        SelectionKey {
            genre: selection.genre.clone(),
            mood: selection.mood.clone(),
            level: selection.level.clone(),
        }
    }
}

/// How a trigger resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The call completed and its candidates were written.
    Updated(usize),
    /// An identical request was already in flight; no second call was made.
    Joined,
    /// A newer request started while this one was in flight; its result was
    /// discarded.
    Superseded,
}

#[derive(Default)]
struct SessionInner {
    selection: SelectionState,
    /// Key of the request currently in flight, if any.
    in_flight: Option<SelectionKey>,
    /// Bumped on every issued request; a resolving request whose epoch is no
    /// longer current has been superseded.
    epoch: u64,
}

/// One user session: the selection aggregate plus request-lifecycle
/// bookkeeping. Mutated only through `dispatch` and `refresh`.
#[derive(Default)]
pub struct Session {
    inner: Mutex<SessionInner>,
}

impl Session {
    /// Applies a reducer action and returns the resulting state.
    pub async fn dispatch(&self, action: Action) -> SelectionState {
        let mut inner = self.inner.lock().await;
        let current = std::mem::take(&mut inner.selection);
        inner.selection = reduce(current, action);
        inner.selection.clone()
    }

    pub async fn snapshot(&self) -> SelectionState {
        self.inner.lock().await.selection.clone()
    }

    /// The single controller function behind both the manual trigger and the
    /// automatic on-completion trigger.
    ///
    /// A failed call (remote error payload, transport failure, undecodable
    /// body) resets `recommendations` to empty and returns the error so the
    /// caller can surface it; the session is back to idle either way. While
    /// the call is in flight the previous recommendations stay visible.
    pub async fn refresh(
        &self,
        source: &dyn RecommendationSource,
    ) -> Result<FetchOutcome, AppError> {
        let (my_epoch, prompt) = {
            let mut inner = self.inner.lock().await;
            if !inner.selection.is_complete() {
                return Err(AppError::Validation(INCOMPLETE_SELECTION_MESSAGE.to_string()));
            }
            let key = SelectionKey::of(&inner.selection);
            if inner.in_flight.as_ref() == Some(&key) {
                return Ok(FetchOutcome::Joined);
            }
            inner.epoch += 1;
            inner.in_flight = Some(key);
            let prompt = build_prompt(
                &inner.selection.level,
                &inner.selection.genre,
                &inner.selection.mood,
            );
            (inner.epoch, prompt)
        };

        let result = source.generate(&prompt).await;

        let mut inner = self.inner.lock().await;
        if inner.epoch != my_epoch {
            // A newer request owns the in-flight slot; drop this write.
            return Ok(FetchOutcome::Superseded);
        }
        inner.in_flight = None;

        match result {
            Ok(candidates) => {
                let count = candidates.len();
                let current = std::mem::take(&mut inner.selection);
                inner.selection = reduce(current, Action::SetRecommendations(candidates));
                Ok(FetchOutcome::Updated(count))
            }
            Err(err) => {
                warn!("recommendation fetch failed: {err}");
                let current = std::mem::take(&mut inner.selection);
                inner.selection = reduce(current, Action::SetRecommendations(Vec::new()));
                Err(err.into())
            }
        }
    }
}

/// In-memory session registry. Nothing survives a restart.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
}

impl SessionStore {
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Session::default()));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }
}
