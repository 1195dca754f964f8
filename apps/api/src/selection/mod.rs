//! Selection state machine: a pure reducer over the per-session aggregate
//! (genre, mood, level, recommendations).
//!
//! All side effects (network I/O, error surfacing) live in the `recommend`
//! controller; `reduce` is deterministic and side-effect free so the
//! invariants are testable in isolation.

pub mod options;

use serde::Serialize;

use crate::llm_client::Candidate;

/// The per-session aggregate. Empty strings mean "unselected";
/// `recommendations` holds the candidates of the most recently completed
/// request, verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionState {
    pub genre: String,
    pub mood: String,
    pub level: String,
    pub recommendations: Vec<Candidate>,
}

/// The only mutations the aggregate admits. The enum is closed, so there is
/// no "unrecognized action" arm to handle at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetGenre(String),
    SetMood(String),
    SetLevel(String),
    SetRecommendations(Vec<Candidate>),
}

/// Applies one action. Invariant: changing the genre always resets the mood,
/// because mood options are genre-dependent and a stale mood must never show
/// as selected.
pub fn reduce(state: SelectionState, action: Action) -> SelectionState {
    match action {
        Action::SetGenre(genre) => SelectionState {
            genre,
            mood: String::new(),
            ..state
        },
        Action::SetMood(mood) => SelectionState { mood, ..state },
        Action::SetLevel(level) => SelectionState { level, ..state },
        Action::SetRecommendations(recommendations) => SelectionState {
            recommendations,
            ..state
        },
    }
}

impl SelectionState {
    /// All three facets set; the request controller's precondition.
    pub fn is_complete(&self) -> bool {
        !self.genre.is_empty() && !self.mood.is_empty() && !self.level.is_empty()
    }

    /// Mood options for the current genre, recomputed from the static table
    /// on every call rather than stored, so they can never diverge from
    /// `genre`.
    pub fn available_moods(&self) -> &'static [&'static str] {
        options::moods_for(&self.genre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{Candidate, CandidateContent, CandidatePart};

    fn candidate(text: &str) -> Candidate {
        Candidate {
            content: Some(CandidateContent {
                parts: vec![CandidatePart {
                    text: Some(text.to_string()),
                }],
            }),
        }
    }

    #[test]
    fn test_set_genre_resets_mood() {
        let state = SelectionState {
            genre: "Fiction".to_string(),
            mood: "Happy".to_string(),
            ..Default::default()
        };
        let state = reduce(state, Action::SetGenre("Mystery".to_string()));
        assert_eq!(state.genre, "Mystery");
        assert_eq!(state.mood, "");
    }

    #[test]
    fn test_reselecting_same_genre_still_resets_mood() {
        let state = SelectionState {
            genre: "Fiction".to_string(),
            mood: "Happy".to_string(),
            ..Default::default()
        };
        let state = reduce(state, Action::SetGenre("Fiction".to_string()));
        assert_eq!(state.genre, "Fiction");
        assert_eq!(state.mood, "");
    }

    #[test]
    fn test_set_genre_preserves_level_and_recommendations() {
        let state = SelectionState {
            genre: "Fiction".to_string(),
            mood: "Happy".to_string(),
            level: "Expert".to_string(),
            recommendations: vec![candidate("Dune")],
        };
        let state = reduce(state, Action::SetGenre("Fantasy".to_string()));
        assert_eq!(state.level, "Expert");
        assert_eq!(state.recommendations, vec![candidate("Dune")]);
    }

    #[test]
    fn test_set_mood_is_idempotent() {
        let state = SelectionState {
            genre: "Fiction".to_string(),
            ..Default::default()
        };
        let once = reduce(state, Action::SetMood("Happy".to_string()));
        let twice = reduce(once.clone(), Action::SetMood("Happy".to_string()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_set_level() {
        let state = reduce(
            SelectionState::default(),
            Action::SetLevel("Beginner".to_string()),
        );
        assert_eq!(state.level, "Beginner");
        assert_eq!(state.genre, "");
        assert_eq!(state.mood, "");
    }

    #[test]
    fn test_set_recommendations_replaces_previous() {
        let state = SelectionState {
            recommendations: vec![candidate("old")],
            ..Default::default()
        };
        let state = reduce(
            state,
            Action::SetRecommendations(vec![candidate("a"), candidate("b")]),
        );
        assert_eq!(state.recommendations, vec![candidate("a"), candidate("b")]);
    }

    #[test]
    fn test_is_complete_requires_all_three_facets() {
        let mut state = SelectionState::default();
        assert!(!state.is_complete());
        state = reduce(state, Action::SetGenre("Fiction".to_string()));
        assert!(!state.is_complete());
        state = reduce(state, Action::SetMood("Happy".to_string()));
        assert!(!state.is_complete());
        state = reduce(state, Action::SetLevel("Beginner".to_string()));
        assert!(state.is_complete());
    }

    #[test]
    fn test_available_moods_track_current_genre() {
        let mut state = SelectionState::default();
        assert!(state.available_moods().is_empty());

        state = reduce(state, Action::SetGenre("Fiction".to_string()));
        assert_eq!(state.available_moods(), options::moods_for("Fiction"));

        state = reduce(state, Action::SetGenre("Underwater Basket Weaving".to_string()));
        assert!(state.available_moods().is_empty());
    }
}
