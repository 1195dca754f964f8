//! Static option data: the genre list, the genre→moods table, and the fixed
//! level list. Read-only collaborators of the state machine; the core only
//! consumes them as slices.

pub const GENRES: &[&str] = &[
    "Fiction",
    "Mystery",
    "Fantasy",
    "Science Fiction",
    "Romance",
    "History",
    "Self-Help",
];

pub const LEVELS: &[&str] = &["Beginner", "Intermediate", "Expert"];

/// Moods available for a genre. Genres absent from the table yield an empty
/// set; the state machine never stores this, it is recomputed on every read.
pub fn moods_for(genre: &str) -> &'static [&'static str] {
    match genre {
        "Fiction" => &["Happy", "Melancholic", "Adventurous", "Reflective"],
        "Mystery" => &["Tense", "Curious", "Dark"],
        "Fantasy" => &["Epic", "Whimsical", "Dark", "Hopeful"],
        "Science Fiction" => &["Curious", "Dystopian", "Optimistic"],
        "Romance" => &["Happy", "Heartbroken", "Dreamy"],
        "History" => &["Curious", "Reflective", "Inspired"],
        "Self-Help" => &["Motivated", "Stuck", "Anxious"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_genre_has_moods() {
        for genre in GENRES {
            assert!(
                !moods_for(genre).is_empty(),
                "genre '{genre}' has no moods in the table"
            );
        }
    }

    #[test]
    fn test_unknown_genre_has_empty_mood_set() {
        assert!(moods_for("Cooking").is_empty());
        assert!(moods_for("").is_empty());
    }

    #[test]
    fn test_genres_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for genre in GENRES {
            assert!(seen.insert(*genre), "duplicate genre '{genre}'");
        }
    }
}
