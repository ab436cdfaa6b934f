//! Question corpus loading.
//!
//! The corpus is a JSON array of question records, validated once at process
//! start. Entries that fail to parse (unknown question kinds, missing
//! fields) are skipped with a warning rather than failing the whole load, so
//! a partially updated corpus file still yields a playable pool.

use crate::types::Question;
use std::path::Path;

/// Load questions from a JSON file.
///
/// Returns an empty vec if the file is missing or unreadable; the registry
/// simply cannot start sessions until a non-empty pool exists.
pub fn load_questions(path: &Path) -> Vec<Question> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            tracing::error!("Failed to read question corpus {}: {}", path.display(), err);
            return Vec::new();
        }
    };

    let entries: Vec<serde_json::Value> = match serde_json::from_str(&data) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::error!("Question corpus {} is not a JSON array: {}", path.display(), err);
            return Vec::new();
        }
    };

    let total = entries.len();
    let questions: Vec<Question> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();

    let skipped = total - questions.len();
    if skipped > 0 {
        tracing::warn!(
            "Skipped {} unsupported or malformed corpus entries out of {}",
            skipped,
            total
        );
    }
    tracing::info!("Loaded {} questions from {}", questions.len(), path.display());

    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionKind;
    use std::io::Write;

    fn write_corpus(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_supported_questions() {
        let file = write_corpus(
            r#"[
                {"type": "mc", "prompt": "Capital of France?", "correct_answer": "Paris",
                 "distractors": ["Lyon", "Marseille"], "difficulty": 1},
                {"type": "tf", "prompt": "The sky is green.", "correct_answer": "False",
                 "difficulty": 1, "reference": "common knowledge"}
            ]"#,
        );

        let questions = load_questions(file.path());
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].kind, QuestionKind::MultipleChoice);
        assert_eq!(questions[1].kind, QuestionKind::TrueFalse);
        assert!(questions[1].distractors.is_empty());
        assert_eq!(questions[1].reference.as_deref(), Some("common knowledge"));
    }

    #[test]
    fn skips_unknown_kinds_and_malformed_entries() {
        let file = write_corpus(
            r#"[
                {"type": "essay", "prompt": "Discuss.", "correct_answer": "n/a", "difficulty": 3},
                {"type": "mc", "prompt": "2+2?", "correct_answer": "4",
                 "distractors": ["3", "5"], "difficulty": 1},
                {"prompt": "no type at all"}
            ]"#,
        );

        let questions = load_questions(file.path());
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt, "2+2?");
    }

    #[test]
    fn missing_file_yields_empty_pool() {
        let questions = load_questions(Path::new("/nonexistent/questions.json"));
        assert!(questions.is_empty());
    }
}
