use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::question::QuizQuestion;
use crate::store::{KeyValueStore, clear_key, load_list, new_entry_id, save_list};

pub const HISTORY_KEY: &str = "error_history";
pub const MAX_ERROR_ENTRIES: usize = 100;

/// A question the player got wrong during a category session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEntry {
    pub id: String,
    pub question: QuizQuestion,
    pub category_title: String,
    pub date: DateTime<Utc>,
    /// `None` when the question timed out.
    pub user_answer_index: Option<usize>,
}

impl ErrorEntry {
    pub fn user_answer(&self) -> Option<&str> {
        self.user_answer_index
            .and_then(|i| self.question.option(i))
    }
}

/// Wrong-answer log, newest first, capped at [`MAX_ERROR_ENTRIES`].
#[derive(Clone)]
pub struct ErrorHistory {
    backend: Rc<dyn KeyValueStore>,
}

impl ErrorHistory {
    pub fn new(backend: Rc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn load(&self) -> Vec<ErrorEntry> {
        load_list(self.backend.as_ref(), HISTORY_KEY)
    }

    /// Record a miss. Returns false when the same question text is
    /// already recorded.
    pub fn add(
        &self,
        question: &QuizQuestion,
        category_title: &str,
        user_answer_index: Option<usize>,
    ) -> bool {
        let mut history = self.load();
        if history
            .iter()
            .any(|e| e.question.question == question.question)
        {
            return false;
        }

        history.insert(
            0,
            ErrorEntry {
                id: new_entry_id(),
                question: question.clone(),
                category_title: category_title.to_string(),
                date: Utc::now(),
                user_answer_index,
            },
        );
        history.truncate(MAX_ERROR_ENTRIES);

        save_list(self.backend.as_ref(), HISTORY_KEY, &history);
        true
    }

    pub fn remove(&self, id: &str) {
        let mut history = self.load();
        let before = history.len();
        history.retain(|e| e.id != id);
        if history.len() != before {
            save_list(self.backend.as_ref(), HISTORY_KEY, &history);
        }
    }

    pub fn clear(&self) {
        clear_key(self.backend.as_ref(), HISTORY_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn q(text: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec!["right".to_string(), "wrong".to_string()],
            correct_answer_index: 0,
            explanation: None,
        }
    }

    fn history() -> ErrorHistory {
        ErrorHistory::new(Rc::new(MemoryStore::new()))
    }

    #[test]
    fn add_twice_with_same_text_keeps_one_entry() {
        let h = history();
        assert!(h.add(&q("same"), "Math", Some(1)));
        assert!(!h.add(&q("same"), "Other", Some(1)));
        assert_eq!(h.load().len(), 1);
    }

    #[test]
    fn newest_entry_comes_first() {
        let h = history();
        h.add(&q("first"), "Math", Some(1));
        h.add(&q("second"), "Math", None);
        let entries = h.load();
        assert_eq!(entries[0].question.question, "second");
        assert_eq!(entries[1].question.question, "first");
        assert_eq!(entries[0].user_answer(), None);
        assert_eq!(entries[1].user_answer(), Some("wrong"));
    }

    #[test]
    fn capped_at_most_recent_hundred() {
        let h = history();
        for i in 0..130 {
            h.add(&q(&format!("q{i}")), "Math", Some(1));
            assert!(h.load().len() <= MAX_ERROR_ENTRIES);
        }
        let entries = h.load();
        assert_eq!(entries.len(), MAX_ERROR_ENTRIES);
        assert_eq!(entries[0].question.question, "q129");
        assert_eq!(entries[99].question.question, "q30");
    }

    #[test]
    fn remove_by_id_and_absent_id_is_noop() {
        let h = history();
        h.add(&q("a"), "Math", Some(1));
        h.add(&q("b"), "Math", Some(1));
        let id = h.load()[1].id.clone();
        h.remove(&id);
        h.remove("missing");
        let entries = h.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question.question, "b");
    }

    #[test]
    fn clear_empties_store() {
        let h = history();
        h.add(&q("a"), "Math", Some(1));
        h.clear();
        assert!(h.load().is_empty());
    }

    #[test]
    fn corrupt_blob_reads_as_empty_and_recovers_on_add() {
        let backend = Rc::new(MemoryStore::new());
        backend.write(HISTORY_KEY, "[{\"id\":").unwrap();
        let h = ErrorHistory::new(backend);
        assert!(h.load().is_empty());
        h.add(&q("a"), "Math", Some(1));
        assert_eq!(h.load().len(), 1);
    }

    #[test]
    fn serialized_with_camel_case_fields() {
        let backend = Rc::new(MemoryStore::new());
        let h = ErrorHistory::new(backend.clone());
        h.add(&q("a"), "Math", Some(1));
        let raw = backend.read(HISTORY_KEY).unwrap();
        assert!(raw.contains("\"categoryTitle\":\"Math\""));
        assert!(raw.contains("\"userAnswerIndex\":1"));
        assert!(raw.contains("\"correctAnswerIndex\":0"));
    }
}
