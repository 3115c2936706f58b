use serde::{Deserialize, Serialize};

/// A single multiple-choice question as stored in a bank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer_index
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options
            .get(self.correct_answer_index)
            .map(String::as_str)
    }

    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_bank_format_without_explanation() {
        let json = r#"{"question":"2+2?","options":["3","4"],"correctAnswerIndex":1}"#;
        let q: QuizQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.correct_option(), Some("4"));
        assert!(q.explanation.is_none());
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn option_out_of_range_is_none() {
        let q = QuizQuestion {
            question: "q".to_string(),
            options: vec!["a".to_string()],
            correct_answer_index: 0,
            explanation: None,
        };
        assert_eq!(q.option(3), None);
    }
}
