use std::collections::HashMap;

use rust_embed::Embed;
use thiserror::Error;

use crate::content::question::QuizQuestion;

#[derive(Embed)]
#[folder = "assets/banks/"]
struct BankAssets;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("no question bank for category '{0}'")]
    Missing(String),
    #[error("question bank '{id}' is malformed: {source}")]
    Malformed {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolves a category id to its full question bank.
pub trait QuestionBanks {
    fn fetch(&self, category_id: &str) -> Result<Vec<QuizQuestion>, BankError>;
}

/// Banks compiled into the binary, one `<category id>.json` file each.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedBanks;

impl EmbeddedBanks {
    pub fn available() -> Vec<String> {
        BankAssets::iter()
            .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
            .collect()
    }
}

impl QuestionBanks for EmbeddedBanks {
    fn fetch(&self, category_id: &str) -> Result<Vec<QuizQuestion>, BankError> {
        let file = BankAssets::get(&format!("{category_id}.json"))
            .ok_or_else(|| BankError::Missing(category_id.to_string()))?;
        serde_json::from_slice(file.data.as_ref()).map_err(|source| BankError::Malformed {
            id: category_id.to_string(),
            source,
        })
    }
}

/// In-memory banks keyed by category id.
#[derive(Clone, Debug, Default)]
pub struct StaticBanks {
    banks: HashMap<String, Vec<QuizQuestion>>,
}

impl StaticBanks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bank(mut self, category_id: &str, questions: Vec<QuizQuestion>) -> Self {
        self.banks.insert(category_id.to_string(), questions);
        self
    }
}

impl QuestionBanks for StaticBanks {
    fn fetch(&self, category_id: &str) -> Result<Vec<QuizQuestion>, BankError> {
        self.banks
            .get(category_id)
            .cloned()
            .ok_or_else(|| BankError::Missing(category_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::category::CATEGORIES;

    #[test]
    fn embedded_general_bank_parses() {
        let bank = EmbeddedBanks.fetch("general").unwrap();
        assert!(!bank.is_empty());
        for q in &bank {
            assert!(
                q.correct_answer_index < q.options.len(),
                "bad answer index in: {}",
                q.question
            );
        }
    }

    #[test]
    fn every_embedded_bank_belongs_to_a_category() {
        for name in EmbeddedBanks::available() {
            assert!(
                CATEGORIES.iter().any(|c| c.id == name),
                "orphan bank file {name}.json"
            );
        }
    }

    #[test]
    fn every_embedded_bank_is_well_formed() {
        for name in EmbeddedBanks::available() {
            let bank = EmbeddedBanks.fetch(&name).unwrap();
            for q in &bank {
                assert!(q.options.len() >= 2, "{name}: too few options");
                assert!(q.correct_answer_index < q.options.len(), "{name}: {}", q.question);
            }
        }
    }

    #[test]
    fn missing_bank_is_reported() {
        assert!(matches!(
            EmbeddedBanks.fetch("does_not_exist"),
            Err(BankError::Missing(_))
        ));
    }
}
