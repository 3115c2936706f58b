use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::content::banks::{BankError, QuestionBanks};
use crate::content::category;
use crate::content::question::QuizQuestion;

pub const DEFAULT_QUESTION_COUNT: usize = 9;
pub const FALLBACK_CATEGORY: &str = "general";

/// Shuffled copy of `items`. The source slice is shared between sessions
/// and is never reordered.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    // Unbiased Fisher-Yates.
    copy.shuffle(rng);
    copy
}

pub struct QuestionLoader<B: QuestionBanks> {
    banks: B,
    delay: Duration,
}

impl<B: QuestionBanks> QuestionLoader<B> {
    pub fn new(banks: B, delay: Duration) -> Self {
        Self { banks, delay }
    }

    /// Full bank for `category_id`, falling back to the general bank when the
    /// id is unknown or its bank cannot be read.
    pub fn raw_questions(&self, category_id: &str) -> Vec<QuizQuestion> {
        if category::find(category_id).is_none() {
            log::warn!("Unknown category '{category_id}', using {FALLBACK_CATEGORY}");
            return self.fallback();
        }

        match self.banks.fetch(category_id) {
            Ok(questions) => questions,
            Err(BankError::Missing(_)) => {
                log::warn!("No question bank for '{category_id}' yet, using {FALLBACK_CATEGORY}");
                self.fallback()
            }
            Err(e) => {
                log::error!("Failed to load questions for '{category_id}': {e}");
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> Vec<QuizQuestion> {
        match self.banks.fetch(FALLBACK_CATEGORY) {
            Ok(questions) => questions,
            Err(e) => {
                log::error!("Fallback bank unavailable: {e}");
                Vec::new()
            }
        }
    }

    /// Up to `count` questions drawn uniformly from the category's bank.
    pub fn load_game_questions<R: Rng + ?Sized>(
        &self,
        category_id: &str,
        count: usize,
        rng: &mut R,
    ) -> Vec<QuizQuestion> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let all = self.raw_questions(category_id);
        if all.is_empty() {
            return Vec::new();
        }

        let mut questions = shuffled(&all, rng);
        questions.truncate(count);
        questions
    }
}

/// A load running on a background thread. Poll with [`PendingLoad::try_take`].
pub struct PendingLoad {
    rx: mpsc::Receiver<Vec<QuizQuestion>>,
    category_id: String,
}

impl PendingLoad {
    pub fn spawn<B>(loader: QuestionLoader<B>, category_id: &str, count: usize) -> Self
    where
        B: QuestionBanks + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let id = category_id.to_string();

        thread::spawn(move || {
            let mut rng = SmallRng::from_entropy();
            let questions = loader.load_game_questions(&id, count, &mut rng);
            // Receiver may already be gone if the user left the loading screen.
            let _ = tx.send(questions);
        });

        Self {
            rx,
            category_id: category_id.to_string(),
        }
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    /// Returns the loaded questions once available. A loader thread that died
    /// without answering yields an empty set.
    pub fn try_take(&self) -> Option<Vec<QuizQuestion>> {
        match self.rx.try_recv() {
            Ok(questions) => Some(questions),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                log::error!("Question loader for '{}' stopped unexpectedly", self.category_id);
                Some(Vec::new())
            }
        }
    }
}
