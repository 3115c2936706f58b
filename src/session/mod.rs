pub mod game;
pub mod result;
pub mod timer;

pub use game::{QuizSession, SessionSource};
