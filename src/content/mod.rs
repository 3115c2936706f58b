pub mod banks;
pub mod category;
pub mod loader;
pub mod question;

pub use question::QuizQuestion;
