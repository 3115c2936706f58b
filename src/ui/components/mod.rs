pub mod category_menu;
pub mod confirm_dialog;
pub mod error_history;
pub mod leaderboard;
pub mod progress_bar;
pub mod question_card;
pub mod result_card;
