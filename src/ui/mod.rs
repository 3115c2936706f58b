pub mod components;
pub mod layout;
pub mod name_input;
pub mod theme;
