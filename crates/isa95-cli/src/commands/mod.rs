pub mod attach;
pub mod check_subtype;
pub mod levels;
pub mod types;
