pub mod parser;
pub mod registration;
pub mod update;
