pub mod config;
pub mod flashcards;
pub mod review;

pub use config::Config;
