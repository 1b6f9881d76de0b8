//! Flashcards and their review schedule
//!
//! This module provides:
//! - Card and deck models, with cards held in an arena addressed by handle
//! - Deck file parsing and writing
//! - The interval scheduler and leech accounting

pub mod algorithm;
pub mod models;
pub mod storage;

pub use algorithm::{grade, is_due, Grading, Outcome};
pub use models::*;
pub use storage::{CardStore, StoreError};
