//! Interactive review
//!
//! Builds the queue of due cards and runs the prompt / reply loop against an
//! answer channel.

pub mod channel;
pub mod progress;
pub mod queue;
pub mod session;

pub use channel::{AnswerChannel, FifoChannel, InProcessChannel, Reply};
pub use progress::SessionProgress;
pub use queue::{count_due, ReviewQueue};
pub use session::{ReviewSession, SessionEnd};
