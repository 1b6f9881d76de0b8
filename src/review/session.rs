//! Review session
//!
//! Owns the card store and the queue for one run. `run` prompts for each
//! queued card on `out`, waits for a reply, grades, and requeues as needed.
//! The caller saves the store afterwards however the loop ended.

use std::io::{self, Write};
use std::sync::Arc;

use rand::rngs::StdRng;

use crate::config::SchedulerConfig;
use crate::flashcards::algorithm::grade;
use crate::flashcards::storage::DELIM;
use crate::flashcards::CardStore;

use super::channel::{AnswerChannel, Reply};
use super::progress::SessionProgress;
use super::queue::ReviewQueue;

/// Why the review loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Every queued card was reviewed
    Finished,
    /// The reviewer sent `quit`
    Quit,
    /// The answer channel went away
    ChannelClosed,
}

pub struct ReviewSession {
    store: CardStore,
    queue: ReviewQueue,
    progress: Arc<SessionProgress>,
    config: SchedulerConfig,
    /// Session clock, fixed when the session starts
    now: i64,
}

impl ReviewSession {
    /// Queue every card due at `now` and shuffle the queue
    pub fn new(store: CardStore, config: SchedulerConfig, now: i64, rng: StdRng) -> Self {
        let mut queue = ReviewQueue::build(&store, now, &config, rng);
        queue.shuffle();
        let progress = Arc::new(SessionProgress::new(queue.len()));

        Self {
            store,
            queue,
            progress,
            config,
            now,
        }
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    pub fn into_store(self) -> CardStore {
        self.store
    }

    pub fn queue(&self) -> &ReviewQueue {
        &self.queue
    }

    /// Shared handle for progress reporting
    pub fn progress(&self) -> Arc<SessionProgress> {
        Arc::clone(&self.progress)
    }

    /// Drive the queue until it is exhausted, the reviewer quits, or the
    /// channel closes. Fails only if a prompt can't be written.
    pub fn run<C, W>(&mut self, channel: &mut C, out: &mut W) -> io::Result<SessionEnd>
    where
        C: AnswerChannel + ?Sized,
        W: Write + ?Sized,
    {
        while let Some(handle) = self.queue.current() {
            let card = self.store.get(handle);
            let deck = self
                .store
                .deck(card.deck)
                .map_or_else(|| card.deck.to_string(), |d| d.identifier());
            writeln!(out, "{}{}{}", deck, DELIM, card.id)?;
            out.flush()?;

            let reply = channel.receive_next();
            match reply {
                Reply::Closed => {
                    log::info!("Answer channel closed, ending session");
                    return Ok(SessionEnd::ChannelClosed);
                }
                Reply::Quit => {
                    log::info!("Reviewer quit with {} cards left", self.queue.remaining());
                    return Ok(SessionEnd::Quit);
                }
                _ => {}
            }

            match reply.outcome() {
                Some(outcome) => {
                    let card = self.store.get_mut(handle);
                    if grade(card, outcome, self.now, &self.config).requeue() {
                        self.queue.requeue(handle);
                        self.progress.record_requeue();
                    }
                }
                None => log::debug!("Ignoring reply {:?}", reply),
            }

            self.progress.record_review();
            self.queue.advance();
        }

        Ok(SessionEnd::Finished)
    }
}
