//! Interval scheduling
//!
//! Each card carries one interval, `due_at - created_at`. Passing a card
//! multiplies it by the growth rate, failing multiplies it by the shrink rate
//! (never below the minimum increase). Cards whose interval is still under
//! the minimum are reviewed again in the same session until it clears.
//!
//! Failing a card whose interval is already past the leech age counts as a
//! leech. A card with `max_leeches` leeches is no longer reviewed.

use crate::config::{Anchor, SchedulerConfig};

use super::models::Card;

/// Grading outcome reported by the reviewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

/// What `grade` did to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grading {
    /// The schedule moved; `requeue` asks for another look this session
    Rescheduled { requeue: bool },
    /// Already rescheduled this session, nothing changed
    Skipped,
}

impl Grading {
    pub fn requeue(self) -> bool {
        matches!(self, Grading::Rescheduled { requeue: true })
    }
}

/// Check if the card should be reviewed at `now`
pub fn is_due(card: &Card, now: i64, config: &SchedulerConfig) -> bool {
    if card.leech_count >= config.max_leeches {
        return false;
    }

    card.due_at <= now
}

/// Apply a grading outcome to a card
pub fn grade(card: &mut Card, outcome: Outcome, now: i64, config: &SchedulerConfig) -> Grading {
    let interval = card.interval();
    if interval < 0 {
        log::warn!("card id: {}: malformed review time (interval {}s)", card.id, interval);
    }

    // A pass after an earlier reschedule this session must not bump the card twice
    if card.rescheduled_this_pass && outcome != Outcome::Fail {
        log::debug!("card id: {}: already rescheduled, skipping", card.id);
        return Grading::Skipped;
    }

    let requeue = match outcome {
        Outcome::Pass => {
            if interval.saturating_add(config.rounding_slack) < config.minimum_increase {
                card.due_at = match config.anchor {
                    Anchor::Created => now.saturating_add(config.minimum_increase),
                    Anchor::Due => card.due_at.saturating_add(config.minimum_increase),
                };
                true
            } else {
                let grown = scale(interval, config.growth_rate);
                card.due_at = reanchor(card, grown, config.anchor);
                false
            }
        }
        Outcome::Fail => {
            if interval > config.leech_age && !card.rescheduled_this_pass {
                card.leech_count = card.leech_count.saturating_add(1);
                log::debug!("card id: {}: leech count now {}", card.id, card.leech_count);
            }
            let shrunk = scale(interval, config.shrink_rate).max(config.minimum_increase);
            card.due_at = reanchor(card, shrunk, config.anchor);
            true
        }
    };

    card.rescheduled_this_pass = true;
    log::debug!(
        "card id: {}: {:?}, interval {} -> {}",
        card.id,
        outcome,
        format_interval(interval),
        format_interval(card.interval())
    );

    Grading::Rescheduled { requeue }
}

/// `as` saturates at the i64 bounds, so huge rates pin the interval there
fn scale(interval: i64, rate: f64) -> i64 {
    (interval as f64 * rate).round() as i64
}

fn reanchor(card: &Card, interval: i64, anchor: Anchor) -> i64 {
    match anchor {
        Anchor::Created => card.created_at.saturating_add(interval),
        Anchor::Due => card.due_at.saturating_add(interval),
    }
}

/// Format an interval in seconds to a short human-readable string
pub fn format_interval(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();

    if seconds < 60 {
        format!("{}{}s", sign, seconds)
    } else if seconds < 3600 {
        format!("{}{}m", sign, seconds / 60)
    } else if seconds < 86400 {
        format!("{}{}h", sign, seconds / 3600)
    } else if seconds < 30 * 86400 {
        format!("{}{}d", sign, seconds / 86400)
    } else if seconds < 365 * 86400 {
        format!("{}{}mo", sign, seconds / (30 * 86400))
    } else {
        format!("{}{}y", sign, seconds / (365 * 86400))
    }
}
