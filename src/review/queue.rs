//! Review queue
//!
//! An ordered list of card handles with a cursor. Cards that must be seen
//! again are appended, and the part of the queue not yet reached is
//! reshuffled so repeats don't all bunch up at the end.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::SchedulerConfig;
use crate::flashcards::algorithm::is_due;
use crate::flashcards::{CardHandle, CardStore};

#[derive(Debug)]
pub struct ReviewQueue {
    entries: Vec<CardHandle>,
    /// Index of the entry currently being reviewed
    cursor: usize,
    rng: StdRng,
}

impl ReviewQueue {
    /// Collect every due card in store order
    pub fn build(store: &CardStore, now: i64, config: &SchedulerConfig, rng: StdRng) -> Self {
        let entries = store
            .iter()
            .filter(|(_, card)| is_due(card, now, config))
            .map(|(handle, _)| handle)
            .collect();

        Self {
            entries,
            cursor: 0,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CardHandle] {
        &self.entries
    }

    /// Current entry, or None once the queue is exhausted
    pub fn current(&self) -> Option<CardHandle> {
        self.entries.get(self.cursor).copied()
    }

    pub fn advance(&mut self) {
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
    }

    /// Entries not yet reached, including the current one
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }

    /// Shuffle the whole queue in place
    pub fn shuffle(&mut self) {
        shuffle_from(&mut self.entries, 0, &mut self.rng);
    }

    /// Append a card for another look this session. The entries after the
    /// current one, not counting the new one, are reshuffled.
    pub fn requeue(&mut self, handle: CardHandle) {
        let start = (self.cursor + 1).min(self.entries.len());
        shuffle_from(&mut self.entries, start, &mut self.rng);
        self.entries.push(handle);
    }
}

/// Swap each position `i >= start` with a uniformly chosen position in `[i, n)`.
/// `SliceRandom::shuffle` walks from the back, so a seed would give a
/// different order than this forward walk.
fn shuffle_from<T>(items: &mut [T], start: usize, rng: &mut StdRng) {
    let n = items.len();
    if n <= start + 1 {
        return;
    }

    for i in start..n {
        let j = rng.gen_range(i..n);
        items.swap(i, j);
    }
}

/// Number of cards due at `now`. Never modifies the store.
pub fn count_due(store: &CardStore, now: i64, config: &SchedulerConfig) -> usize {
    store
        .iter()
        .filter(|(_, card)| is_due(card, now, config))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::Card;
    use rand::SeedableRng;

    const NOW: i64 = 1_700_000_000;

    fn store_with_due(n: u64) -> CardStore {
        let mut store = CardStore::new();
        store.add_deck("deck.tsv".into());
        for id in 0..n {
            store.add_card(Card::new(id, 0, NOW - 1000, NOW - 10));
        }
        store
    }

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn sorted(handles: &[CardHandle]) -> Vec<CardHandle> {
        let mut v = handles.to_vec();
        v.sort();
        v
    }

    #[test]
    fn test_build_selects_due_cards_in_order() {
        let config = SchedulerConfig::default();
        let mut store = CardStore::new();
        store.add_deck("deck.tsv".into());
        let due = store.add_card(Card::new(1, 0, NOW - 100, NOW - 1));
        store.add_card(Card::new(2, 0, NOW - 100, NOW + 1));
        let mut leech = Card::new(3, 0, NOW - 100, NOW - 1);
        leech.leech_count = config.max_leeches;
        store.add_card(leech);
        let also_due = store.add_card(Card::new(4, 0, NOW - 100, NOW));

        let queue = ReviewQueue::build(&store, NOW, &config, seeded(1));

        assert_eq!(queue.entries(), &[due, also_due]);
        assert_eq!(count_due(&store, NOW, &config), 2);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let config = SchedulerConfig::default();
        let store = store_with_due(20);
        let mut queue = ReviewQueue::build(&store, NOW, &config, seeded(7));
        let before = queue.entries().to_vec();

        queue.shuffle();

        assert_eq!(sorted(queue.entries()), before);
    }

    #[test]
    fn test_shuffle_same_seed_same_order() {
        let config = SchedulerConfig::default();
        let store = store_with_due(20);
        let mut a = ReviewQueue::build(&store, NOW, &config, seeded(42));
        let mut b = ReviewQueue::build(&store, NOW, &config, seeded(42));

        a.shuffle();
        b.shuffle();

        assert_eq!(a.entries(), b.entries());
    }

    #[test]
    fn test_requeue_appends_and_keeps_reviewed_prefix() {
        let config = SchedulerConfig::default();
        let store = store_with_due(10);
        let mut queue = ReviewQueue::build(&store, NOW, &config, seeded(3));
        queue.shuffle();
        queue.advance();
        queue.advance();
        let before = queue.entries().to_vec();
        let current = queue.current().unwrap();

        queue.requeue(current);

        assert_eq!(queue.len(), 11);
        assert_eq!(&queue.entries()[..3], &before[..3]);
        assert_eq!(queue.entries()[10], current);
        assert_eq!(sorted(&queue.entries()[3..10]), sorted(&before[3..]));
    }

    #[test]
    fn test_requeue_on_last_entry() {
        let config = SchedulerConfig::default();
        let store = store_with_due(1);
        let mut queue = ReviewQueue::build(&store, NOW, &config, seeded(3));
        let only = queue.current().unwrap();

        queue.requeue(only);
        queue.advance();

        assert_eq!(queue.current(), Some(only));
        assert_eq!(queue.remaining(), 1);
        queue.advance();
        assert_eq!(queue.current(), None);
    }

    #[test]
    fn test_empty_queue() {
        let config = SchedulerConfig::default();
        let mut queue = ReviewQueue::build(&CardStore::new(), NOW, &config, seeded(0));

        queue.shuffle();

        assert!(queue.is_empty());
        assert_eq!(queue.current(), None);
    }
}
