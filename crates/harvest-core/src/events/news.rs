//! News Log
//!
//! Bounded, most-recent-first log of everything that happened outside the
//! event slot, plus the flavor lines published on quiet days.

use std::collections::VecDeque;

use harvest_events::{NewsEntry, NewsKind, Sentiment};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bounded news log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsLog {
    entries: VecDeque<NewsEntry>,
    capacity: usize,
}

impl NewsLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Adds an entry at the front, dropping the oldest beyond capacity.
    pub fn push(&mut self, entry: NewsEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn record(&mut self, day: u32, kind: NewsKind, text: impl Into<String>) {
        self.push(NewsEntry::new(day, kind, text));
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &NewsEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&NewsEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<NewsEntry> {
        self.entries.iter().cloned().collect()
    }
}

const STABLE_LINES: &[&str] = &[
    "The granary bells ring on time. Nobody remembers the last shortage.",
    "Children play in the square while the carts come in full.",
    "A traveling merchant praises the village's well-kept stores.",
];

const FEAR_LINES: &[&str] = &[
    "Queues form outside the granary before dawn.",
    "Neighbors count each other's sacks a little too carefully.",
    "The baker quietly raises prices again.",
];

const FURY_LINES: &[&str] = &[
    "Someone painted THIEVES across the granary door overnight.",
    "A shouting match in the market ends with a broken stall.",
    "Petitions against the hoarders circulate by candlelight.",
];

const ANARCHY_LINES: &[&str] = &[
    "The granary stands open and empty. Nobody guards it anymore.",
    "Smoke rises over the fields; every family fends for itself.",
    "The council hall is dark. Rumors are the only currency left.",
];

/// Picks a flavor line matching the public mood.
pub fn flavor_line<R: Rng>(sentiment: Sentiment, rng: &mut R) -> &'static str {
    let lines = match sentiment {
        Sentiment::Stable => STABLE_LINES,
        Sentiment::Fear => FEAR_LINES,
        Sentiment::Fury => FURY_LINES,
        Sentiment::Anarchy => ANARCHY_LINES,
    };
    lines.choose(rng).copied().unwrap_or("The day passes quietly.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_news_is_most_recent_first() {
        let mut log = NewsLog::new(10);
        log.record(1, NewsKind::Session, "first");
        log.record(2, NewsKind::Flavor, "second");

        let texts: Vec<&str> = log.entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert_eq!(log.latest().unwrap().day, 2);
    }

    #[test]
    fn test_news_is_bounded() {
        let mut log = NewsLog::new(3);
        for day in 1..=5 {
            log.record(day, NewsKind::Flavor, format!("day {}", day));
        }

        assert_eq!(log.len(), 3);
        let days: Vec<u32> = log.entries().map(|e| e.day).collect();
        assert_eq!(days, vec![5, 4, 3]);
    }

    #[test]
    fn test_replayed_log_matches_recorded_order() {
        let recorded = harvest_events::fixtures::sample_news();

        let mut log = NewsLog::new(50);
        for entry in recorded.iter().rev() {
            log.push(entry.clone());
        }
        assert_eq!(log.to_vec(), recorded);

        let mut short = NewsLog::new(3);
        for entry in recorded.iter().rev() {
            short.push(entry.clone());
        }
        assert_eq!(short.to_vec(), recorded[..3].to_vec());
        assert_eq!(short.latest().map(|e| e.kind), Some(NewsKind::Trial));
    }

    #[test]
    fn test_flavor_line_matches_sentiment() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..10 {
            assert!(ANARCHY_LINES.contains(&flavor_line(Sentiment::Anarchy, &mut rng)));
            assert!(STABLE_LINES.contains(&flavor_line(Sentiment::Stable, &mut rng)));
        }
    }
}
