//! Key-info extraction: cheap per-message signals (question, topics, sentiment)
//! used to steer reply generation.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters of the body considered for topic mining.
pub const TOPIC_SCAN_CHARS: usize = 10_000;
/// Distinct keys retained by the topic counter.
pub const TOPIC_COUNTER_CAPACITY: usize = 100;
pub const MAX_TOPICS: usize = 5;
/// Tokens at or below this length are never topics.
const MIN_TOPIC_TOKEN_CHARS: usize = 4;

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "being", "below", "between", "could",
    "doing", "during", "every", "having", "hello", "there", "their", "these", "those",
    "through", "under", "until", "where", "which", "while", "would", "should", "other",
    "thanks", "thank", "regards", "please", "really", "since", "still", "might", "before",
    "because", "whether", "within", "without", "shall", "first", "today", "tomorrow",
];

const POSITIVE_CUES: &[&str] = &[
    "thanks", "thank", "great", "appreciate", "appreciated", "excellent", "happy", "glad",
    "wonderful", "love", "pleased", "awesome", "perfect", "excited", "good", "nice",
];

const NEGATIVE_CUES: &[&str] = &[
    "sorry", "unfortunately", "problem", "issue", "issues", "concern", "concerned",
    "disappointed", "delay", "delayed", "wrong", "error", "failed", "frustrated",
    "complaint", "urgent", "broken", "bad",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    pub has_question: bool,
    pub topics: Vec<String>,
    pub sentiment: Sentiment,
}

/// Frequency table holding at most `capacity` distinct keys.
///
/// Inserting a new key into a full table first evicts the key with the lowest
/// count; among equal counts the earliest-inserted key goes. Ranking orders by
/// count descending, then insertion order.
#[derive(Debug, Clone)]
pub struct BoundedCounter {
    capacity: usize,
    counts: HashMap<String, (u32, u64)>,
    // (count, insertion sequence, key); the first element is the eviction victim.
    order: BTreeSet<(u32, u64, String)>,
    next_seq: u64,
}

impl BoundedCounter {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            counts: HashMap::new(),
            order: BTreeSet::new(),
            next_seq: 0,
        }
    }

    pub fn add(&mut self, key: &str) {
        if self.capacity == 0 {
            return;
        }
        if let Some((count, seq)) = self.counts.get_mut(key) {
            self.order.remove(&(*count, *seq, key.to_string()));
            *count += 1;
            self.order.insert((*count, *seq, key.to_string()));
            return;
        }
        if self.counts.len() >= self.capacity {
            if let Some(victim) = self.order.pop_first() {
                self.counts.remove(&victim.2);
            }
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.counts.insert(key.to_string(), (1, seq));
        self.order.insert((1, seq, key.to_string()));
    }

    /// Keys ordered by count descending, ties by insertion order.
    pub fn ranked(&self) -> Vec<(String, u32)> {
        let mut entries: Vec<(&String, u32, u64)> = self
            .counts
            .iter()
            .map(|(k, (c, s))| (k, *c, *s))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        entries
            .into_iter()
            .map(|(k, c, _)| (k.clone(), c))
            .collect()
    }

    pub fn top(&self, n: usize) -> Vec<String> {
        self.ranked().into_iter().take(n).map(|(k, _)| k).collect()
    }
}

fn re_interrogative() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?im)^\s*(what|when|where|who|whom|whose|why|how|which|can|could|would|will|should|shall|is|are|do|does|did|may)\b",
        )
        .unwrap()
    })
}

fn re_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z0-9]+(?:'[a-z]+)?").unwrap())
}

/// Lowercased word tokens of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    re_word()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn has_question(body: &str) -> bool {
    body.contains('?') || re_interrogative().is_match(body)
}

/// Feeds topic candidates from `body` into `counter`.
pub fn count_topics(body: &str, counter: &mut BoundedCounter) {
    let scanned: String = body.chars().take(TOPIC_SCAN_CHARS).collect();
    for token in tokenize(&scanned) {
        if token.chars().count() <= MIN_TOPIC_TOKEN_CHARS || STOP_WORDS.contains(&token.as_str()) {
            continue;
        }
        counter.add(&token);
    }
}

pub fn extract_topics(body: &str) -> Vec<String> {
    let mut counter = BoundedCounter::new(TOPIC_COUNTER_CAPACITY);
    count_topics(body, &mut counter);
    counter.top(MAX_TOPICS)
}

pub fn detect_sentiment(body: &str) -> Sentiment {
    let tokens = tokenize(body);
    let positive = tokens
        .iter()
        .filter(|t| POSITIVE_CUES.contains(&t.as_str()))
        .count();
    let negative = tokens
        .iter()
        .filter(|t| NEGATIVE_CUES.contains(&t.as_str()))
        .count();

    if positive > negative * 2 {
        Sentiment::Positive
    } else if negative > positive * 2 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn extract_key_info(body: &str) -> KeyInfo {
    KeyInfo {
        has_question: has_question(body),
        topics: extract_topics(body),
        sentiment: detect_sentiment(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::cleaner::{BodyCleaner, DefaultBodyCleaner};

    impl BoundedCounter {
        fn len(&self) -> usize {
            self.counts.len()
        }

        fn count(&self, key: &str) -> u32 {
            self.counts.get(key).map_or(0, |(c, _)| *c)
        }
    }

    #[test]
    fn test_question_mark_detected() {
        assert!(has_question("We ship Friday, right?"));
    }

    #[test]
    fn test_interrogative_line_start_detected() {
        assert!(has_question("Hi Sam,\nCould you send the deck over"));
        assert!(has_question("WHEN is the review"));
    }

    #[test]
    fn test_statement_is_not_question() {
        assert!(!has_question("The deck is attached. Whenever works for you."));
    }

    #[test]
    fn test_topics_skip_short_and_stop_words() {
        let topics = extract_topics("the budget budget budget about about roadmap and plan");
        assert_eq!(topics, vec!["budget", "roadmap"]);
    }

    #[test]
    fn test_topics_ordered_by_frequency_then_first_seen() {
        let topics = extract_topics("alpha1 bravo2 bravo2 charlie delta5 echoes foxtrot");
        assert_eq!(topics[0], "bravo2");
        assert_eq!(topics[1..], ["alpha1", "charlie", "delta5", "echoes"]);
    }

    #[test]
    fn test_topics_never_exceed_five() {
        let body = (0..200)
            .map(|i| format!("token{i:03}"))
            .collect::<Vec<_>>()
            .join(" ");
        assert!(extract_topics(&body).len() <= MAX_TOPICS);
        assert!(extract_topics("").is_empty());
    }

    #[test]
    fn test_counter_evicts_lowest_then_oldest() {
        let mut counter = BoundedCounter::new(3);
        counter.add("a");
        counter.add("a");
        counter.add("b");
        counter.add("c");
        // full: a=2, b=1, c=1 → inserting d evicts b (lowest, oldest)
        counter.add("d");
        assert_eq!(counter.len(), 3);
        assert_eq!(counter.count("b"), 0);
        assert_eq!(counter.count("c"), 1);
        assert_eq!(counter.top(3), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_counter_caps_distinct_keys() {
        let mut counter = BoundedCounter::new(TOPIC_COUNTER_CAPACITY);
        for i in 0..250 {
            counter.add(&format!("key{i}"));
        }
        assert_eq!(counter.len(), TOPIC_COUNTER_CAPACITY);
    }

    #[test]
    fn test_sentiment_positive() {
        assert_eq!(
            detect_sentiment("Thanks so much, this is great work!"),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_sentiment_negative() {
        assert_eq!(
            detect_sentiment("Unfortunately the build failed again. Sorry about the delay."),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_sentiment_mixed_is_neutral() {
        assert_eq!(
            detect_sentiment("Thanks for the report. Sorry about the issue."),
            Sentiment::Neutral
        );
        assert_eq!(detect_sentiment("See attached."), Sentiment::Neutral);
    }

    #[test]
    fn test_key_info_idempotent_on_cleaned_text() {
        let raw = "Hi team,\n\nWhat is the status of the migration?   The migration window closes Friday.\n> old quote";
        let once = DefaultBodyCleaner.clean(raw);
        let twice = DefaultBodyCleaner.clean(&once);
        assert_eq!(extract_key_info(&once), extract_key_info(&twice));
        assert_eq!(extract_key_info(&once), extract_key_info(&once));
    }
}
