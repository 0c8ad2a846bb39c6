//! Style signal extraction: mines greetings, closings, sentence starters,
//! formality and punctuation habits from messages the user wrote.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::models::email::EmailMessage;
use crate::models::style::{
    EmailLength, StyleCaps, StyleSignals, WritingStyle, DEFAULT_AVERAGE_SENTENCE_LENGTH,
    DEFAULT_CLOSINGS, DEFAULT_GREETINGS, DEFAULT_PUNCTUATION_STYLE, FORMALITY_CASUAL,
    FORMALITY_FORMAL, FORMALITY_NEUTRAL,
};
use crate::style::merge::priority_merge;
use crate::thread::cleaner::BodyCleaner;
use crate::thread::key_info::{count_topics, tokenize, BoundedCounter, TOPIC_COUNTER_CAPACITY};

/// Non-empty lines at the top of a body searched for a greeting.
const GREETING_REGION_LINES: usize = 3;
/// Lines at the bottom of a body searched for a closing.
const CLOSING_REGION_LINES: usize = 5;
/// Words taken from the start of a fragment to form a sentence starter.
const STARTER_WORDS: usize = 3;
const MIN_STARTER_CHARS: usize = 8;
/// A starter must recur this often to count as a habit.
pub const MIN_PATTERN_FREQUENCY: u32 = 2;
const MAX_SENTENCE_PATTERNS: usize = 10;
const PHRASE_COUNTER_CAPACITY: usize = 1000;

const FORMAL_INDICATORS: &[&str] = &[
    "dear",
    "sincerely",
    "regards",
    "furthermore",
    "therefore",
    "however",
    "kindly",
    "respectfully",
    "accordingly",
    "hereby",
    "pleased",
    "appreciate",
];

const CASUAL_INDICATORS: &[&str] = &[
    "hey", "cheers", "gonna", "wanna", "yeah", "yep", "cool", "awesome", "btw", "lol", "thx",
    "guys", "hiya", "ok", "okay",
];

const EXCLAMATION_RATIO_THRESHOLD: f64 = 0.1;
const DASH_RATIO_THRESHOLD: f64 = 0.1;

fn re_greeting() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?im)^\s*(good morning|good afternoon|good evening|hi there|hello|hiya|hi|hey|dear|greetings|morning)\b",
        )
        .unwrap()
    })
}

fn re_closing() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(best regards|kind regards|warm regards|warmest regards|regards|best wishes|all the best|best|many thanks|thanks again|thank you|thanks|cheers|sincerely|yours truly|talk soon|take care)[,.!]*$",
        )
        .unwrap()
    })
}

fn re_fragment_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?…]+|\n").unwrap())
}

/// First greeting found in the opening lines, as written.
pub fn find_greeting(body: &str) -> Option<String> {
    let region = body
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(GREETING_REGION_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    re_greeting()
        .captures(&region)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Closing phrase found scanning the last lines bottom-up; stops at the first hit.
pub fn find_closing(body: &str) -> Option<String> {
    let lines: Vec<&str> = body.lines().filter(|l| !l.trim().is_empty()).collect();
    lines
        .iter()
        .rev()
        .take(CLOSING_REGION_LINES)
        .find_map(|line| {
            re_closing()
                .captures(line.trim())
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
}

/// Sentence-like fragments split on terminal punctuation and line breaks.
pub fn sentence_fragments(text: &str) -> Vec<&str> {
    re_fragment_boundary()
        .split(text)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect()
}

fn sentence_starter(fragment: &str) -> Option<String> {
    let words: Vec<&str> = fragment.split_whitespace().collect();
    if words.len() < STARTER_WORDS {
        return None;
    }
    let starter = words[..STARTER_WORDS]
        .iter()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    (starter.chars().count() >= MIN_STARTER_CHARS).then_some(starter)
}

/// Level from indicator counts: one side must outweigh the other more than twofold.
pub fn classify_formality(text: &str) -> u8 {
    let tokens = tokenize(text);
    let formal = tokens
        .iter()
        .filter(|t| FORMAL_INDICATORS.contains(&t.as_str()))
        .count();
    let casual = tokens
        .iter()
        .filter(|t| CASUAL_INDICATORS.contains(&t.as_str()))
        .count();

    if casual > formal * 2 {
        FORMALITY_CASUAL
    } else if formal > casual * 2 {
        FORMALITY_FORMAL
    } else {
        FORMALITY_NEUTRAL
    }
}

/// Returns `None` when there is no sentence to measure against.
pub fn classify_punctuation(text: &str) -> Option<String> {
    let sentences = sentence_fragments(text).len();
    if sentences == 0 {
        return None;
    }
    let sentences = sentences as f64;
    let exclamations = text.matches('!').count() as f64;
    let dashes = (text.matches(" - ").count()
        + text.matches('—').count()
        + text.matches('–').count()) as f64;

    let style = if exclamations / sentences > EXCLAMATION_RATIO_THRESHOLD {
        "enthusiastic"
    } else if text.contains("...") || text.contains('…') {
        "casual"
    } else if dashes / sentences > DASH_RATIO_THRESHOLD {
        "detailed"
    } else {
        DEFAULT_PUNCTUATION_STYLE
    };
    Some(style.to_string())
}

/// Aggregates style signals across authored messages.
pub fn extract_style_signals(
    messages: &[EmailMessage],
    cleaner: &dyn BodyCleaner,
) -> StyleSignals {
    if messages.is_empty() {
        return StyleSignals::default();
    }

    let mut greetings = BoundedCounter::new(PHRASE_COUNTER_CAPACITY);
    let mut closings = BoundedCounter::new(PHRASE_COUNTER_CAPACITY);
    let mut starters = BoundedCounter::new(PHRASE_COUNTER_CAPACITY);
    let mut corpus = String::new();

    for message in messages {
        let body = cleaner.clean(&message.body);
        if let Some(greeting) = find_greeting(&body) {
            greetings.add(&greeting);
        }
        if let Some(closing) = find_closing(&body) {
            closings.add(&closing);
        }
        for fragment in sentence_fragments(&body) {
            if let Some(starter) = sentence_starter(fragment) {
                starters.add(&starter);
            }
        }
        corpus.push_str(&body);
        corpus.push('\n');
    }

    let sentence_patterns: Vec<String> = starters
        .ranked()
        .into_iter()
        .filter(|(_, count)| *count >= MIN_PATTERN_FREQUENCY)
        .take(MAX_SENTENCE_PATTERNS)
        .map(|(starter, _)| starter)
        .collect();

    let signals = StyleSignals {
        greetings: greetings.top(PHRASE_COUNTER_CAPACITY),
        closings: closings.top(PHRASE_COUNTER_CAPACITY),
        sentence_patterns,
        formality_level: Some(classify_formality(&corpus)),
        punctuation_style: classify_punctuation(&corpus),
    };
    debug!(
        "Extracted style signals from {} messages: {} greetings, {} closings, {} patterns",
        messages.len(),
        signals.greetings.len(),
        signals.closings.len(),
        signals.sentence_patterns.len()
    );
    signals
}

/// Full re-analysis: builds a fresh `WritingStyle` from authored messages
/// instead of folding signals into an existing one.
pub fn analyze_style(
    messages: &[EmailMessage],
    cleaner: &dyn BodyCleaner,
    caps: StyleCaps,
) -> WritingStyle {
    let signals = extract_style_signals(messages, cleaner);

    let mut topics = BoundedCounter::new(TOPIC_COUNTER_CAPACITY);
    let mut total_words = 0usize;
    let mut total_fragments = 0usize;
    for message in messages {
        let body = cleaner.clean(&message.body);
        count_topics(&body, &mut topics);
        let fragments = sentence_fragments(&body);
        total_fragments += fragments.len();
        total_words += fragments
            .iter()
            .map(|f| f.split_whitespace().count())
            .sum::<usize>();
    }

    let average_sentence_length = if total_fragments == 0 {
        DEFAULT_AVERAGE_SENTENCE_LENGTH
    } else {
        (total_words as f64 / total_fragments as f64).round() as u32
    };

    let email_length = if messages.is_empty() {
        EmailLength::Medium
    } else {
        let words_per_message = total_words as f64 / messages.len() as f64;
        if words_per_message < 50.0 {
            EmailLength::Short
        } else if words_per_message < 150.0 {
            EmailLength::Medium
        } else {
            EmailLength::Long
        }
    };

    let or_defaults = |observed: &[String], defaults: &[&str], cap: usize| {
        if observed.is_empty() {
            let defaults: Vec<String> = defaults.iter().map(|s| s.to_string()).collect();
            priority_merge(&defaults, &[], cap)
        } else {
            priority_merge(observed, &[], cap)
        }
    };

    WritingStyle {
        greetings: or_defaults(&signals.greetings, DEFAULT_GREETINGS, caps.greetings),
        closings: or_defaults(&signals.closings, DEFAULT_CLOSINGS, caps.closings),
        sentence_patterns: priority_merge(&signals.sentence_patterns, &[], caps.sentence_patterns),
        vocabulary: topics.top(caps.vocabulary),
        formality_level: signals.formality_level.unwrap_or(FORMALITY_NEUTRAL),
        average_sentence_length,
        email_length,
        punctuation_style: signals
            .punctuation_style
            .unwrap_or_else(|| DEFAULT_PUNCTUATION_STYLE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::cleaner::DefaultBodyCleaner;
    use chrono::{TimeZone, Utc};

    fn authored(body: &str) -> EmailMessage {
        EmailMessage {
            from: "jane@example.com".to_string(),
            to: "sam@example.com".to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_greeting_found_in_first_lines_only() {
        assert_eq!(find_greeting("Hey Sam,\nquick one."), Some("Hey".to_string()));
        assert_eq!(
            find_greeting("Good morning all,\nUpdate below."),
            Some("Good morning".to_string())
        );
        assert_eq!(find_greeting("a\nb\nc\nHello there"), None);
    }

    #[test]
    fn test_greeting_requires_word_boundary() {
        assert_eq!(find_greeting("History of the project follows."), None);
    }

    #[test]
    fn test_closing_scan_is_bottom_up() {
        let body = "Thanks for the note.\nLet's sync.\n\nCheers,\nJane";
        assert_eq!(find_closing(body), Some("Cheers".to_string()));
    }

    #[test]
    fn test_closing_outside_last_lines_ignored() {
        let body = "Best,\n1\n2\n3\n4\n5";
        assert_eq!(find_closing(body), None);
    }

    #[test]
    fn test_formality_thresholds() {
        assert_eq!(classify_formality("hey guys, gonna be late lol"), FORMALITY_CASUAL);
        assert_eq!(
            classify_formality("Dear Mr. Smith, kindly review. Sincerely"),
            FORMALITY_FORMAL
        );
        assert_eq!(classify_formality("hey, kindly review"), FORMALITY_NEUTRAL);
        assert_eq!(classify_formality("see attached"), FORMALITY_NEUTRAL);
    }

    #[test]
    fn test_punctuation_styles() {
        assert_eq!(
            classify_punctuation("Great news! Love it! Shipping today."),
            Some("enthusiastic".to_string())
        );
        assert_eq!(
            classify_punctuation("Well... not sure yet. Let me check. I will reply. Soon. Ok. Fine. Yes. No. Maybe. Later."),
            Some("casual".to_string())
        );
        assert_eq!(
            classify_punctuation("The plan - phase one - starts Monday."),
            Some("detailed".to_string())
        );
        assert_eq!(
            classify_punctuation("The plan starts Monday."),
            Some("standard".to_string())
        );
        assert_eq!(classify_punctuation("   "), None);
    }

    #[test]
    fn test_sentence_patterns_need_min_frequency() {
        let messages = vec![
            authored("Hi Sam,\nI wanted to check on the invoice. Let me know.\nBest,\nJane"),
            authored("Hello Ana,\nI wanted to follow up on the contract.\nThanks,\nJane"),
            authored("Hi Bo,\nJust a quick note about lunch.\nBest,\nJane"),
        ];
        let signals = extract_style_signals(&messages, &DefaultBodyCleaner);
        assert_eq!(signals.sentence_patterns, vec!["i wanted to"]);
        assert_eq!(signals.greetings, vec!["Hi", "Hello"]);
        assert_eq!(signals.closings, vec!["Best", "Thanks"]);
        assert!(signals.formality_level.is_some());
    }

    #[test]
    fn test_no_messages_yields_empty_signals() {
        let signals = extract_style_signals(&[], &DefaultBodyCleaner);
        assert_eq!(signals, StyleSignals::default());
        assert!(signals.formality_level.is_none());
    }

    #[test]
    fn test_analyze_style_measures_lengths() {
        let messages = vec![
            authored("Hey Sam,\nSounds good to me.\nCheers,\nJane"),
            authored("Hey Ana,\nWorks for me too.\nCheers,\nJane"),
        ];
        let style = analyze_style(&messages, &DefaultBodyCleaner, StyleCaps::default());
        assert_eq!(style.greetings, vec!["Hey"]);
        assert_eq!(style.closings, vec!["Cheers"]);
        assert_eq!(style.email_length, EmailLength::Short);
        // 16 words over 8 fragments
        assert_eq!(style.average_sentence_length, 2);
        assert_eq!(style.formality_level, FORMALITY_CASUAL);
    }

    #[test]
    fn test_analyze_style_without_messages_keeps_defaults() {
        let style = analyze_style(&[], &DefaultBodyCleaner, StyleCaps::default());
        assert_eq!(style, WritingStyle::default());
    }
}
