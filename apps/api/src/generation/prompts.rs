//! Reply prompt synthesis: renders the instruction string handed to the model.
//!
//! `build_reply_prompt` is a pure function of its inputs: same context, style,
//! settings and key info always produce byte-identical output.

use crate::models::email::EmailContext;
use crate::models::settings::ReplySettings;
use crate::models::style::{
    WritingStyle, FORMALITY_CASUAL, FORMALITY_FORMAL, FORMALITY_VERY_CASUAL,
    FORMALITY_VERY_FORMAL,
};
use crate::thread::key_info::{KeyInfo, Sentiment};

/// Prior messages shown to the model, counted from the most recent.
pub const PROMPT_PRIOR_MESSAGES: usize = 3;
/// Characters kept from each prior message body in the prompt.
pub const PROMPT_PRIOR_BODY_CHARS: usize = 200;

pub const REPLY_PREAMBLE: &str = "You are an email assistant drafting a reply on behalf of the user. \
Write in the user's own voice so the reply reads as if they wrote it themselves.";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Fixed mapping from the requested length to a directive.
pub fn length_directive(response_length: &str) -> &'static str {
    match response_length {
        "short" => "brief (1-3 sentences)",
        "medium" => "moderate (3-5 sentences)",
        "long" => "detailed (1-2 paragraphs)",
        _ => "moderate",
    }
}

pub fn formality_directive(level: u8) -> &'static str {
    match level {
        FORMALITY_VERY_CASUAL => "very casual and relaxed",
        FORMALITY_CASUAL => "casual and friendly",
        FORMALITY_FORMAL => "formal and professional",
        FORMALITY_VERY_FORMAL => "very formal and polished",
        _ => "balanced, neither stiff nor overly casual",
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

fn or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none observed)".to_string()
    } else {
        values.join(", ")
    }
}

/// Renders the reply-generation prompt.
pub fn build_reply_prompt(
    context: &EmailContext,
    style: &WritingStyle,
    settings: &ReplySettings,
    key_info: Option<&KeyInfo>,
) -> String {
    let mut lines: Vec<String> = vec![REPLY_PREAMBLE.to_string(), String::new()];

    lines.push("WRITING STYLE:".to_string());
    lines.push(format!("- Greetings: {}", or_none(&style.greetings)));
    lines.push(format!("- Closings: {}", or_none(&style.closings)));
    if !style.sentence_patterns.is_empty() {
        lines.push(format!(
            "- Typical sentence openings: {}",
            style.sentence_patterns.join(", ")
        ));
    }
    lines.push(format!("- Formality level: {}/5", style.formality_level));
    lines.push(format!(
        "- Average sentence length: {} words",
        style.average_sentence_length
    ));
    lines.push(format!("- Typical email length: {}", style.email_length.as_str()));
    lines.push(format!("- Punctuation style: {}", style.punctuation_style));
    lines.push(String::new());

    lines.push("EMAIL TO REPLY TO:".to_string());
    lines.push(format!("From: {}", context.from));
    lines.push(format!("To: {}", context.to));
    lines.push(format!("Subject: {}", context.subject));
    lines.push(format!("Date: {}", context.date.format(DATE_FORMAT)));
    lines.push(String::new());
    lines.push(context.body.clone());
    lines.push(String::new());

    if context.is_reply && !context.previous_messages.is_empty() {
        lines.push("EARLIER IN THIS THREAD:".to_string());
        let skip = context
            .previous_messages
            .len()
            .saturating_sub(PROMPT_PRIOR_MESSAGES);
        for message in context.previous_messages.iter().skip(skip) {
            lines.push(format!(
                "From {} on {}:",
                message.from,
                message.date.format(DATE_FORMAT)
            ));
            lines.push(truncate_chars(&message.body, PROMPT_PRIOR_BODY_CHARS));
            lines.push(String::new());
        }
    }

    lines.push("INSTRUCTIONS:".to_string());
    lines.push(format!(
        "- Length: {}",
        length_directive(&settings.response_length)
    ));
    lines.push(format!(
        "- Tone: {}",
        formality_directive(settings.formality_level)
    ));

    if let Some(info) = key_info {
        if info.has_question {
            lines.push("- The email asks a question; answer it directly.".to_string());
        }
        if !info.topics.is_empty() {
            lines.push(format!("- Key topics: {}", info.topics.join(", ")));
        }
        match info.sentiment {
            Sentiment::Negative => lines.push(
                "- The sender sounds concerned; acknowledge it before anything else.".to_string(),
            ),
            Sentiment::Positive => {
                lines.push("- The sender sounds positive; match their warmth.".to_string())
            }
            Sentiment::Neutral => {}
        }
    }

    if let Some(custom) = settings
        .custom_instructions
        .as_deref()
        .filter(|c| !c.trim().is_empty())
    {
        lines.push(format!("- Additional instructions: {custom}"));
    }
    lines.push("- Do not add a signature; it is appended separately.".to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::email::EmailMessage;
    use chrono::{TimeZone, Utc};

    fn prior(i: u32, body: &str) -> EmailMessage {
        EmailMessage {
            from: format!("p{i}@example.com"),
            to: "jane@example.com".to_string(),
            date: Utc.with_ymd_and_hms(2024, 2, 1, 9, i, 0).unwrap(),
            body: body.to_string(),
        }
    }

    fn context(previous: Vec<EmailMessage>) -> EmailContext {
        EmailContext {
            thread_id: "t1".to_string(),
            message_id: "m9".to_string(),
            from: "sam@example.com".to_string(),
            to: "jane@example.com".to_string(),
            subject: "Budget review".to_string(),
            body: "Can you send the numbers by Friday?".to_string(),
            date: Utc.with_ymd_and_hms(2024, 2, 2, 14, 5, 0).unwrap(),
            is_reply: !previous.is_empty(),
            previous_messages: previous,
        }
    }

    #[test]
    fn test_length_mapping() {
        assert_eq!(length_directive("short"), "brief (1-3 sentences)");
        assert_eq!(length_directive("medium"), "moderate (3-5 sentences)");
        assert_eq!(length_directive("long"), "detailed (1-2 paragraphs)");
        assert_eq!(length_directive("epic"), "moderate");
    }

    #[test]
    fn test_formality_mapping() {
        assert_eq!(formality_directive(1), "very casual and relaxed");
        assert_eq!(formality_directive(2), "casual and friendly");
        assert_eq!(formality_directive(5), "very formal and polished");
        assert_eq!(
            formality_directive(3),
            "balanced, neither stiff nor overly casual"
        );
        assert_eq!(formality_directive(0), formality_directive(3));
    }

    #[test]
    fn test_same_inputs_give_identical_prompt() {
        let ctx = context(vec![prior(1, "First"), prior(2, "Second")]);
        let style = WritingStyle::default();
        let settings = ReplySettings {
            custom_instructions: Some("Mention the offsite.".to_string()),
            ..ReplySettings::default()
        };
        let info = KeyInfo {
            has_question: true,
            topics: vec!["numbers".to_string()],
            sentiment: Sentiment::Neutral,
        };
        let a = build_reply_prompt(&ctx, &style, &settings, Some(&info));
        let b = build_reply_prompt(&ctx, &style, &settings, Some(&info));
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_style_block_joins_lists() {
        let prompt = build_reply_prompt(
            &context(vec![]),
            &WritingStyle::default(),
            &ReplySettings::default(),
            None,
        );
        assert!(prompt.starts_with(REPLY_PREAMBLE));
        assert!(prompt.contains("- Greetings: Hi, Hello\n"));
        assert!(prompt.contains("- Closings: Best regards, Thanks\n"));
        assert!(prompt.contains("- Formality level: 3/5\n"));
        assert!(prompt.contains("- Average sentence length: 15 words\n"));
        assert!(prompt.contains("- Typical email length: medium\n"));
        assert!(prompt.contains("- Punctuation style: standard\n"));
        assert!(prompt.contains("Subject: Budget review\n"));
        assert!(prompt.contains("Date: 2024-02-02 14:05 UTC\n"));
        assert!(prompt.contains("- Length: moderate (3-5 sentences)\n"));
    }

    #[test]
    fn test_prior_block_absent_for_first_message() {
        let prompt = build_reply_prompt(
            &context(vec![]),
            &WritingStyle::default(),
            &ReplySettings::default(),
            None,
        );
        assert!(!prompt.contains("EARLIER IN THIS THREAD"));
    }

    #[test]
    fn test_prior_block_keeps_last_three_truncated() {
        let long = "z".repeat(300);
        let ctx = context(vec![
            prior(1, "alpha body"),
            prior(2, "bravo body"),
            prior(3, "charlie body"),
            prior(4, &long),
        ]);
        let prompt = build_reply_prompt(
            &ctx,
            &WritingStyle::default(),
            &ReplySettings::default(),
            None,
        );
        assert!(prompt.contains("EARLIER IN THIS THREAD"));
        assert!(!prompt.contains("alpha body"));
        assert!(prompt.contains("bravo body"));
        assert!(prompt.contains("charlie body"));
        assert!(prompt.contains(&format!("{}...", "z".repeat(200))));
        assert!(!prompt.contains(&"z".repeat(201)));
    }

    #[test]
    fn test_custom_instructions_verbatim_and_optional() {
        let settings = ReplySettings {
            custom_instructions: Some("Decline politely; suggest March.".to_string()),
            formality_level: 5,
            ..ReplySettings::default()
        };
        let prompt = build_reply_prompt(&context(vec![]), &WritingStyle::default(), &settings, None);
        assert!(prompt.contains("- Additional instructions: Decline politely; suggest March.\n"));
        assert!(prompt.contains("- Tone: very formal and polished\n"));

        let blank = ReplySettings {
            custom_instructions: Some("   ".to_string()),
            ..ReplySettings::default()
        };
        let prompt = build_reply_prompt(&context(vec![]), &WritingStyle::default(), &blank, None);
        assert!(!prompt.contains("Additional instructions"));
    }

    #[test]
    fn test_key_info_directives() {
        let info = KeyInfo {
            has_question: true,
            topics: vec!["numbers".to_string(), "friday".to_string()],
            sentiment: Sentiment::Negative,
        };
        let prompt = build_reply_prompt(
            &context(vec![]),
            &WritingStyle::default(),
            &ReplySettings::default(),
            Some(&info),
        );
        assert!(prompt.contains("answer it directly"));
        assert!(prompt.contains("- Key topics: numbers, friday\n"));
        assert!(prompt.contains("sounds concerned"));
    }
}
