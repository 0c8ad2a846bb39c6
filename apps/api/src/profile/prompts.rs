// Profile learning prompt templates.

/// Authored samples shown to the model per analysis call.
pub const MAX_ANALYSIS_SAMPLES: usize = 10;
/// Characters kept from each sample body.
pub const MAX_SAMPLE_CHARS: usize = 1000;

pub const PROFILE_ANALYSIS_PROMPT: &str = r#"Analyze the following emails, all written by {email}, and describe how this person communicates.

EMAILS:
{samples}

OUTPUT SCHEMA (return exactly this structure; omit anything you cannot infer):
{
  "name": "string",
  "identity": {
    "role": "string",
    "expertise": ["string"],
    "communicationStyle": "string"
  },
  "personality": {
    "formality": 1-5,
    "directness": 1-5,
    "warmth": 1-5,
    "detailLevel": 1-5
  },
  "patterns": {
    "greetings": {"formal": ["string"], "casual": ["string"], "client": ["string"]},
    "closings": {"formal": ["string"], "casual": ["string"], "client": ["string"]}
  },
  "vocabulary": {
    "common": ["string"],
    "avoided": ["string"],
    "professional": ["string"]
  },
  "rules": ["string"]
}

Use at most 10 entries per list. Quote phrases exactly as the author writes them."#;

/// Renders the numbered sample block from the last `MAX_ANALYSIS_SAMPLES`
/// non-blank bodies, most recent samples last.
pub fn format_samples<'a>(bodies: impl IntoIterator<Item = &'a str>) -> String {
    let samples: Vec<&str> = bodies
        .into_iter()
        .filter(|b| !b.trim().is_empty())
        .collect();
    let skip = samples.len().saturating_sub(MAX_ANALYSIS_SAMPLES);

    samples[skip..]
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let sample: String = body.chars().take(MAX_SAMPLE_CHARS).collect();
            format!("--- Email {} ---\n{}", i + 1, sample.trim())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_profile_prompt(email: &str, samples: &str) -> String {
    PROFILE_ANALYSIS_PROMPT
        .replace("{email}", email)
        .replace("{samples}", samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_keep_most_recent_and_truncate() {
        let long = "x".repeat(1500);
        let bodies: Vec<String> = (0..15)
            .map(|i| format!("body {i}"))
            .chain(std::iter::once(long))
            .collect();
        let block = format_samples(bodies.iter().map(String::as_str));
        assert!(block.contains("--- Email 10 ---"));
        assert!(!block.contains("--- Email 11 ---"));
        assert!(block.starts_with("--- Email 1 ---\nbody 6\n"));
        assert!(!block.contains("body 5\n"));
        assert!(block.contains("body 14"));
        assert!(block.ends_with(&format!("--- Email 10 ---\n{}", "x".repeat(MAX_SAMPLE_CHARS))));
        assert!(!block.contains(&"x".repeat(MAX_SAMPLE_CHARS + 1)));
    }

    #[test]
    fn test_blank_samples_are_skipped() {
        let block = format_samples(["", "  ", "Hi team"]);
        assert_eq!(block, "--- Email 1 ---\nHi team");
    }

    #[test]
    fn test_prompt_substitutes_placeholders() {
        let prompt = build_profile_prompt("jane@example.com", "--- Email 1 ---\nHi");
        assert!(prompt.starts_with("Analyze the following emails, all written by jane@example.com"));
        assert!(prompt.contains("EMAILS:\n--- Email 1 ---\nHi\n"));
        assert!(!prompt.contains("{samples}"));
    }
}
