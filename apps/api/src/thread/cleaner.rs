//! Body cleaning: normalizes raw plain-text bodies before any heuristic runs.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum characters kept from a cleaned body.
pub const MAX_CLEAN_BODY_CHARS: usize = 10_000;

/// Text → text normalization applied to every body. Implementations must be
/// idempotent: `clean(clean(x)) == clean(x)`.
pub trait BodyCleaner: Send + Sync {
    fn clean(&self, body: &str) -> String;
}

/// Strips quoted history and signatures, then collapses whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBodyCleaner;

fn re_attribution() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^On .+ wrote:$").unwrap())
}

fn re_inline_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\u{a0}]+").unwrap())
}

impl BodyCleaner for DefaultBodyCleaner {
    fn clean(&self, body: &str) -> String {
        // Cap first so a cut can never turn a line into a delimiter on a later pass.
        let capped: String = body.chars().take(MAX_CLEAN_BODY_CHARS).collect();
        let mut lines: Vec<String> = Vec::new();

        for raw in capped.lines() {
            let line = re_inline_space().replace_all(raw.trim(), " ");
            // Everything below a reply attribution or signature delimiter is history.
            if line == "--" || re_attribution().is_match(&line) {
                break;
            }
            if line.starts_with('>') {
                continue;
            }
            lines.push(line.into_owned());
        }

        // Collapse blank-line runs to a single blank line.
        let mut collapsed: Vec<&str> = Vec::with_capacity(lines.len());
        for line in &lines {
            if line.is_empty() && collapsed.last().map_or(true, |l| l.is_empty()) {
                continue;
            }
            collapsed.push(line);
        }

        collapsed.join("\n").trim().to_string()
    }
}
