// Shared system prompts.
// Each pipeline that needs LLM calls defines its own prompts alongside it.

/// System prompt for structured analysis calls. Enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for reply drafting: plain text, no framing.
pub const REPLY_SYSTEM: &str = "You draft email replies on behalf of one person. \
    Respond with the reply body only, as plain text. \
    Do NOT include a subject line, headers, or commentary about the reply. \
    Do NOT invent facts, dates, or commitments that are not in the email.";
