// Thread intake: body cleaning, bounded context extraction, per-message key info.
// Everything here is synchronous and pure over its inputs.

pub mod cleaner;
pub mod extractor;
pub mod key_info;
