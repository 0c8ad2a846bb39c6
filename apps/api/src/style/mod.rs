// Writing-style learning: signal extraction from authored mail and priority merging
// into the persisted WritingStyle.

pub mod handlers;
pub mod merge;
pub mod signals;
