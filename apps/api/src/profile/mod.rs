// User profiles: structural merging, model-assisted learning and the HTTP surface.

pub mod handlers;
pub mod learn;
pub mod merge;
pub mod prompts;
