// Reply generation: prompt synthesis, the drafting pipeline and output post-processing.
// All model calls go through the ModelCaller trait in llm_client.

pub mod generator;
pub mod handlers;
pub mod postprocess;
pub mod prompts;
