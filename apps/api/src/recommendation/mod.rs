// LLM recommendation pipeline.
// Prompt building, response normalization and schema validation are pure;
// pipeline.rs wires them to the store, the model and the audit log.

pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod schema;
