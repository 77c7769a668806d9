// Shared prompt fragments. Each feature that calls the model keeps its own
// prompts.rs alongside it; only cross-cutting pieces live here.

/// Closing directive appended to every user payload.
pub const RESPOND_JSON_ONLY: &str = "Respond with JSON only.";

/// Persona shared by both ranking directions.
pub const HR_ASSISTANT_PERSONA: &str = "You are an HR assistant.";

/// Score range constraint; out-of-range scores are rescaled after parsing.
pub const SCORE_RANGE_INSTRUCTION: &str =
    "score MUST be a number between 0 and 1 inclusive (0 = no fit, 1 = perfect fit).";
