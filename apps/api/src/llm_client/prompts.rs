// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to every prompt that asks for a confidence value.
pub const CONFIDENCE_INSTRUCTION: &str = "\
    Every confidence value is a number between 0.0 and 1.0. \
    Use 0.9 or above only when the text states the fact explicitly. \
    Use 0.5 or below when the fact is implied or ambiguous. \
    Never invent facts that the text does not support.";
