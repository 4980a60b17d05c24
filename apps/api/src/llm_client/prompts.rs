// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains the lines every structured-output prompt must carry.

/// Introduces the exact JSON shape the model must return.
pub const STRICT_JSON_SHAPE: &str = "Return strict JSON only with this exact shape:";

/// Forbids fenced output. The client still strips fences if the model ignores this.
pub const NO_FENCES_RULE: &str = "- Do not include markdown/code fences.";
