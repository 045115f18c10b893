// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to prompts whose output is shown to end users verbatim and
/// exported to PDF. The builtin PDF fonts only cover Latin text.
pub const PLAIN_LANGUAGE_INSTRUCTION: &str = "\
    Use simple, clear language. \
    Write the whole answer in English, even if the user wrote in another language.";
