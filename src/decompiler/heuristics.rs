//! Best-effort phrase heuristics for imported documents.
//!
//! When a customer-response node arrives with no declared options, the
//! decompiler has to invent some. These phrase checks pick a two-option
//! yes/no pair over the generic three-option default when the prompt reads
//! like a closed question. They are heuristic, nothing more; a wrong guess
//! only changes how many placeholder options the author later edits.

/// Phrases that typically open a closed yes/no question.
pub const YES_NO_PHRASES: &[&str] = &[
    "are you",
    "do you",
    "did you",
    "have you",
    "would you",
    "will you",
    "can you",
    "could you",
    "is this",
    "is that",
    "is it",
    "medicare",
];

/// True when the prompt text contains any known yes/no opener.
/// Case-insensitive substring matching over [`YES_NO_PHRASES`].
pub fn looks_like_yes_no_question(text: &str) -> bool {
    let lowered = text.to_lowercase();
    YES_NO_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}
