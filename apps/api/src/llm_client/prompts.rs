// Shared prompt fragments.
// Each feature that calls the model keeps its own prompts.rs alongside it;
// this file holds only the pieces that are not specific to one feature.

/// Appended to system prompts whose output is shown to people as-is.
pub const PLAIN_MARKDOWN_OUTPUT: &str = "\
    Respond with the Markdown document only. \
    Do NOT wrap the whole response in a code fence. \
    Do NOT add commentary before or after the document.";
