//! Classification of raw user input, shared by both shells.

/// Reply given when the user types `clear`. Never stored in the conversation.
pub const CLEAR_ACKNOWLEDGEMENT: &str = "Conversation history cleared.";

#[derive(Debug, PartialEq, Eq)]
pub enum Submission<'a> {
    /// Blank after trimming.
    Empty,
    /// The literal `clear`, in any case.
    Clear,
    /// Text to forward to the model, already trimmed.
    Message(&'a str),
}

impl<'a> Submission<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            Submission::Empty
        } else if text.eq_ignore_ascii_case("clear") {
            Submission::Clear
        } else {
            Submission::Message(text)
        }
    }
}
