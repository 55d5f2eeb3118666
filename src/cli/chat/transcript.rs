use crate::bot::Turn;

/// What the chat window has shown, independent of the session history.
///
/// Failed exchanges are mirrored here as assistant entries carrying the
/// error text, so the transcript can run ahead of what the model has seen.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: &str) {
        self.entries.push(Turn::user(text));
    }

    pub fn push_assistant(&mut self, text: &str) {
        self.entries.push(Turn::assistant(text));
    }

    pub fn entries(&self) -> &[Turn] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Renders turns as `role: content` lines for display.
pub fn render(turns: &[Turn]) -> String {
    if turns.is_empty() {
        return "(no messages yet)".to_string();
    }

    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role().as_str(), turn.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_roles_in_order() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        transcript.push_assistant("hello");

        assert_eq!(render(transcript.entries()), "user: hi\nassistant: hello");
    }

    #[test]
    fn render_of_nothing_is_a_placeholder() {
        assert_eq!(render(&[]), "(no messages yet)");
    }

    #[test]
    fn clear_drops_every_entry() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        transcript.clear();
        assert!(transcript.entries().is_empty());
    }
}
