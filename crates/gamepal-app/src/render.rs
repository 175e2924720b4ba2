//! Terminal rendering of transcript changes.

use std::io::{self, Write};

use gamepal_chat::{Element, ElementId, ElementKind, RenderSink};
use gamepal_core::types::Role;

/// Prints transcript elements as they are appended.
///
/// Removals are not drawn: a terminal cannot take lines back, and the only
/// element ever removed mid-conversation is the loading line.
pub struct TerminalSink<W> {
    out: W,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write(&mut self, element: &Element) {
        let text = format_element(element);
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write + Send> RenderSink for TerminalSink<W> {
    fn appended(&mut self, element: &Element) {
        self.write(element);
    }

    fn removed(&mut self, id: ElementId) {
        tracing::trace!(element = %id, "Element removed");
    }

    fn reset(&mut self, welcome: &Element) {
        self.write(welcome);
    }
}

/// One element as terminal text.
pub fn format_element(element: &Element) -> String {
    match &element.kind {
        ElementKind::Welcome { title, text } => format!("\n{}\n{}\n", title, text),
        ElementKind::Message { role, text, time } => {
            let who = match role {
                Role::User => "You",
                Role::Assistant => "Assistant",
            };
            format!("[{}] {}: {}", time, who, text)
        }
        ElementKind::Loading { text } => format!("⏳ {}...", text),
        ElementKind::Notice { text } => format!("⚠ {}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamepal_chat::Transcript;

    #[test]
    fn test_format_kinds() {
        let mut t = Transcript::new("Hello", "Ask away");
        assert_eq!(format_element(&t.elements()[0]), "\nHello\nAsk away\n");

        t.append(Role::User, "hi");
        let line = format_element(&t.elements()[0]);
        assert!(line.starts_with('['));
        assert!(line.ends_with("] You: hi"));

        t.append_loading();
        assert_eq!(format_element(&t.elements()[1]), "⏳ Thinking...");

        t.notice("Voice input error: network");
        assert_eq!(format_element(&t.elements()[2]), "⚠ Voice input error: network");
    }

    #[test]
    fn test_sink_writes_appended_lines() {
        let mut sink = TerminalSink::new(Vec::new());
        let mut t = Transcript::new("Hello", "Ask away");
        t.append(Role::Assistant, "GG");
        sink.appended(&t.elements()[0]);
        sink.removed(t.elements()[0].id);

        let out = String::from_utf8(sink.out).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.trim_end().ends_with("Assistant: GG"));
    }
}
