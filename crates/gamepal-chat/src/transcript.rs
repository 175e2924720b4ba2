//! Chat transcript: the ordered container of rendered chat elements.
//!
//! Every mutation is mirrored to an optional `RenderSink`, which is how a
//! concrete front end (terminal, GUI) follows along without the transcript
//! knowing how anything is drawn.

use std::fmt;

use chrono::{DateTime, Local};
use gamepal_core::types::Role;

/// Text of the loading placeholder.
pub const LOADING_TEXT: &str = "Thinking";

/// Handle to an element, valid until the element is removed or the
/// transcript is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Informational block shown before any real message.
    Welcome { title: String, text: String },
    /// A user or assistant message with its `HH:MM` render time.
    Message {
        role: Role,
        text: String,
        time: String,
    },
    /// Assistant-side placeholder while a reply is pending.
    Loading { text: String },
    /// One-line system notice.
    Notice { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
}

impl Element {
    pub fn is_welcome(&self) -> bool {
        matches!(self.kind, ElementKind::Welcome { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.kind, ElementKind::Loading { .. })
    }
}

/// Receives transcript mutations in the order they happen.
pub trait RenderSink: Send {
    fn appended(&mut self, element: &Element);
    fn removed(&mut self, id: ElementId);
    fn reset(&mut self, welcome: &Element);
}

/// Ordered, append-only view of the conversation.
pub struct Transcript {
    elements: Vec<Element>,
    next_id: u64,
    scroll_position: usize,
    sink: Option<Box<dyn RenderSink>>,
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("elements", &self.elements)
            .field("scroll_position", &self.scroll_position)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl Transcript {
    /// Create a transcript holding only a welcome block.
    pub fn new(welcome_title: &str, welcome_text: &str) -> Self {
        let mut transcript = Self {
            elements: Vec::new(),
            next_id: 0,
            scroll_position: 0,
            sink: None,
        };
        let welcome = transcript.welcome(welcome_title, welcome_text);
        transcript.elements.push(welcome);
        transcript
    }

    /// Attach a sink; it is immediately replayed the current content.
    pub fn with_sink(mut self, mut sink: Box<dyn RenderSink>) -> Self {
        for element in &self.elements {
            if element.is_welcome() {
                sink.reset(element);
            } else {
                sink.appended(element);
            }
        }
        self.sink = Some(sink);
        self
    }

    /// Append a message stamped with the current local time.
    pub fn append(&mut self, role: Role, text: &str) -> ElementId {
        self.append_at(role, text, Local::now())
    }

    /// Append a message stamped with `at`.
    ///
    /// Removes the welcome block if it is still present and scrolls to the end.
    pub fn append_at(&mut self, role: Role, text: &str, at: DateTime<Local>) -> ElementId {
        self.remove_welcome();
        self.push(ElementKind::Message {
            role,
            text: text.to_string(),
            time: at.format("%H:%M").to_string(),
        })
    }

    /// Append the assistant-side "thinking" placeholder.
    pub fn append_loading(&mut self) -> ElementId {
        self.push(ElementKind::Loading {
            text: LOADING_TEXT.to_string(),
        })
    }

    /// Append a one-line system notice.
    pub fn notice(&mut self, text: &str) -> ElementId {
        self.remove_welcome();
        self.push(ElementKind::Notice {
            text: text.to_string(),
        })
    }

    /// Remove an element by handle. Returns `false` if it is already gone.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let Some(index) = self.elements.iter().position(|e| e.id == id) else {
            return false;
        };
        self.elements.remove(index);
        self.scroll_position = self
            .scroll_position
            .min(self.elements.len().saturating_sub(1));
        if let Some(sink) = self.sink.as_mut() {
            sink.removed(id);
        }
        true
    }

    /// Replace all content with a single welcome block.
    pub fn reset(&mut self, welcome_title: &str, welcome_text: &str) {
        let welcome = self.welcome(welcome_title, welcome_text);
        self.elements.clear();
        self.elements.push(welcome);
        self.scroll_position = 0;
        if let Some(sink) = self.sink.as_mut() {
            sink.reset(&self.elements[0]);
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// `(role, text)` of every message, in order.
    pub fn messages(&self) -> impl Iterator<Item = (Role, &str)> + '_ {
        self.elements.iter().filter_map(|e| match &e.kind {
            ElementKind::Message { role, text, .. } => Some((*role, text.as_str())),
            _ => None,
        })
    }

    pub fn has_welcome(&self) -> bool {
        self.elements.iter().any(Element::is_welcome)
    }

    pub fn loading_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_loading()).count()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Index of the last element scrolled into view.
    pub fn scroll_position(&self) -> usize {
        self.scroll_position
    }

    // -- Private helpers --

    fn welcome(&mut self, title: &str, text: &str) -> Element {
        Element {
            id: self.next_id(),
            kind: ElementKind::Welcome {
                title: title.to_string(),
                text: text.to_string(),
            },
        }
    }

    fn push(&mut self, kind: ElementKind) -> ElementId {
        let id = self.next_id();
        self.elements.push(Element { id, kind });
        self.scroll_position = self.elements.len() - 1;
        if let Some(sink) = self.sink.as_mut() {
            if let Some(element) = self.elements.last() {
                sink.appended(element);
            }
        }
        id
    }

    fn remove_welcome(&mut self) {
        let welcome_ids: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|e| e.is_welcome())
            .map(|e| e.id)
            .collect();
        for id in welcome_ids {
            self.remove(id);
        }
    }

    fn next_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }
}

// =============================================================================
// Tests
// =============================================================================
