//! Keyboard shortcuts of the chat widget.

use gamepal_core::config::WidgetVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Char(char),
}

/// A key press with its modifiers. `meta` is Cmd on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
            meta: false,
        }
    }

    pub fn shift(key: Key) -> Self {
        Self {
            shift: true,
            ..Self::plain(key)
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    pub fn meta(key: Key) -> Self {
        Self {
            meta: true,
            ..Self::plain(key)
        }
    }

    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Send,
    InsertNewline,
    FocusInput,
    ClearChat,
    StopListening,
    /// Not a shortcut; let the input handle it.
    Ignore,
}

impl KeyAction {
    /// Map a key press to a widget action for the given variant.
    pub fn for_key(press: KeyPress, variant: WidgetVariant) -> Self {
        match press.key {
            Key::Enter if press.shift => KeyAction::InsertNewline,
            Key::Enter => KeyAction::Send,
            Key::Escape if variant == WidgetVariant::Voice => KeyAction::StopListening,
            Key::Char(c) if press.command() && c.eq_ignore_ascii_case(&'k') => {
                KeyAction::FocusInput
            }
            Key::Char(c)
                if press.command()
                    && c.eq_ignore_ascii_case(&'l')
                    && variant == WidgetVariant::GameSelect =>
            {
                KeyAction::ClearChat
            }
            _ => KeyAction::Ignore,
        }
    }
}
