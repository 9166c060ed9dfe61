//! Keyboard controls.
//!
//! With Ctrl held, keys are commands: `1`/`2`/`3` pick the wood, `S`/`M`/`L`
//! the size, `P` toggles the pole and `B` cycles the backdrop. Without Ctrl
//! the keyboard edits the four text lines.

use winit::keyboard::{Key, NamedKey};

use crate::{
    backdrop::Backdrop,
    sign::config::{MAX_LINE_CHARS, MAX_LINES, SignSize, SignText, WoodTexture},
};

#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    SelectWood(WoodTexture),
    SelectSize(SignSize),
    TogglePole,
    CycleBackdrop,
    PreviousLine,
    NextLine,
    Insert(String),
    Backspace,
}

/// Translate a pressed key into an action.
///
/// `text` is the text the key produced, if any.
pub fn map_key(key: &Key, text: Option<&str>, ctrl: bool) -> Option<ControlAction> {
    if ctrl {
        let Key::Character(c) = key else {
            return None;
        };
        return match c.to_lowercase().as_str() {
            "1" => Some(ControlAction::SelectWood(WoodTexture::Oak)),
            "2" => Some(ControlAction::SelectWood(WoodTexture::Dark)),
            "3" => Some(ControlAction::SelectWood(WoodTexture::Acacia)),
            "s" => Some(ControlAction::SelectSize(SignSize::Small)),
            "m" => Some(ControlAction::SelectSize(SignSize::Medium)),
            "l" => Some(ControlAction::SelectSize(SignSize::Large)),
            "p" => Some(ControlAction::TogglePole),
            "b" => Some(ControlAction::CycleBackdrop),
            _ => None,
        };
    }

    match key {
        Key::Named(NamedKey::ArrowUp) => Some(ControlAction::PreviousLine),
        Key::Named(NamedKey::ArrowDown | NamedKey::Tab | NamedKey::Enter) => {
            Some(ControlAction::NextLine)
        }
        Key::Named(NamedKey::Backspace) => Some(ControlAction::Backspace),
        _ => {
            let typed: String = text?.chars().filter(|c| !c.is_control()).collect();
            (!typed.is_empty()).then_some(ControlAction::Insert(typed))
        }
    }
}

/// Four editable lines with one of them active.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextEditor {
    lines: [String; MAX_LINES],
    active: usize,
}

impl From<&SignText> for TextEditor {
    fn from(text: &SignText) -> Self {
        let mut editor = TextEditor::default();
        for (line, source) in editor.lines.iter_mut().zip(text.lines()) {
            line.clone_from(source);
        }
        editor
    }
}

impl TextEditor {
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn to_sign_text(&self) -> SignText {
        SignText::new(&self.lines)
    }

    pub fn select_next(&mut self) {
        self.active = (self.active + 1) % MAX_LINES;
    }

    pub fn select_previous(&mut self) {
        self.active = (self.active + MAX_LINES - 1) % MAX_LINES;
    }

    /// Append `text` to the active line. Characters that would take the line
    /// past the limit are refused. Returns whether the line changed.
    pub fn insert(&mut self, text: &str) -> bool {
        let line = &mut self.lines[self.active];
        let room = MAX_LINE_CHARS.saturating_sub(line.chars().count());
        let before = line.len();
        line.extend(text.chars().take(room));
        line.len() != before
    }

    /// Remove the last character of the active line.
    pub fn backspace(&mut self) -> bool {
        self.lines[self.active].pop().is_some()
    }
}

/// Human readable summary of the current choices, used as window title.
pub fn describe(
    wood: WoodTexture,
    size: SignSize,
    show_pole: bool,
    backdrop: Backdrop,
    active_line: usize,
) -> String {
    format!(
        "{} wood | {} ({}) | pole {} | {} backdrop | editing line {}",
        wood,
        size,
        size.label(),
        if show_pole { "on" } else { "off" },
        backdrop,
        active_line + 1,
    )
}
