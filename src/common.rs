//! Input types shared by the engine, the gesture code and the Bevy plugin.
//!
//! The engine never reads devices itself; hosts translate their native events
//! into [`PointerInput`] and [`EngineKey`] values.

use bevy::prelude::*;

/// Pointer button that produced a press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    /// Right button: context menu, or terminator for point-by-point tools
    Secondary,
    Middle,
}

/// Keyboard modifiers held during a pointer or key event.
///
/// - `shift`: angle snap while placing or resizing, marquee gesture
/// - `ctrl`: multi-select toggle, ctrl-hover selection
/// - `alt`: force strong magnet while held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKey {
    Delete,
    Backspace,
    Escape,
    Enter,
    Undo,
    Redo,
}

/// One pointer sample in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub position: Vec2,
    pub button: PointerButton,
    pub modifiers: Modifiers,
    /// Whether the primary button is physically down at the time of the sample.
    /// Move events are checked against this to drop gestures whose release
    /// was never delivered.
    pub primary_held: bool,
    /// Host timestamp in milliseconds
    pub time_ms: i64,
}

impl PointerInput {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
            primary_held: false,
            time_ms: 0,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn held(mut self) -> Self {
        self.primary_held = true;
        self
    }

    pub fn at_time(mut self, time_ms: i64) -> Self {
        self.time_ms = time_ms;
        self
    }
}

/// Cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Crosshair,
    Pointer,
    Move,
    Grab,
    NotAllowed,
}
