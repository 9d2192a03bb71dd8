//! Bevy integration: the engine as a resource, driven by messages.
//!
//! Hosts write [`PointerMessage`] and [`KeyMessage`] values; the plugin feeds
//! them to the [`DrawingEngine`] resource, flushes pending renders once per
//! frame and republishes engine notifications as [`EngineNotification`].
//! When Bevy's input plugin is present, Delete, Backspace, Escape, Enter and
//! the undo/redo chords are read from the keyboard as well.

use std::path::PathBuf;

use bevy::prelude::*;

use crate::common::{EngineKey, PointerInput};
use crate::config::EngineConfig;
use crate::drawing::now_ms;
use crate::engine::{DrawingEngine, EngineEvent};

/// Which pointer callback a sample is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct PointerMessage {
    pub phase: PointerPhase,
    pub input: PointerInput,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct KeyMessage(pub EngineKey);

#[derive(Message, Debug, Clone)]
pub struct EngineNotification(pub EngineEvent);

#[derive(Default)]
pub struct DrawingEnginePlugin {
    /// Settings file to load; the platform config file when unset
    pub config_path: Option<PathBuf>,
}

impl Plugin for DrawingEnginePlugin {
    fn build(&self, app: &mut App) {
        let loaded = match &self.config_path {
            Some(path) => EngineConfig::load_from(path),
            None => EngineConfig::load(),
        };
        if let Some(reason) = &loaded.reset_reason {
            warn!("Engine settings reset to defaults: {}", reason);
        }

        app.insert_resource(DrawingEngine::new(loaded.config))
            .add_message::<PointerMessage>()
            .add_message::<KeyMessage>()
            .add_message::<EngineNotification>()
            .add_systems(
                Update,
                (
                    keyboard_shortcuts,
                    handle_key_messages,
                    handle_pointer_messages,
                    flush_engine,
                )
                    .chain(),
            );
    }
}

/// Ctrl+Z undoes, Ctrl+Y and Ctrl+Shift+Z redo.
fn keyboard_shortcuts(keys: Option<Res<ButtonInput<KeyCode>>>, mut writer: MessageWriter<KeyMessage>) {
    let Some(keys) = keys else {
        return;
    };
    let ctrl = keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
    let shift = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);

    if ctrl && keys.just_pressed(KeyCode::KeyZ) {
        writer.write(KeyMessage(if shift { EngineKey::Redo } else { EngineKey::Undo }));
    } else if ctrl && keys.just_pressed(KeyCode::KeyY) {
        writer.write(KeyMessage(EngineKey::Redo));
    }

    for (code, key) in [
        (KeyCode::Delete, EngineKey::Delete),
        (KeyCode::Backspace, EngineKey::Backspace),
        (KeyCode::Escape, EngineKey::Escape),
        (KeyCode::Enter, EngineKey::Enter),
    ] {
        if keys.just_pressed(code) {
            writer.write(KeyMessage(key));
        }
    }
}

fn handle_key_messages(mut engine: ResMut<DrawingEngine>, mut reader: MessageReader<KeyMessage>) {
    for KeyMessage(key) in reader.read() {
        engine.key_down(*key);
    }
}

fn handle_pointer_messages(mut engine: ResMut<DrawingEngine>, mut reader: MessageReader<PointerMessage>) {
    for message in reader.read() {
        match message.phase {
            PointerPhase::Down => engine.pointer_down(message.input),
            PointerPhase::Move => engine.pointer_move(message.input),
            PointerPhase::Up => engine.pointer_up(message.input),
        };
    }
}

/// Per-frame housekeeping: debounced style edits, batched renders, and
/// notifications for the host UI.
fn flush_engine(mut engine: ResMut<DrawingEngine>, mut writer: MessageWriter<EngineNotification>) {
    engine.poll_style_debounce(now_ms());
    engine.flush_renders();
    for event in engine.drain_events() {
        writer.write(EngineNotification(event));
    }
}
