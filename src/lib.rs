//! Interactive drawing engine for price charts.
//!
//! Drawings live in data space (candle index, price) and are re-projected to
//! screen space through a [`CoordinateMapper`] whenever they render. The
//! [`DrawingEngine`] turns pointer and key input into tool placement,
//! selection, moves and handle resizes, and commits each change to undo
//! history, persistence and any broadcast listeners.
//!
//! Bevy hosts add [`DrawingEnginePlugin`]; anything else drives the engine
//! by calling it directly.

pub mod broadcast;
pub mod clipboard;
pub mod common;
pub mod config;
pub mod constants;
pub mod drag;
pub mod drawing;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod history;
pub mod hit_testing;
pub mod logging;
pub mod mapper;
pub mod paths;
pub mod persistence;
pub mod plugin;
pub mod render;
pub mod selection;
pub mod shapes;
pub mod tools;

pub use broadcast::{BroadcastEvent, BroadcastSink};
pub use common::{CursorHint, EngineKey, Modifiers, PointerButton, PointerInput};
pub use config::{EngineConfig, EngineSettings};
pub use drawing::{DataPoint, Drawing, DrawingId, DrawingRecord, Style};
pub use engine::{DrawingEngine, EngineEvent};
pub use error::{EngineError, EngineResult};
pub use history::{CommandHistory, UndoRedo};
pub use mapper::{Candle, CoordinateMapper, LinearMapper, MagnetMode, Scales};
pub use persistence::{DrawingStore, JsonFileStore, MemoryStore};
pub use plugin::{DrawingEnginePlugin, EngineNotification, KeyMessage, PointerMessage, PointerPhase};
pub use render::{GroupHandle, RenderSink, RenderedGroup};
