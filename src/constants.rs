//! Centralized constants used across the engine.
//!
//! Values that users may want to tune live in [`crate::config::EngineSettings`];
//! these are the fixed numbers the settings default to, plus internal limits.

/// Default stroke hit tolerance in pixels
pub const DEFAULT_HIT_TOLERANCE: f32 = 3.0;

/// Default radius around a handle that still grabs it, in pixels
pub const DEFAULT_HANDLE_RADIUS: f32 = 6.0;

/// Polyline vertices accept hits within `tolerance * VERTEX_TOLERANCE_FACTOR`
pub const DEFAULT_VERTEX_TOLERANCE_FACTOR: f32 = 2.0;

/// More than this many lines under the pointer counts as a stack
pub const DEFAULT_STACKED_THRESHOLD: usize = 3;

/// Window in which consecutive style edits on one drawing share an undo entry
pub const DEFAULT_STYLE_DEBOUNCE_MS: i64 = 400;

/// Two handle presses closer than this open the inline editor
pub const DEFAULT_DOUBLE_CLICK_MS: i64 = 400;

/// Presses closer than this are treated as contact bounce, not a double click
pub const DEFAULT_DOUBLE_CLICK_MIN_MS: i64 = 40;

/// Freehand tools drop samples closer than this to the previous one (pixels)
pub const DEFAULT_FREEHAND_MIN_SPACING: f32 = 2.0;

/// Share of the visible price range used for the default stop distance
pub const DEFAULT_RISK_PERCENT: f64 = 0.05;

/// Stop distance used when the visible price range is unusable
pub const DEFAULT_PRICE_INCREMENT: f64 = 1.0;

/// Default width of a freshly placed position marker, in bars
pub const DEFAULT_POSITION_WIDTH_BARS: f64 = 20.0;

/// Target distance as a multiple of the stop distance for new position markers
pub const DEFAULT_REWARD_RATIO: f64 = 2.0;

/// Weak magnet only snaps when an OHLC value is this close (pixels)
pub const MAGNET_WEAK_RADIUS: f32 = 24.0;

/// Marquee drags shorter than this are treated as clicks (pixels)
pub const MIN_MARQUEE_DRAG: f32 = 5.0;

/// Pasted drawings are shifted by this many bars
pub const PASTE_OFFSET_BARS: f64 = 5.0;

/// Maximum number of entries kept in the undo history
pub const MAX_HISTORY_SIZE: usize = 100;
