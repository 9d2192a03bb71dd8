//! The drawing engine: one per chart instance.
//!
//! [`DrawingEngine`] owns the live drawing collection (render order is z
//! order), the tool state machine, the selection and the single current
//! [`Gesture`], and drives the collaborators it is given: coordinate mapper,
//! undo/redo history, drawing store, broadcast sinks and render sink.
//!
//! Public entry points never fail loudly. Errors are logged and the call
//! degrades to a no-op, reported through the `bool`/`Option` return value.
//!
//! ## Module Structure
//!
//! - [`input`] - Pointer and keyboard handling
//! - [`commit`] - Tool arming, finalizing, deletion, undo/redo, persistence

mod commit;
mod input;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use bevy::prelude::*;

use crate::broadcast::{BroadcastEvent, BroadcastSink};
use crate::clipboard::Clipboard;
use crate::common::CursorHint;
use crate::config::EngineConfig;
use crate::drag::{DoubleClickDetector, Gesture};
use crate::drawing::{DataPoint, Drawing, DrawingId};
use crate::history::{CommandHistory, DrawingSnapshot, UndoRedo};
use crate::hit_testing::{self, Hit, HitContext, LineHit, StackedLines};
use crate::mapper::{Candle, CandleSeries, CoordinateMapper, LinearMapper, Scales};
use crate::persistence::DrawingStore;
use crate::render::{GeometryIndex, GroupHandle, NullRenderSink, RenderScheduler, RenderSink, RenderedGroup};
use crate::selection::{SelectionState, ToolbarState};
use crate::tools::{DrawingStateMachine, ToolState};

/// Session key used until the host picks one
pub const DEFAULT_SESSION_KEY: &str = "default";

/// Something the host UI should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The armed tool changed (`None` when disarmed)
    ToolChanged(Option<String>),
    ToolbarChanged(ToolbarState),
    /// Open the inline editor or settings of a drawing
    OpenEditor(DrawingId),
    /// A text or note drawing waits for its content; see
    /// [`DrawingEngine::submit_text`]
    TextEntryRequested { tool: String, anchor: Vec2 },
    ContextMenuRequested { id: Option<DrawingId>, position: Vec2 },
    FullRedrawRequested,
    CursorChanged(CursorHint),
}

/// Style edits on one drawing within the debounce window share an undo entry.
#[derive(Debug)]
struct PendingStyleEdit {
    id: DrawingId,
    before: DrawingSnapshot,
    last_ms: i64,
}

#[derive(Resource)]
pub struct DrawingEngine {
    config: EngineConfig,
    drawings: Vec<Drawing>,
    tools: DrawingStateMachine,
    selection: SelectionState,
    gesture: Gesture,
    toolbar: ToolbarState,
    scheduler: RenderScheduler,
    geometry: GeometryIndex,
    mapper: Box<dyn CoordinateMapper>,
    scales: Scales,
    candles: CandleSeries,
    history: Box<dyn UndoRedo>,
    store: Option<Box<dyn DrawingStore>>,
    session_key: String,
    broadcast_sinks: Vec<Box<dyn BroadcastSink>>,
    render_sink: Box<dyn RenderSink>,
    events: Vec<EngineEvent>,
    clipboard: Clipboard,
    pending_style: Option<PendingStyleEdit>,
    /// Finished text drawing waiting for content
    pending_text: Option<Drawing>,
    /// Pointer position while collecting, for the in-progress preview
    preview_point: Option<DataPoint>,
    double_click: DoubleClickDetector,
    cursor: CursorHint,
    fill_interaction: bool,
}

impl Default for DrawingEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DrawingEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            drawings: Vec::new(),
            tools: DrawingStateMachine::default(),
            selection: SelectionState::default(),
            gesture: Gesture::None,
            toolbar: ToolbarState::Hidden,
            scheduler: RenderScheduler::default(),
            geometry: GeometryIndex::default(),
            mapper: Box::new(LinearMapper),
            scales: Scales::default(),
            candles: CandleSeries::default(),
            history: Box::new(CommandHistory::default()),
            store: None,
            session_key: DEFAULT_SESSION_KEY.to_string(),
            broadcast_sinks: Vec::new(),
            render_sink: Box::new(NullRenderSink::default()),
            events: Vec::new(),
            clipboard: Clipboard::default(),
            pending_style: None,
            pending_text: None,
            preview_point: None,
            double_click: DoubleClickDetector::default(),
            cursor: CursorHint::Default,
            fill_interaction: true,
        }
    }

    pub fn with_mapper(mut self, mapper: impl CoordinateMapper + 'static) -> Self {
        self.mapper = Box::new(mapper);
        self
    }

    pub fn with_history(mut self, history: impl UndoRedo + 'static) -> Self {
        self.history = Box::new(history);
        self
    }

    pub fn with_store(mut self, store: impl DrawingStore + 'static, session_key: &str) -> Self {
        self.store = Some(Box::new(store));
        self.session_key = session_key.to_string();
        self
    }

    pub fn with_render_sink(mut self, sink: impl RenderSink + 'static) -> Self {
        self.render_sink = Box::new(sink);
        self
    }

    pub fn with_scales(mut self, scales: Scales) -> Self {
        self.scales = scales;
        self
    }

    pub fn add_broadcast_sink(&mut self, sink: impl BroadcastSink + 'static) {
        self.broadcast_sinks.push(Box::new(sink));
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Live drawings in render order
    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    pub fn drawing(&self, id: DrawingId) -> Option<&Drawing> {
        self.drawings.iter().find(|d| d.id() == id)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn toolbar(&self) -> ToolbarState {
        self.toolbar
    }

    pub fn tool_state(&self) -> &ToolState {
        self.tools.state()
    }

    pub fn active_tool(&self) -> Option<&str> {
        self.tools.active_tool()
    }

    pub fn collected_points(&self) -> &[DataPoint] {
        self.tools.points()
    }

    pub fn scales(&self) -> &Scales {
        &self.scales
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    pub fn store(&self) -> Option<&dyn DrawingStore> {
        self.store.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    /// Whether drawings' fills currently take pointer events
    pub fn fill_interaction_enabled(&self) -> bool {
        self.fill_interaction
    }

    pub fn pending_text(&self) -> Option<&Drawing> {
        self.pending_text.as_ref()
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Drain queued host notifications.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Geometry of the drawing being placed, including the pointer as its
    /// next point.
    pub fn preview_group(&self) -> Option<RenderedGroup> {
        let tool = self.tools.active_tool()?;
        let mut points = self.tools.points().to_vec();
        if points.is_empty() {
            return None;
        }
        points.extend(self.preview_point);
        let drawing = self.config.registry.create(tool, points, self.style_for(tool)).ok()?;
        Some(drawing.build_group(self.mapper.as_ref(), &self.scales, false, true))
    }

    pub fn hit_context(&self) -> HitContext<'_> {
        HitContext {
            mapper: self.mapper.as_ref(),
            scales: &self.scales,
            registry: &self.config.registry,
            settings: &self.config.settings,
        }
    }

    /// Drawings whose stroke is under `position`, nearest first.
    pub fn find_drawings_at_point(&self, position: Vec2) -> Vec<Hit> {
        hit_testing::find_drawings_at_point(&self.drawings, position, &self.hit_context())
    }

    pub fn find_lines_at_point(&self, position: Vec2) -> Vec<LineHit> {
        hit_testing::find_lines_at_point(&self.drawings, position, &self.hit_context())
    }

    /// Stack detection with the configured threshold
    pub fn find_stacked_lines(&self, position: Vec2) -> StackedLines {
        let threshold = self.config.settings.stacked_threshold;
        hit_testing::find_stacked_lines(&self.drawings, position, threshold, &self.hit_context())
    }

    /// New visible window: every drawing is re-rendered. Cached pixel
    /// geometry is dropped at once so hit tests before the next flush see
    /// the new window.
    pub fn set_scales(&mut self, scales: Scales) {
        if self.scales != scales {
            self.scales = scales;
            for drawing in &mut self.drawings {
                drawing.clear_group();
            }
            self.schedule_all();
        }
    }

    /// New candle set (symbol or timeframe change). Drawings with a timestamp
    /// shadow are re-projected onto it; the rest get one.
    pub fn set_candles(&mut self, candles: Vec<Candle>) {
        self.candles = CandleSeries::new(candles);
        let mut reprojected = 0;
        for drawing in &mut self.drawings {
            if drawing.timestamp_points.is_some() {
                if drawing.reproject_timestamps(&self.candles) {
                    reprojected += 1;
                }
            } else {
                drawing.recalculate_timestamps(&self.candles);
            }
        }
        debug!("Re-projected {} drawings onto {} candles", reprojected, self.candles.candles().len());
        self.schedule_all();
    }

    /// Render every pending drawing once and present it. Returns the number
    /// of groups presented.
    pub fn flush_renders(&mut self) -> usize {
        if !self.scheduler.is_frame_requested() {
            return 0;
        }
        // Handles stay off while a drag is in progress
        let with_handles = !self.gesture.is_drag();
        let mut presented = 0;

        let positions: HashMap<DrawingId, usize> =
            self.drawings.iter().enumerate().map(|(i, d)| (d.id(), i)).collect();

        for id in self.scheduler.take_pending() {
            let position = positions.get(&id).copied();
            let renderable = position.filter(|i| self.drawings[*i].is_renderable());
            let Some(index) = renderable else {
                if let Some(index) = position {
                    self.drawings[index].clear_group();
                }
                if let Some(handle) = self.geometry.remove_drawing(id) {
                    self.render_sink.remove(handle);
                }
                continue;
            };

            let group = self.drawings[index].render(self.mapper.as_ref(), &self.scales, with_handles);
            let handle = self.render_sink.present(id, group);
            if let Some(old) = self.geometry.insert(handle, id) {
                self.render_sink.remove(old);
            }
            presented += 1;
        }
        presented
    }

    /// Host handle of the group last presented for `id`
    pub fn group_handle(&self, id: DrawingId) -> Option<GroupHandle> {
        self.geometry.handle_of(id)
    }

    pub fn has_pending_renders(&self) -> bool {
        self.scheduler.is_frame_requested()
    }

    fn position_of(&self, id: DrawingId) -> Option<usize> {
        self.drawings.iter().position(|d| d.id() == id)
    }

    fn schedule(&mut self, id: DrawingId) {
        self.scheduler.schedule(id);
    }

    fn schedule_all(&mut self) {
        for drawing in &self.drawings {
            self.scheduler.schedule(drawing.id());
        }
        self.emit(EngineEvent::FullRedrawRequested);
    }

    fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    fn broadcast(&mut self, event: BroadcastEvent) {
        for sink in &mut self.broadcast_sinks {
            sink.notify(&event);
        }
    }

    /// Re-derive the toolbar from the selection, notifying on change.
    fn refresh_toolbar(&mut self) {
        let toolbar = ToolbarState::for_selection(&self.selection, &self.drawings, self.mapper.as_ref(), &self.scales);
        if toolbar != self.toolbar {
            self.toolbar = toolbar;
            self.emit(EngineEvent::ToolbarChanged(toolbar));
        }
    }

    fn set_cursor(&mut self, cursor: CursorHint) {
        if cursor != self.cursor {
            self.cursor = cursor;
            self.emit(EngineEvent::CursorChanged(cursor));
        }
    }

    fn set_fill_interaction(&mut self, enabled: bool) {
        if enabled != self.fill_interaction {
            self.fill_interaction = enabled;
            self.render_sink.set_fill_interaction(enabled);
        }
    }

    /// Write the collection to the store. Skipped during undo/redo replay;
    /// the replay persists once when it finishes.
    fn persist(&mut self) {
        if self.history.is_performing_undo_redo() {
            return;
        }
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let records: Vec<_> = self.drawings.iter().map(Drawing::to_record).collect();
        if let Err(e) = store.save(&self.session_key, &records) {
            error!("Failed to save drawings for {}: {}", self.session_key, e);
        }
    }
}
