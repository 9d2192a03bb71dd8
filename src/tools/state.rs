//! Drawing state machine: which tool is armed and which points it has.

use super::registry::{CreationBehavior, PointCount, ToolRegistry};
use crate::drawing::DataPoint;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolState {
    #[default]
    Idle,
    Armed {
        tool: String,
    },
    Collecting {
        tool: String,
        points: Vec<DataPoint>,
    },
}

/// Result of [`DrawingStateMachine::add_point`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddPointOutcome {
    pub is_complete: bool,
    pub count: usize,
}

#[derive(Debug, Default)]
pub struct DrawingStateMachine {
    state: ToolState,
    /// Chosen sticker glyph, required before the sticker tool can be armed
    sticker: Option<String>,
}

impl DrawingStateMachine {
    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn active_tool(&self) -> Option<&str> {
        match &self.state {
            ToolState::Idle => None,
            ToolState::Armed { tool } | ToolState::Collecting { tool, .. } => Some(tool),
        }
    }

    pub fn is_armed(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.state, ToolState::Collecting { .. })
    }

    pub fn points(&self) -> &[DataPoint] {
        match &self.state {
            ToolState::Collecting { points, .. } => points,
            _ => &[],
        }
    }

    pub fn sticker(&self) -> Option<&str> {
        self.sticker.as_deref()
    }

    pub fn set_sticker(&mut self, sticker: Option<String>) {
        self.sticker = sticker;
    }

    /// Arm `name`, discarding any in-progress sequence. Unknown tools and a
    /// sticker tool without a chosen sticker leave the state untouched.
    pub fn set_tool(&mut self, registry: &ToolRegistry, name: &str) -> EngineResult<()> {
        let spec = registry.spec(name)?;
        if spec.behavior == CreationBehavior::Sticker && self.sticker.is_none() {
            return Err(EngineError::MissingStickerPayload);
        }
        self.state = ToolState::Armed {
            tool: name.to_string(),
        };
        Ok(())
    }

    pub fn clear_tool(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Append a point. Fixed-count tools complete when the count is reached;
    /// continuous and point-by-point tools only complete on [`Self::terminate`].
    pub fn add_point(&mut self, registry: &ToolRegistry, point: DataPoint) -> EngineResult<AddPointOutcome> {
        let tool = self.active_tool().ok_or(EngineError::NoToolArmed)?.to_string();
        let spec = registry.spec(&tool)?;

        let state = std::mem::take(&mut self.state);
        let mut points = match state {
            ToolState::Collecting { points, .. } => points,
            _ => Vec::new(),
        };
        points.push(point);
        let count = points.len();
        self.state = ToolState::Collecting { tool, points };

        let is_complete = matches!(spec.point_count, PointCount::Fixed(n) if count >= n);
        Ok(AddPointOutcome { is_complete, count })
    }

    /// Replace the most recent point (continuous preview updates).
    pub fn replace_last(&mut self, point: DataPoint) -> bool {
        match &mut self.state {
            ToolState::Collecting { points, .. } => match points.last_mut() {
                Some(last) => {
                    *last = point;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Drop the pending sequence, keeping the tool armed.
    pub fn cancel(&mut self) {
        if let ToolState::Collecting { tool, .. } = &self.state {
            self.state = ToolState::Armed { tool: tool.clone() };
        }
    }

    /// Take the collected points of a complete sequence; the tool stays armed.
    pub fn take_completed(&mut self) -> Option<(String, Vec<DataPoint>)> {
        match std::mem::take(&mut self.state) {
            ToolState::Collecting { tool, points } => {
                self.state = ToolState::Armed { tool: tool.clone() };
                Some((tool, points))
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Explicit terminator for continuous and point-by-point tools. Returns the
    /// sequence if it has enough points to form a drawing, otherwise cancels.
    pub fn terminate(&mut self, registry: &ToolRegistry) -> Option<(String, Vec<DataPoint>)> {
        let tool = self.active_tool()?.to_string();
        let minimum = registry.get(&tool).map_or(2, |spec| spec.point_count.minimum());
        if self.points().len() >= minimum {
            self.take_completed()
        } else {
            self.cancel();
            None
        }
    }
}
