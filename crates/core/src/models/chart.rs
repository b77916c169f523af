use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp::naive_utc;

/// One entry of the account-value history returned with a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSample {
    #[serde(with = "naive_utc")]
    pub timestamp: DateTime<Utc>,
    pub total_value: f64,
}

/// A sample mapped into screen space. Recomputed on every render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub sample: ValueSample,
    pub x: f64,
    pub y: f64,
}

/// Drawing surface size in device-independent units plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// A surface with no drawable area; rendering onto it is a no-op.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Space reserved around the plot area for axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 40.0,
            left: 70.0,
        }
    }
}

/// The inner rectangle the series is plotted into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A horizontal background gridline and its value label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gridline {
    pub value: f64,
    pub y: f64,
    pub label: String,
}

/// A label on the time axis, centred under `x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeLabel {
    pub index: usize,
    pub x: f64,
    pub label: String,
}

/// Render instructions, in paint order. Coordinates are device-independent;
/// the host scales its backing store by `ChartGeometry::pixel_ratio`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    GridLine {
        y: f64,
        x_from: f64,
        x_to: f64,
        label: String,
    },
    Axes {
        left: f64,
        top: f64,
        bottom: f64,
        right: f64,
    },
    /// Area under the line, filled with a vertical gradient from
    /// `top` (opaque) down to `bottom` (transparent).
    FillArea {
        points: Vec<(f64, f64)>,
        baseline: f64,
        gradient_top: f64,
        gradient_bottom: f64,
    },
    Polyline {
        points: Vec<(f64, f64)>,
    },
    Marker {
        x: f64,
        y: f64,
        radius: f64,
    },
    TimeLabel {
        x: f64,
        y: f64,
        label: String,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
    },
}

/// Everything a host needs to paint one chart frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGeometry {
    /// Backing-store size in physical pixels
    pub backing_width: u32,
    pub backing_height: u32,
    pub pixel_ratio: f64,
    pub plot: PlotRect,
    /// Plotted value range, after degenerate-range padding
    pub min_value: f64,
    pub max_value: f64,
    pub points: Vec<ChartPoint>,
    pub gridlines: Vec<Gridline>,
    pub time_labels: Vec<TimeLabel>,
    pub commands: Vec<DrawCommand>,
}

/// Result of one chart render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChartRender {
    /// The surface has no area; nothing was drawn.
    Skipped,
    /// The series is empty; a centred placeholder text is drawn instead.
    Placeholder {
        x: f64,
        y: f64,
        text: String,
        commands: Vec<DrawCommand>,
    },
    Plot(ChartGeometry),
}

impl ChartRender {
    pub fn geometry(&self) -> Option<&ChartGeometry> {
        match self {
            ChartRender::Plot(geometry) => Some(geometry),
            _ => None,
        }
    }
}
