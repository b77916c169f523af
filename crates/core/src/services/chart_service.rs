use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::ChartConfig;
use crate::models::chart::{
    ChartGeometry, ChartPoint, ChartRender, DrawCommand, Gridline, PlotRect, Surface, TimeLabel,
    ValueSample,
};
use crate::models::timestamp::format_time_label;
use crate::models::view::format_money;

pub const NO_DATA_TEXT: &str = "No data";

/// Turns an account-value history into chart geometry.
///
/// Pure apart from remembering the last prepared series, which lets the
/// host redraw on resize without refetching.
pub struct ChartEngine {
    config: ChartConfig,
    zone: Tz,
    last_series: Vec<ValueSample>,
}

impl ChartEngine {
    pub fn new(config: ChartConfig, zone: Tz) -> Self {
        Self {
            config,
            zone,
            last_series: Vec::new(),
        }
    }

    /// Render `history` (newest-first), appending a live point stamped now.
    pub fn render(
        &mut self,
        history: &[ValueSample],
        live_value: Option<f64>,
        surface: Surface,
    ) -> ChartRender {
        self.render_at(history, live_value, Utc::now(), surface)
    }

    /// Same as [`render`](Self::render) with an explicit "now" for the live point.
    pub fn render_at(
        &mut self,
        history: &[ValueSample],
        live_value: Option<f64>,
        now: DateTime<Utc>,
        surface: Surface,
    ) -> ChartRender {
        self.last_series = prepare_series(history, live_value.map(|v| (now, v)));
        self.redraw(surface)
    }

    /// Re-layout the last prepared series onto a (possibly resized) surface.
    pub fn redraw(&self, surface: Surface) -> ChartRender {
        layout(&self.last_series, surface, &self.config, self.zone)
    }

    pub fn last_series(&self) -> &[ValueSample] {
        &self.last_series
    }
}

/// Reverse a newest-first history to oldest-first and append the live sample last.
pub fn prepare_series(
    history: &[ValueSample],
    live: Option<(DateTime<Utc>, f64)>,
) -> Vec<ValueSample> {
    let mut series: Vec<ValueSample> = history.iter().rev().cloned().collect();
    if let Some((timestamp, total_value)) = live {
        series.push(ValueSample {
            timestamp,
            total_value,
        });
    }
    series
}

/// Plot range for `values`, padding a degenerate (flat) series.
///
/// A flat series at `v` is widened by 5% of `|v|` each way, or by 1 when
/// that pad would be zero (`v == 0`, or so small it underflows).
/// Returns `None` for an empty input.
pub fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut iter = values.into_iter();
    let first = iter.next()?;
    let (raw_min, raw_max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if raw_max == raw_min {
        let pad = match raw_max.abs() * 0.05 {
            pad if pad > 0.0 => pad,
            _ => 1.0,
        };
        Some((raw_min - pad, raw_max + pad))
    } else {
        Some((raw_min, raw_max))
    }
}

/// Lay out an oldest-first series on `surface`.
pub fn layout(
    series: &[ValueSample],
    surface: Surface,
    config: &ChartConfig,
    zone: Tz,
) -> ChartRender {
    if surface.is_empty() {
        return ChartRender::Skipped;
    }

    let clear = DrawCommand::Clear {
        width: surface.width,
        height: surface.height,
    };

    let Some((min_value, max_value)) = value_range(series.iter().map(|s| s.total_value)) else {
        let (x, y) = (surface.width / 2.0, surface.height / 2.0);
        return ChartRender::Placeholder {
            x,
            y,
            text: NO_DATA_TEXT.to_string(),
            commands: vec![
                clear,
                DrawCommand::Text {
                    x,
                    y,
                    text: NO_DATA_TEXT.to_string(),
                },
            ],
        };
    };

    let pad = &config.padding;
    let plot = PlotRect {
        left: pad.left,
        top: pad.top,
        width: (surface.width - pad.left - pad.right).max(0.0),
        height: (surface.height - pad.top - pad.bottom).max(0.0),
    };
    let span = max_value - min_value;
    let map_y = |value: f64| plot.top + (max_value - value) / span * plot.height;

    let n = series.len();
    let points: Vec<ChartPoint> = series
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let x = if n > 1 {
                plot.left + plot.width * i as f64 / (n - 1) as f64
            } else {
                plot.left
            };
            ChartPoint {
                sample: sample.clone(),
                x,
                y: map_y(sample.total_value),
            }
        })
        .collect();

    let steps = config.grid_steps.max(1);
    let gridlines: Vec<Gridline> = (0..=steps)
        .map(|i| {
            let value = min_value + span * i as f64 / steps as f64;
            Gridline {
                value,
                y: map_y(value),
                label: format_money(value),
            }
        })
        .collect();

    let time_labels: Vec<TimeLabel> = time_label_indices(n, config.time_labels)
        .into_iter()
        .map(|i| TimeLabel {
            index: i,
            x: points[i].x,
            label: format_time_label(&points[i].sample.timestamp, zone),
        })
        .collect();

    let xy: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
    let mut commands = Vec::with_capacity(gridlines.len() + time_labels.len() + 5);
    commands.push(clear);
    commands.extend(gridlines.iter().map(|g| DrawCommand::GridLine {
        y: g.y,
        x_from: plot.left,
        x_to: plot.right(),
        label: g.label.clone(),
    }));
    commands.push(DrawCommand::Axes {
        left: plot.left,
        top: plot.top,
        bottom: plot.bottom(),
        right: plot.right(),
    });
    commands.push(DrawCommand::FillArea {
        points: xy.clone(),
        baseline: plot.bottom(),
        gradient_top: plot.top,
        gradient_bottom: plot.bottom(),
    });
    if let Some(&(x, y)) = xy.last() {
        commands.push(DrawCommand::Polyline { points: xy });
        commands.push(DrawCommand::Marker {
            x,
            y,
            radius: config.marker_radius,
        });
    }
    commands.extend(time_labels.iter().map(|t| DrawCommand::TimeLabel {
        x: t.x,
        y: plot.bottom() + pad.bottom / 2.0,
        label: t.label.clone(),
    }));

    let ratio = if surface.pixel_ratio > 0.0 { surface.pixel_ratio } else { 1.0 };
    ChartRender::Plot(ChartGeometry {
        backing_width: (surface.width * ratio).round() as u32,
        backing_height: (surface.height * ratio).round() as u32,
        pixel_ratio: ratio,
        plot,
        min_value,
        max_value,
        points,
        gridlines,
        time_labels,
        commands,
    })
}

/// Indices of the samples that get a time-axis label: every point when
/// there are at most `max_labels`, otherwise `max_labels` evenly spaced
/// indices. The last point is always labelled.
pub fn time_label_indices(n: usize, max_labels: usize) -> Vec<usize> {
    if n == 0 || max_labels == 0 {
        return Vec::new();
    }
    if n <= max_labels {
        return (0..n).collect();
    }
    if max_labels == 1 {
        return vec![n - 1];
    }
    let last = (n - 1) as f64;
    let mut indices: Vec<usize> = (0..max_labels)
        .map(|i| (last * i as f64 / (max_labels - 1) as f64).round() as usize)
        .collect();
    indices.dedup();
    indices
}
