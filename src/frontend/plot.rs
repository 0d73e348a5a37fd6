//! Waveform rendering with egui_plot
//!
//! The plot is a pure function of a [`ChartFrame`]: x positions are the
//! sample labels (newest at `0`), the y-axis is pinned to the frame bounds,
//! and user zoom/pan is disabled so every redraw shows exactly the window.
//! Hovering shows the nearest sample's label and value.

use crate::chart::ChartFrame;
use egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints, Points};

/// Visual parameters for the waveform
#[derive(Debug, Clone)]
pub struct PlotStyle {
    pub line_width: f32,
    pub line_color: Color32,
    pub marker_radius: f32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            line_width: 1.5,
            line_color: Color32::from_rgb(33, 150, 243),
            marker_radius: 3.0,
        }
    }
}

impl PlotStyle {
    pub fn from_config(config: &crate::config::UiConfig) -> Self {
        let [r, g, b, a] = config.line_color;
        Self {
            line_width: config.line_width,
            line_color: Color32::from_rgba_unmultiplied(r, g, b, a),
            ..Default::default()
        }
    }
}

/// X-axis limits for a frame, padded half a slot on each side
fn x_limits(frame: &ChartFrame) -> (f64, f64) {
    let (first, last) = frame.x_range();
    (first - 0.5, last + 0.5)
}

/// Draw `frame` filling the available space
pub fn render_waveform(ui: &mut Ui, frame: &ChartFrame, style: &PlotStyle) {
    let (x_min, x_max) = x_limits(frame);
    let bounds = frame.bounds;

    let plot = Plot::new("scope_waveform")
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_axes(true)
        .show_grid(true)
        .x_axis_label("Samples")
        .y_axis_label("Amplitude");

    let mut hovered: Option<f64> = None;

    let response = plot.show(ui, |plot_ui| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max(
            [x_min, bounds.min],
            [x_max, bounds.max],
        ));

        let points = frame.plot_points();
        if !points.is_empty() {
            let line = Line::new("Signal", PlotPoints::from(points))
                .color(style.line_color)
                .width(style.line_width);
            plot_ui.line(line);
        }

        if let Some(pointer) = plot_ui.pointer_coordinate() {
            hovered = Some(pointer.x);
            if let Some(index) = frame.nearest_index(pointer.x) {
                if let Some(value) = frame.points[index] {
                    let marker = Points::new("hover", vec![[frame.labels[index] as f64, value]])
                        .color(style.line_color)
                        .radius(style.marker_radius);
                    plot_ui.points(marker);
                }
            }
        }
    });

    if let Some(x) = hovered {
        if let Some(text) = frame.tooltip(x) {
            response.response.on_hover_text(text);
        }
    }
}
