//! What the chart renderer is asked to draw
//!
//! A [`ChartFrame`] is a self-contained description of one redraw: the
//! samples (with `None` placeholders for unfilled slots), one integer label
//! per sample, and the vertical bounds. The renderer does not look at the
//! session directly.

use crate::buffer::{offset_labels, SampleBuffer};
use crate::types::DisplayBounds;

/// Points, labels and bounds for one redraw
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub points: Vec<Option<f64>>,
    pub labels: Vec<i64>,
    pub bounds: DisplayBounds,
}

impl ChartFrame {
    /// Frame for the current buffer contents.
    ///
    /// An empty buffer is drawn as a full window of placeholders so the
    /// x-axis keeps its width.
    pub fn from_buffer(buffer: &SampleBuffer, bounds: DisplayBounds) -> Self {
        if buffer.is_empty() {
            return Self::empty(buffer.capacity(), bounds);
        }
        Self {
            points: buffer.iter().map(Some).collect(),
            labels: buffer.labels(),
            bounds,
        }
    }

    /// `capacity` placeholders labelled `-(capacity-1) ..= 0`
    pub fn empty(capacity: usize, bounds: DisplayBounds) -> Self {
        Self {
            points: vec![None; capacity],
            labels: offset_labels(capacity),
            bounds,
        }
    }

    /// `(label, value)` pairs for the filled slots
    pub fn plot_points(&self) -> Vec<[f64; 2]> {
        self.labels
            .iter()
            .zip(&self.points)
            .filter_map(|(&label, point)| point.map(|v| [label as f64, v]))
            .collect()
    }

    /// Label range covered by the frame, for the x-axis
    pub fn x_range(&self) -> (f64, f64) {
        match (self.labels.first(), self.labels.last()) {
            (Some(&first), Some(&last)) => (first as f64, last as f64),
            _ => (0.0, 0.0),
        }
    }

    /// Index of the slot nearest to an x position
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        if self.labels.is_empty() {
            return None;
        }
        let first = self.labels[0] as f64;
        let index = (x - first).round().clamp(0.0, (self.labels.len() - 1) as f64);
        Some(index as usize)
    }

    /// Tooltip text for the slot nearest to `x`
    pub fn tooltip(&self, x: f64) -> Option<String> {
        let index = self.nearest_index(x)?;
        Some(format!(
            "{}\n{}",
            sample_title(self.labels[index]),
            value_text(self.points[index])
        ))
    }
}

/// Tooltip title for a sample label
pub fn sample_title(label: i64) -> String {
    if label == 0 {
        "Current sample".to_string()
    } else {
        format!("Sample {}", label)
    }
}

/// Tooltip body for a sample value
pub fn value_text(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("Value: {:.2}", v),
        None => "Value: N/A".to_string(),
    }
}
