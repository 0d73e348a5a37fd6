//! User-facing control actions
//!
//! The toolbar and any automated caller express intent as a
//! [`ControlAction`]; [`Session::apply`](crate::session::Session::apply)
//! carries it out. Window-size arithmetic lives in [`WindowStepper`] so the
//! clamping rules can be tested on their own.

use crate::config::{DEFAULT_MIN_WINDOW, DEFAULT_WINDOW_STEP};

/// Something the user (or an automated caller) asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Open the live connection
    Connect,
    /// Close the live connection
    Disconnect,
    /// Grow the window by one step
    IncreaseWindow,
    /// Shrink the window by one step, not below the minimum
    DecreaseWindow,
    /// Set the window to an exact size; zero is ignored
    SetMaxDataPoints(usize),
    /// Flip autoscale
    ToggleAutoscale,
    /// Clear the window
    Reset,
}

/// Step and floor for the window +/- controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStepper {
    pub step: usize,
    pub min: usize,
}

impl Default for WindowStepper {
    fn default() -> Self {
        Self {
            step: DEFAULT_WINDOW_STEP,
            min: DEFAULT_MIN_WINDOW,
        }
    }
}

impl WindowStepper {
    pub fn new(step: usize, min: usize) -> Self {
        Self {
            step: step.max(1),
            min: min.max(1),
        }
    }

    /// Capacity after one increase
    pub fn increase(&self, capacity: usize) -> usize {
        capacity.saturating_add(self.step)
    }

    /// Capacity after one decrease, or `None` when already at the floor
    pub fn decrease(&self, capacity: usize) -> Option<usize> {
        if capacity <= self.min {
            return None;
        }
        Some(capacity.saturating_sub(self.step).max(self.min))
    }
}
