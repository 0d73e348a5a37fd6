//! Configuration module for live-scope
//!
//! Startup configuration is read once and never written back: window size
//! and autoscale changes made at runtime live only in the session.
//!
//! # Lookup order
//!
//! 1. `live-scope.toml` in the working directory
//! 2. `live-scope/config.toml` in the platform config directory
//!    (e.g. `~/.config/live-scope/config.toml` on Linux)
//! 3. Built-in defaults
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below.
//!
//! # Example
//!
//! ```toml
//! [server]
//! page_url = "https://scope.example.com"
//!
//! [display]
//! default_capacity = 50
//! autoscale = true
//! ```

use crate::autoscale::Autoscaler;
use crate::buffer::SampleBuffer;
use crate::error::{Result, ResultExt, ScopeError};
use crate::protocol::{endpoint_url, DEFAULT_WS_PATH};
use crate::types::{DisplayBounds, DEFAULT_Y_MAX, DEFAULT_Y_MIN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "live-scope";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "live-scope.toml";

/// Config file looked up in the platform config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Default number of samples in the window
pub const DEFAULT_CAPACITY: usize = crate::buffer::DEFAULT_CAPACITY;

/// Step used by the window +/- controls
pub const DEFAULT_WINDOW_STEP: usize = 5;

/// Smallest window the decrease control will go to
pub const DEFAULT_MIN_WINDOW: usize = 5;

/// Number of diagnostics kept for display
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 50;

/// Where the sample stream is served from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// URL of the serving page; its scheme selects `ws` or `wss`
    pub page_url: String,
    /// Path of the WebSocket endpoint on that host
    pub ws_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            page_url: "http://127.0.0.1:8000".to_string(),
            ws_path: DEFAULT_WS_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    /// Resolved WebSocket URL
    pub fn endpoint(&self) -> Result<String> {
        endpoint_url(&self.page_url, &self.ws_path)
    }
}

/// Window and scaling defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial window capacity
    pub default_capacity: usize,
    /// Amount the +/- controls change the window by
    pub window_step: usize,
    /// Lower limit for the decrease control
    pub min_window: usize,
    /// Fixed lower bound used while autoscale is off
    pub default_y_min: f64,
    /// Fixed upper bound used while autoscale is off
    pub default_y_max: f64,
    /// Whether autoscale starts enabled
    pub autoscale: bool,
    /// How many diagnostics to keep
    pub max_diagnostics: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_capacity: DEFAULT_CAPACITY,
            window_step: DEFAULT_WINDOW_STEP,
            min_window: DEFAULT_MIN_WINDOW,
            default_y_min: DEFAULT_Y_MIN,
            default_y_max: DEFAULT_Y_MAX,
            autoscale: false,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
        }
    }
}

impl DisplayConfig {
    pub fn default_bounds(&self) -> DisplayBounds {
        DisplayBounds::new(self.default_y_min, self.default_y_max)
    }

    /// Empty buffer sized to `default_capacity`
    pub fn build_buffer(&self) -> Result<SampleBuffer> {
        SampleBuffer::with_capacity(self.default_capacity).context("display.default_capacity")
    }

    pub fn build_autoscaler(&self) -> Autoscaler {
        Autoscaler::new(self.default_bounds(), self.autoscale)
    }
}

/// Look and feel of the desktop window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub dark_mode: bool,
    pub line_width: f32,
    /// Trace color (RGBA)
    pub line_color: [u8; 4],
    pub window_size: [f32; 2],
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Live Scope".to_string(),
            dark_mode: true,
            line_width: 1.5,
            line_color: [33, 150, 243, 255],
            window_size: [1024.0, 600.0],
        }
    }
}

/// Complete startup configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub display: DisplayConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ScopeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(ScopeError::from)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load from the first config file found, or fall back to defaults
    pub fn load_or_default() -> Self {
        for path in Self::candidate_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {:?}", path);
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Ignoring configuration: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Files checked by [`load_or_default`](Self::load_or_default), in order
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs_next::config_dir() {
            paths.push(dir.join(APP_ID).join(CONFIG_FILE));
        }
        paths
    }

    /// Reject values the session cannot start with
    pub fn validate(&self) -> Result<()> {
        let display = &self.display;
        if display.default_capacity == 0 {
            return Err(ScopeError::InvalidCapacity(0).with_context("display.default_capacity"));
        }
        if display.window_step == 0 {
            return Err(ScopeError::Config("display.window_step must be positive".into()));
        }
        if display.min_window == 0 {
            return Err(ScopeError::InvalidCapacity(0).with_context("display.min_window"));
        }
        if !(display.default_y_min < display.default_y_max) {
            return Err(ScopeError::Config(format!(
                "display.default_y_min ({}) must be below default_y_max ({})",
                display.default_y_min, display.default_y_max
            )));
        }
        self.server.endpoint().map(|_| ())
    }
}
