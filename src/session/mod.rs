//! The running client session
//!
//! [`Session`] owns every piece of mutable state for one scope window: the
//! sample buffer, the autoscaler, the connection manager and the list of
//! surfaced diagnostics. The application entry point owns exactly one and
//! hands it to the UI by `&mut`, so all transitions happen on the UI thread
//! in the order events and clicks are dispatched.
//!
//! Transport threads only talk to the session through the connection
//! manager's event channel; [`Session::pump`] drains it.

use std::collections::VecDeque;

use crate::autoscale::Autoscaler;
use crate::buffer::{SampleBuffer, WindowStats};
use crate::chart::ChartFrame;
use crate::config::AppConfig;
use crate::connection::{ConnectionEvent, ConnectionManager, Transport, TransportEvent};
use crate::controls::{ControlAction, WindowStepper};
use crate::error::{Result, ScopeError};
use crate::types::{ConnectionState, ControlState, Diagnostic, DiagnosticKind, DisplayBounds};

/// The user-adjustable part of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeSettings {
    pub capacity: usize,
    pub autoscale_enabled: bool,
}

/// One scope window's worth of state
#[derive(Debug)]
pub struct Session {
    buffer: SampleBuffer,
    autoscale: Autoscaler,
    connection: ConnectionManager,
    stepper: WindowStepper,
    endpoint: String,
    diagnostics: VecDeque<Diagnostic>,
    max_diagnostics: usize,
    samples_received: u64,
    redraw_requested: bool,
}

impl Session {
    /// Build a session from startup configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            buffer: config.display.build_buffer()?,
            autoscale: config.display.build_autoscaler(),
            connection: ConnectionManager::new(),
            stepper: WindowStepper::new(config.display.window_step, config.display.min_window),
            endpoint: config.server.endpoint()?,
            diagnostics: VecDeque::new(),
            max_diagnostics: config.display.max_diagnostics.max(1),
            samples_received: 0,
            redraw_requested: true,
        })
    }

    /// Build from `config`, falling back to the defaults if it is rejected.
    ///
    /// Returns the session together with the configuration it was built from.
    pub fn with_fallback(config: AppConfig) -> Result<(Self, AppConfig)> {
        match Self::new(&config) {
            Ok(session) => Ok((session, config)),
            Err(e) => {
                tracing::warn!("Invalid configuration, using defaults: {}", e);
                let config = AppConfig::default();
                Ok((Self::new(&config)?, config))
            }
        }
    }

    // ---- accessors ----

    pub fn settings(&self) -> ScopeSettings {
        ScopeSettings {
            capacity: self.buffer.capacity(),
            autoscale_enabled: self.autoscale.is_enabled(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn controls(&self) -> ControlState {
        self.connection.controls()
    }

    pub fn bounds(&self) -> DisplayBounds {
        self.autoscale.bounds()
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn window_stats(&self) -> Option<WindowStats> {
        self.buffer.stats()
    }

    /// Total samples accepted since the session started
    pub fn samples_received(&self) -> u64 {
        self.samples_received
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn last_diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostics.back()
    }

    /// What the chart should draw right now
    pub fn chart_frame(&self) -> ChartFrame {
        ChartFrame::from_buffer(&self.buffer, self.bounds())
    }

    /// Whether something changed since the last call
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    // ---- connection ----

    /// Open the live connection. Returns whether an attempt was started.
    pub fn connect(&mut self, transport: &dyn Transport) -> bool {
        match self.connection.connect(transport, &self.endpoint) {
            Ok(started) => started,
            Err(e) => {
                self.report(DiagnosticKind::Transport, &e);
                false
            }
        }
    }

    /// Request a close. Returns whether a close was requested.
    pub fn disconnect(&mut self) -> bool {
        self.connection.disconnect()
    }

    /// Apply every pending connection event. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let events = self.connection.drain_events();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    /// Apply one connection event
    pub fn handle_event(&mut self, event: ConnectionEvent) {
        let ConnectionEvent { id, event } = event;
        match event {
            TransportEvent::Opened => {
                if self.connection.on_open(id) {
                    self.redraw_requested = true;
                }
            }
            TransportEvent::Message(text) => {
                let outcome = self.connection.on_message(id, &text, &mut self.buffer);
                if outcome.pushed.is_some() {
                    self.samples_received += 1;
                    self.autoscale.refresh(&self.buffer.snapshot());
                    self.redraw_requested = true;
                }
                for error in outcome.errors {
                    let kind = match error {
                        ScopeError::ServerError(_) => DiagnosticKind::Server,
                        _ => DiagnosticKind::Payload,
                    };
                    self.report(kind, &error);
                }
            }
            TransportEvent::Error(message) => {
                if self.connection.on_error(id, &message) {
                    self.report(DiagnosticKind::Transport, &ScopeError::Transport(message));
                    self.redraw_requested = true;
                }
            }
            TransportEvent::Closed { reason } => {
                if self.connection.on_close(id, reason.as_deref()) {
                    self.redraw_requested = true;
                }
            }
        }
    }

    // ---- controls ----

    /// Carry out a control action
    pub fn apply(&mut self, action: ControlAction, transport: &dyn Transport) {
        tracing::debug!("control action {:?}", action);
        match action {
            ControlAction::Connect => {
                self.connect(transport);
            }
            ControlAction::Disconnect => {
                self.disconnect();
            }
            ControlAction::IncreaseWindow => {
                self.increase_window();
            }
            ControlAction::DecreaseWindow => {
                self.decrease_window();
            }
            ControlAction::SetMaxDataPoints(n) => {
                self.set_max_data_points(n);
            }
            ControlAction::ToggleAutoscale => {
                self.toggle_autoscale();
            }
            ControlAction::Reset => self.reset(),
        }
    }

    /// Resize the window. Zero is ignored. Returns whether the size changed.
    pub fn set_max_data_points(&mut self, capacity: usize) -> bool {
        if capacity == 0 {
            tracing::debug!("ignoring window size 0");
            return false;
        }
        if self.buffer.set_capacity(capacity).is_err() {
            return false;
        }
        self.autoscale.refresh(&self.buffer.snapshot());
        self.redraw_requested = true;
        true
    }

    /// Grow the window by one step
    pub fn increase_window(&mut self) -> bool {
        let next = self.stepper.increase(self.buffer.capacity());
        self.set_max_data_points(next)
    }

    /// Shrink the window by one step. No-op at the minimum.
    pub fn decrease_window(&mut self) -> bool {
        match self.stepper.decrease(self.buffer.capacity()) {
            Some(next) => self.set_max_data_points(next),
            None => false,
        }
    }

    /// Flip autoscale. Returns the new state.
    pub fn toggle_autoscale(&mut self) -> bool {
        let enabled = self.autoscale.toggle(&self.buffer.snapshot());
        tracing::debug!("autoscale {}", if enabled { "on" } else { "off" });
        self.redraw_requested = true;
        enabled
    }

    /// Empty the window
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.redraw_requested = true;
    }

    /// Close the connection ahead of the window going away
    pub fn shutdown(&mut self) {
        if self.disconnect() {
            tracing::info!("Closed connection on shutdown");
        }
    }

    fn report(&mut self, kind: DiagnosticKind, error: &ScopeError) {
        if kind == DiagnosticKind::Transport {
            tracing::error!("{}", error);
        }
        if self.diagnostics.len() == self.max_diagnostics {
            self.diagnostics.pop_front();
        }
        self.diagnostics.push_back(Diagnostic::new(kind, error.to_string()));
        self.redraw_requested = true;
    }
}
