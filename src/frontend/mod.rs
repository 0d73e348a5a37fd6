//! Frontend module for egui UI
//!
//! [`ScopeApp`] owns the [`Session`] and the WebSocket transport. Each frame
//! it drains connection events into the session, renders the toolbar, chart
//! and status bar, then applies whatever the user clicked.
//!
//! # Layout
//!
//! - top: [`toolbar`] with connection and window controls
//! - center: [`plot`] waveform
//! - bottom: [`status_bar`]

pub mod plot;
pub mod status_bar;
pub mod toolbar;

pub use plot::{render_waveform, PlotStyle};
pub use status_bar::{render_status_bar, StatusBarContext};
pub use toolbar::{render_toolbar, ToolbarContext};

use crate::config::UiConfig;
use crate::connection::WebSocketTransport;
use crate::controls::ControlAction;
use crate::session::Session;
use crate::types::ConnectionState;

/// Main application state for the scope window
pub struct ScopeApp {
    session: Session,
    transport: WebSocketTransport,
    plot_style: PlotStyle,
}

impl ScopeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, session: Session, ui_config: &UiConfig) -> Self {
        // Wake the UI as soon as the worker thread has something to deliver
        let egui_ctx = cc.egui_ctx.clone();
        let transport = WebSocketTransport::new().with_waker(move || egui_ctx.request_repaint());

        Self {
            session,
            transport,
            plot_style: PlotStyle::from_config(ui_config),
        }
    }

    fn handle_actions(&mut self, actions: Vec<ControlAction>) {
        for action in actions {
            self.session.apply(action, &self.transport);
        }
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let handled = self.session.pump();
        if handled > 0 {
            tracing::trace!("applied {} connection events", handled);
        }

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let toolbar = ToolbarContext {
                state: self.session.state(),
                controls: self.session.controls(),
                settings: self.session.settings(),
                endpoint: self.session.endpoint(),
            };
            actions.extend(render_toolbar(ui, &toolbar));
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let settings = self.session.settings();
            let status = StatusBarContext {
                samples_received: self.session.samples_received(),
                window_len: self.session.buffer().len(),
                latest: self.session.buffer().latest(),
                capacity: settings.capacity,
                bounds: self.session.bounds(),
                autoscale_enabled: settings.autoscale_enabled,
                stats: self.session.window_stats(),
                last_diagnostic: self.session.last_diagnostic(),
            };
            render_status_bar(ui, &status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let frame = self.session.chart_frame();
            render_waveform(ui, &frame, &self.plot_style);
        });

        self.handle_actions(actions);

        let live = self.session.state() != ConnectionState::Disconnected;
        if self.session.take_redraw() || live {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.shutdown();
    }
}
