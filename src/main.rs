//! Live Scope - Main Entry Point
//!
//! Opens a window that plots samples streamed over a WebSocket.

use live_scope::{config::AppConfig, connection::install_tls_provider, ScopeApp, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,live_scope=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Live Scope");

    install_tls_provider();

    let (session, config) = Session::with_fallback(AppConfig::load_or_default()).map_err(|e| {
        tracing::error!("Failed to start session: {}", e);
        eframe::Error::AppCreation(Box::new(e))
    })?;
    tracing::info!("Endpoint: {}", session.endpoint());

    let ui_config = config.ui.clone();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(ui_config.window_size)
            .with_min_inner_size([480.0, 320.0])
            .with_title(&ui_config.title),
        ..Default::default()
    };

    let title = ui_config.title.clone();
    let result = eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            if ui_config.dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }

            Ok(Box::new(ScopeApp::new(cc, session, &ui_config)))
        }),
    );

    tracing::info!("Shutting down...");

    result
}
