//! Status bar: sample count, bounds, window statistics and the last diagnostic.

use egui::{Color32, RichText, Ui};

use crate::buffer::WindowStats;
use crate::types::{Diagnostic, DiagnosticKind, DisplayBounds};

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub samples_received: u64,
    pub window_len: usize,
    pub latest: Option<f64>,
    pub capacity: usize,
    pub bounds: DisplayBounds,
    pub autoscale_enabled: bool,
    pub stats: Option<WindowStats>,
    pub last_diagnostic: Option<&'a Diagnostic>,
}

fn diagnostic_color(kind: DiagnosticKind) -> Color32 {
    match kind {
        DiagnosticKind::Transport => Color32::RED,
        DiagnosticKind::Payload => Color32::LIGHT_RED,
        DiagnosticKind::Server => Color32::YELLOW,
    }
}

fn latest_text(latest: Option<f64>) -> String {
    match latest {
        Some(value) => format!("Last: {:.2}", value),
        None => "Last: -".to_string(),
    }
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label(RichText::new(format!("Samples: {}", ctx.samples_received)).small());

        ui.separator();

        ui.label(RichText::new(format!("Window: {}/{}", ctx.window_len, ctx.capacity)).small());

        ui.separator();

        ui.label(RichText::new(latest_text(ctx.latest)).small());

        ui.separator();

        let bounds_color = if ctx.autoscale_enabled {
            Color32::from_rgb(100, 255, 100)
        } else {
            Color32::GRAY
        };
        ui.colored_label(
            bounds_color,
            RichText::new(format!("Y: [{:.2}, {:.2}]", ctx.bounds.min, ctx.bounds.max)).small(),
        );

        if let Some(stats) = &ctx.stats {
            ui.separator();
            ui.label(
                RichText::new(format!(
                    "Min: {:.2}  Max: {:.2}  Mean: {:.2}",
                    stats.min, stats.max, stats.mean
                ))
                .small(),
            );
        }

        if let Some(diagnostic) = ctx.last_diagnostic {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(
                    diagnostic_color(diagnostic.kind),
                    RichText::new(diagnostic.to_string()).small(),
                );
            });
        }
    });
}
