//! Toolbar: connection status, connect/disconnect, window size, autoscale, reset.

use egui::{Color32, RichText, Ui};

use crate::controls::ControlAction;
use crate::session::ScopeSettings;
use crate::types::{ConnectionState, ControlState};

/// Context needed to render the toolbar.
pub struct ToolbarContext<'a> {
    pub state: ConnectionState,
    pub controls: ControlState,
    pub settings: ScopeSettings,
    pub endpoint: &'a str,
}

/// Indicator color for a connection state
pub fn status_color(state: ConnectionState) -> Color32 {
    match state {
        ConnectionState::Connected => Color32::GREEN,
        ConnectionState::Connecting => Color32::YELLOW,
        ConnectionState::Disconnected => Color32::GRAY,
    }
}

/// Render the toolbar.
///
/// Returns the actions the user asked for this frame; the app applies them.
pub fn render_toolbar(ui: &mut Ui, ctx: &ToolbarContext<'_>) -> Vec<ControlAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        render_connection_group(ui, ctx, &mut actions);

        ui.separator();

        render_window_group(ui, ctx, &mut actions);

        ui.separator();

        let autoscale_label = if ctx.settings.autoscale_enabled {
            "Autoscale: on"
        } else {
            "Autoscale: off"
        };
        if ui
            .selectable_label(ctx.settings.autoscale_enabled, autoscale_label)
            .on_hover_text("Fit the vertical axis to the samples in the window")
            .clicked()
        {
            actions.push(ControlAction::ToggleAutoscale);
        }

        if ui
            .button("Reset")
            .on_hover_text("Clear the window")
            .clicked()
        {
            actions.push(ControlAction::Reset);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(ctx.endpoint).small().weak());
        });
    });

    actions
}

fn render_connection_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<ControlAction>) {
    ui.colored_label(status_color(ctx.state), "●");
    ui.label(ctx.state.to_string());

    let connect = ui
        .add_enabled(ctx.controls.connect_enabled, egui::Button::new("Connect"))
        .on_hover_text("Open the live connection");
    if connect.clicked() {
        actions.push(ControlAction::Connect);
    }

    let disconnect = egui::Button::new(RichText::new("Disconnect").color(Color32::WHITE))
        .fill(Color32::from_rgb(150, 60, 60));
    if ui
        .add_enabled(ctx.controls.disconnect_enabled, disconnect)
        .on_hover_text("Close the live connection")
        .clicked()
    {
        actions.push(ControlAction::Disconnect);
    }
}

fn render_window_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<ControlAction>) {
    ui.label("Window:");

    if ui.button("-").on_hover_text("Show fewer samples").clicked() {
        actions.push(ControlAction::DecreaseWindow);
    }

    let mut capacity = ctx.settings.capacity;
    let response = ui.add(
        egui::DragValue::new(&mut capacity)
            .range(1..=100_000)
            .speed(1.0),
    );
    if response.changed() && capacity != ctx.settings.capacity {
        actions.push(ControlAction::SetMaxDataPoints(capacity));
    }

    if ui.button("+").on_hover_text("Show more samples").clicked() {
        actions.push(ControlAction::IncreaseWindow);
    }
}
