// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transport and zoom toolbar.
//!
//! This module provides the play/pause control, the position slider, the
//! media duration field and the timeline zoom buttons.

use crate::models::session::EditorSession;
use crate::util::time::format_time;

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    TogglePlayback,
    Seek(f64),
    SetDuration(f64),
    ZoomIn,
    ZoomOut,
}

/// Display the toolbar. `duration_input` holds the duration field between frames.
pub fn show(ui: &mut egui::Ui, session: &EditorSession, duration_input: &mut f64) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let play_label = if session.clock().is_playing() { "⏸" } else { "▶" };
        if ui.button(play_label).clicked() {
            action = ToolbarAction::TogglePlayback;
        }

        let mut position = session.timeline_position();
        let slider = egui::Slider::new(&mut position, 0.0..=session.total_duration())
            .step_by(0.01)
            .show_value(false);
        if ui.add_sized([360.0, 18.0], slider).changed() {
            action = ToolbarAction::Seek(position);
        }

        ui.label(format!(
            "{} / {}",
            format_time(session.timeline_position()),
            format_time(session.total_duration())
        ));

        ui.separator();

        ui.label("Duration:");
        let response = ui.add(egui::DragValue::new(duration_input).speed(1.0).suffix(" s"));
        if response.drag_stopped() || response.lost_focus() {
            action = ToolbarAction::SetDuration(*duration_input);
        }

        ui.separator();

        if ui.button("🔍-").on_hover_text("Zoom out").clicked() {
            action = ToolbarAction::ZoomOut;
        }
        if ui.button("🔍+").on_hover_text("Zoom in").clicked() {
            action = ToolbarAction::ZoomIn;
        }
        ui.label(format!("Zoom: {:.2}x", session.viewport().zoom));

        ui.separator();

        ui.label(
            egui::RichText::new(format!("Position: {:.2}s", session.timeline_position()))
                .italics()
                .weak(),
        );
    });

    action
}
