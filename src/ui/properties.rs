// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation edit panel.
//!
//! This module provides the panel for choosing the target track, editing
//! the text fields and tone tags, and adding, updating or deleting
//! annotations.

use crate::models::annotation::ToneOption;
use crate::models::session::EditorSession;
use crate::models::track::TrackId;

/// Result of edit panel interaction.
pub enum PropertiesAction {
    None,
    ChooseTrack(TrackId),
    Submit,
    ClearSelection,
    DeleteSelected,
}

/// Display the edit panel. Text and tag edits go straight into `session.fields`.
pub fn show(ui: &mut egui::Ui, session: &mut EditorSession) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    let tracks: Vec<(TrackId, String)> = session
        .tracks()
        .ordered()
        .iter()
        .map(|track| (track.id, track.name.clone()))
        .collect();
    let chosen = session.chosen_track();
    let has_selection = session.selection().is_some();

    ui.heading("Annotation");
    ui.separator();

    let chosen_name = chosen
        .and_then(|id| tracks.iter().find(|(track, _)| *track == id))
        .map(|(_, name)| name.clone())
        .unwrap_or_else(|| "Select Track".to_string());
    egui::ComboBox::from_id_source("track_chooser")
        .selected_text(chosen_name)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for (id, name) in &tracks {
                if ui.selectable_label(chosen == Some(*id), name).clicked() {
                    action = PropertiesAction::ChooseTrack(*id);
                }
            }
        });

    ui.add_space(4.0);

    let fields = &mut session.fields;
    for (value, hint) in [
        (&mut fields.transcription, "Transcription"),
        (&mut fields.transliteration, "Transliteration"),
        (&mut fields.translation, "Translation"),
    ] {
        ui.add(
            egui::TextEdit::singleline(value)
                .hint_text(hint)
                .desired_width(f32::INFINITY),
        );
    }

    ui.add_space(4.0);

    egui::Grid::new("tone_options")
        .num_columns(2)
        .spacing([4.0, 4.0])
        .show(ui, |ui| {
            for (i, option) in ToneOption::ALL.iter().enumerate() {
                let selected = fields.options.contains(option);
                if ui.selectable_label(selected, option.label()).clicked() {
                    fields.toggle_option(*option);
                }
                if i % 2 == 1 {
                    ui.end_row();
                }
            }
        });

    ui.add_space(8.0);

    let submit_label = if has_selection { "Update Annotation" } else { "Add Annotation" };
    let can_submit = !fields.is_blank();
    if ui
        .add_enabled(can_submit, egui::Button::new(submit_label).min_size([ui.available_width(), 0.0].into()))
        .clicked()
    {
        action = PropertiesAction::Submit;
    }

    if has_selection {
        ui.horizontal(|ui| {
            if ui.button("Clear Selection").clicked() {
                action = PropertiesAction::ClearSelection;
            }
            if ui.button("🗑 Delete").clicked() {
                action = PropertiesAction::DeleteSelected;
            }
        });
    }

    action
}
