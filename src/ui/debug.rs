// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Read-only view of the exported annotation document.

use crate::io::serialization;
use crate::models::session::EditorSession;

/// Display the current document as pretty-printed JSON.
pub fn show(ui: &mut egui::Ui, session: &EditorSession) {
    ui.heading("Document");
    ui.separator();

    let text = match serialization::to_json_string(session) {
        Ok(json) => json,
        Err(e) => format!("<failed to serialize: {}>", e),
    };

    egui::ScrollArea::vertical()
        .id_source("debug_document")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).monospace().size(11.0));
        });
}
