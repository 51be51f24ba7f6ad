// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the editor session, forwards UI actions to
//! it, and drives the background requests to the annotation service.

use crate::cli::Args;
use crate::config::EditorConfig;
use crate::io::media::{self, AudioSource};
use crate::io::remote::{RemoteClient, RemoteReply, RemoteRequest, RemoteState};
use crate::io::serialization;
use crate::models::session::EditorSession;
use crate::ui::timeline::{TimelineAction, TrackNameEdit};
use crate::ui::{debug, properties, timeline, toolbar};
use std::path::PathBuf;

/// Main application state.
pub struct TonetrackApp {
    /// Tracks, annotations, playback and interaction state
    session: EditorSession,

    /// Currently loaded audio, if any
    audio: Option<AudioSource>,

    /// Service client and request bookkeeping
    client: RemoteClient,
    remote: RemoteState,

    /// Track whose name is being edited
    name_edit: Option<TrackNameEdit>,

    /// Duration field contents in the toolbar
    duration_input: f64,

    /// Whether the document panel is visible
    show_debug: bool,

    /// Last informational message for the status bar
    status_message: Option<String>,
}

impl TonetrackApp {
    /// Create the application and kick off the initial audio fetch.
    pub fn new(config: EditorConfig, args: &Args) -> Self {
        let session = EditorSession::new(config.default_duration_secs, config.snap_mode);
        let duration_input = session.total_duration();
        let mut app = Self {
            session,
            audio: None,
            client: RemoteClient::new(config),
            remote: RemoteState::default(),
            name_edit: None,
            duration_input,
            show_debug: false,
            status_message: None,
        };

        if let Some(path) = &args.import {
            app.import_annotations(path.clone());
        }

        if args.offline {
            log::info!("Offline mode, skipping initial audio fetch");
        } else {
            // A failed first load stays out of the status bar.
            let request = RemoteRequest::FetchAudio {
                id: args.audio_id.clone(),
            };
            app.remote.start(&app.client, request, true);
        }
        app
    }

    /// Pick a local audio file, load it, and send it to the service.
    fn open_audio_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("MP3 audio", &["mp3"])
            .pick_file()
        else {
            return;
        };

        match media::load_audio_file(&path) {
            Ok(Some(source)) => {
                self.set_audio(source.clone());
                self.remote
                    .start(&self.client, RemoteRequest::SubmitAudio(source), false);
            }
            Ok(None) => {}
            Err(e) => log::error!("Failed to load audio: {:#}", e),
        }
    }

    fn set_audio(&mut self, source: AudioSource) {
        log::info!("Audio source '{}' ({} bytes)", source.name, source.len());
        self.status_message = Some(format!("Loaded {}", source.name));
        self.audio = Some(source);
        self.session.media_loaded();
    }

    fn fetch_audio(&mut self) {
        let request = RemoteRequest::FetchAudio {
            id: self.remote.audio_id.clone(),
        };
        self.remote.start(&self.client, request, false);
    }

    /// Send the current document to the service under the current audio id.
    fn save_to_service(&mut self) {
        let Some(id) = self.remote.audio_id.clone() else {
            log::warn!("Save requested without an audio id");
            self.remote.error = Some("No audio id yet: load or submit audio first".to_string());
            return;
        };
        match serialization::to_json_string(&self.session) {
            Ok(json_data) => {
                self.remote
                    .start(&self.client, RemoteRequest::SaveJson { id, json_data }, false);
            }
            Err(e) => log::error!("Failed to serialize annotations: {:#}", e),
        }
    }

    fn handle_reply(&mut self, reply: RemoteReply) {
        match reply {
            RemoteReply::AudioFetched { id, audio } => {
                self.remote.audio_id = Some(id);
                self.set_audio(audio);
            }
            RemoteReply::AudioSubmitted { id } => {
                log::info!("Audio stored as {}", id);
                self.status_message = Some(format!("Audio id: {}", id));
                self.remote.audio_id = Some(id);
            }
            RemoteReply::JsonSaved => {
                self.status_message = Some("Annotations saved".to_string());
            }
        }
    }

    /// Export annotations to a file.
    fn export_annotations(&mut self, path: PathBuf) {
        match serialization::export_to_path(&self.session, &path) {
            Ok(()) => {
                log::info!("Exported annotations to {}", path.display());
                self.status_message = Some(format!("Exported {}", path.display()));
            }
            Err(e) => log::error!("Failed to export annotations: {:#}", e),
        }
    }

    /// Import annotations from a file, replacing all tracks.
    fn import_annotations(&mut self, path: PathBuf) {
        let result = serialization::import_from_path(&path)
            .and_then(|document| serialization::apply_document(&mut self.session, document));
        match result {
            Ok(()) => {
                log::info!("Imported annotations from {}", path.display());
                self.name_edit = None;
                self.status_message = Some(format!("Imported {}", path.display()));
            }
            Err(e) => log::error!("Failed to import annotations: {:#}", e),
        }
    }

    fn apply_timeline_action(&mut self, action: TimelineAction) {
        match action {
            TimelineAction::SetContainerWidth(width) => self.session.set_container_width(width),
            TimelineAction::PointerDown(target, point) => self.session.pointer_down(target, point),
            TimelineAction::PointerMove(point) => self.session.pointer_move(point),
            TimelineAction::PointerUp => self.session.pointer_up(),
            TimelineAction::PointerLeave => self.session.pointer_leave(),
            TimelineAction::Click(target) => self.session.click(target),
            TimelineAction::ReorderTrack(track, direction) => {
                self.session.reorder_track(track, direction);
            }
            TimelineAction::DeleteTrack(track) => {
                self.session.delete_track(track);
            }
            TimelineAction::RenameTrack(track, name) => {
                self.session.rename_track(track, &name);
            }
        }
    }
}

impl eframe::App for TonetrackApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed requests
        if let Some(reply) = self.remote.poll() {
            self.handle_reply(reply);
        }

        // Advance playback
        if self.session.clock().is_playing() {
            let dt = ctx.input(|i| i.stable_dt) as f64;
            self.session.tick(dt);
        }

        // Keep repainting while something moves on its own
        if self.session.clock().is_playing() || self.remote.is_loading() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Audio...").clicked() {
                        self.open_audio_file();
                        ui.close_menu();
                    }
                    if ui.button("Fetch Audio").clicked() {
                        self.fetch_audio();
                        ui.close_menu();
                    }
                    if ui.button("Save to Service").clicked() {
                        self.save_to_service();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Load Annotations...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Annotations", &["json", "yaml", "yml"])
                            .pick_file()
                        {
                            self.import_annotations(path);
                        }
                        ui.close_menu();
                    }
                    ui.menu_button("Export Annotations", |ui| {
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("annotation_data.json")
                                .save_file()
                            {
                                self.export_annotations(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("annotation_data.yaml")
                                .save_file()
                            {
                                self.export_annotations(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui.button("Add Track").clicked() {
                        self.session.add_track();
                        ui.close_menu();
                    }
                    let has_selection = self.session.selection().is_some();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete Selected"))
                        .clicked()
                    {
                        self.session.delete_selected();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Zoom In").clicked() {
                        self.session.zoom_in();
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out").clicked() {
                        self.session.zoom_out();
                        ui.close_menu();
                    }
                    ui.checkbox(&mut self.show_debug, "Document Panel");
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &self.session, &mut self.duration_input))
            .inner;
        match toolbar_action {
            toolbar::ToolbarAction::TogglePlayback => self.session.toggle_playback(),
            toolbar::ToolbarAction::Seek(time) => self.session.seek(time),
            toolbar::ToolbarAction::SetDuration(duration) => {
                if !self.session.set_total_duration(duration) {
                    self.duration_input = self.session.total_duration();
                }
            }
            toolbar::ToolbarAction::ZoomIn => self.session.zoom_in(),
            toolbar::ToolbarAction::ZoomOut => self.session.zoom_out(),
            toolbar::ToolbarAction::None => {}
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(label) = self.remote.pending_label() {
                    ui.spinner();
                    ui.label(format!("Waiting for {}...", label));
                } else if let Some(error) = &self.remote.error {
                    ui.colored_label(egui::Color32::from_rgb(220, 38, 38), error);
                    if ui.small_button("✖").clicked() {
                        self.remote.error = None;
                    }
                } else if let Some(message) = &self.status_message {
                    ui.label(message);
                } else {
                    ui.label("Ready");
                }
                ui.separator();
                match &self.audio {
                    Some(audio) => ui.label(format!("Audio: {}", audio.name)),
                    None => ui.label("No audio loaded"),
                };
                if let Some(id) = &self.remote.audio_id {
                    ui.separator();
                    ui.label(format!("Id: {}", id));
                }
            });
        });

        // Document panel (bottom)
        if self.show_debug {
            egui::TopBottomPanel::bottom("document")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| debug::show(ui, &self.session));
        }

        // Edit panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| properties::show(ui, &mut self.session))
            .inner;
        match properties_action {
            properties::PropertiesAction::ChooseTrack(track) => self.session.choose_track(track),
            properties::PropertiesAction::Submit => {
                self.session.submit_fields();
            }
            properties::PropertiesAction::ClearSelection => self.session.clear_selection(),
            properties::PropertiesAction::DeleteSelected => {
                self.session.delete_selected();
            }
            properties::PropertiesAction::None => {}
        }

        // Keyboard shortcuts, only when no text field is focused
        if !ctx.wants_keyboard_input() {
            let (delete, escape, space) = ctx.input(|i| {
                (
                    i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                    i.key_pressed(egui::Key::Escape),
                    i.key_pressed(egui::Key::Space),
                )
            });
            if delete {
                self.session.delete_selected();
            }
            if escape {
                self.session.clear_selection();
            }
            if space {
                self.session.toggle_playback();
            }
        }

        // Timeline (center)
        let timeline_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let actions = egui::ScrollArea::vertical()
                    .id_source("timeline_tracks")
                    .show(ui, |ui| timeline::show(ui, &self.session, &mut self.name_edit))
                    .inner;
                ui.add_space(8.0);
                if ui.button("➕ Add Track").clicked() {
                    self.session.add_track();
                }
                actions
            })
            .inner;
        for action in timeline_actions {
            self.apply_timeline_action(action);
        }
    }
}
