// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Multi-track timeline.
//!
//! This module draws the track label column and the annotation lanes and
//! turns pointer input into [`TimelineAction`]s. Positions handed to the
//! session are relative to the top-left corner of the lanes (label column
//! positions share the same vertical origin).

use crate::constants::{RESIZE_HANDLE_WIDTH, TRACK_HANDLE_HEIGHT, TRACK_LABEL_WIDTH};
use crate::models::interaction::{HitTarget, TimelinePoint};
use crate::models::session::EditorSession;
use crate::models::track::{ReorderDirection, Track, TrackId};
use crate::util::geometry::{total_tracks_height, track_top_offset};

/// In-progress edit of a track name.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackNameEdit {
    pub track: TrackId,
    pub text: String,
}

/// Result of timeline interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineAction {
    SetContainerWidth(f32),
    PointerDown(HitTarget, TimelinePoint),
    PointerMove(TimelinePoint),
    PointerUp,
    PointerLeave,
    Click(HitTarget),
    ReorderTrack(TrackId, ReorderDirection),
    DeleteTrack(TrackId),
    RenameTrack(TrackId, String),
}

const LANE_COLORS: [egui::Color32; 2] = [
    egui::Color32::from_rgb(250, 250, 252),
    egui::Color32::from_rgb(240, 242, 246),
];
const ANNOTATION_FILL: egui::Color32 = egui::Color32::from_rgb(191, 219, 254);
const ANNOTATION_BORDER: egui::Color32 = egui::Color32::from_rgb(96, 165, 250);
const ANNOTATION_HANDLE: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);
const SELECTED_BORDER: egui::Color32 = egui::Color32::from_rgb(234, 88, 12);
const TRACK_HANDLE: egui::Color32 = egui::Color32::from_rgb(156, 163, 175);
const PLAYHEAD: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);

/// Extra room below the last lane before a drag counts as leaving.
const DRAG_MARGIN_BELOW: f32 = 64.0;

/// Area a drag may roam before it counts as leaving the lanes. The
/// bottom track must be able to grow past the current lane edge.
fn drag_surface(lanes: egui::Rect) -> egui::Rect {
    egui::Rect::from_min_max(lanes.min, lanes.max + egui::vec2(0.0, DRAG_MARGIN_BELOW))
}

fn to_point(pos: egui::Pos2, origin: egui::Pos2) -> TimelinePoint {
    TimelinePoint::new(pos.x - origin.x, pos.y - origin.y)
}

/// Display the timeline and collect the resulting actions.
pub fn show(
    ui: &mut egui::Ui,
    session: &EditorSession,
    name_edit: &mut Option<TrackNameEdit>,
) -> Vec<TimelineAction> {
    let mut actions = Vec::new();
    let total_height = total_tracks_height(session.tracks().tracks()).max(1.0);

    ui.horizontal_top(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;

        let (label_rect, _) = ui.allocate_exact_size(
            egui::vec2(TRACK_LABEL_WIDTH, total_height),
            egui::Sense::hover(),
        );
        for track in session.tracks().ordered() {
            let top = track_top_offset(session.tracks().tracks(), track.order);
            let rect = egui::Rect::from_min_size(
                label_rect.min + egui::vec2(0.0, top),
                egui::vec2(TRACK_LABEL_WIDTH, track.height),
            );
            show_label(ui, rect, label_rect.min, track, name_edit, &mut actions);
        }

        let container_width = ui.available_width();
        actions.push(TimelineAction::SetContainerWidth(container_width));

        egui::ScrollArea::horizontal()
            .id_source("timeline_lanes")
            .drag_to_scroll(false)
            .show(ui, |ui| {
                show_lanes(ui, session, total_height, &mut actions);
            });
    });

    actions
}

fn show_label(
    ui: &mut egui::Ui,
    rect: egui::Rect,
    origin: egui::Pos2,
    track: &Track,
    name_edit: &mut Option<TrackNameEdit>,
    actions: &mut Vec<TimelineAction>,
) {
    ui.painter()
        .rect_filled(rect.shrink(0.5), 2.0, egui::Color32::from_gray(225));

    // Grip for drag reordering, with a stable id so the drag survives the move.
    let grip_rect = egui::Rect::from_min_size(
        rect.right_top() + egui::vec2(-16.0, 2.0),
        egui::vec2(14.0, 14.0),
    );
    let grip = ui
        .interact(grip_rect, egui::Id::new(("track_grip", track.id)), egui::Sense::drag())
        .on_hover_cursor(egui::CursorIcon::Grab);
    ui.painter().text(
        grip_rect.center(),
        egui::Align2::CENTER_CENTER,
        "☰",
        egui::FontId::proportional(12.0),
        egui::Color32::from_gray(90),
    );
    if grip.drag_started() {
        if let Some(pos) = grip.interact_pointer_pos() {
            actions.push(TimelineAction::PointerDown(
                HitTarget::TrackGrip(track.id),
                to_point(pos, origin),
            ));
        }
    } else if grip.dragged() {
        if let Some(pos) = grip.interact_pointer_pos() {
            actions.push(TimelineAction::PointerMove(to_point(pos, origin)));
        }
    }
    if grip.drag_stopped() {
        actions.push(TimelineAction::PointerUp);
    }

    let mut content = rect.shrink2(egui::vec2(4.0, 2.0));
    content.max.x = grip_rect.min.x - 2.0;
    ui.allocate_ui_at_rect(content, |ui| {
        ui.spacing_mut().item_spacing = egui::vec2(2.0, 2.0);

        let editing = name_edit.as_ref().is_some_and(|edit| edit.track == track.id);
        if editing {
            if let Some(edit) = name_edit.as_mut() {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut edit.text).desired_width(TRACK_LABEL_WIDTH - 28.0),
                );
                let (enter, escape) = ui.input(|i| {
                    (i.key_pressed(egui::Key::Enter), i.key_pressed(egui::Key::Escape))
                });
                if response.lost_focus() {
                    if enter {
                        actions.push(TimelineAction::RenameTrack(track.id, edit.text.clone()));
                    }
                    *name_edit = None;
                } else if escape {
                    *name_edit = None;
                } else {
                    response.request_focus();
                }
            }
        } else {
            let name = ui
                .add(
                    egui::Label::new(egui::RichText::new(&track.name).strong())
                        .truncate()
                        .sense(egui::Sense::click()),
                )
                .on_hover_text("Double-click to rename");
            if name.double_clicked() {
                *name_edit = Some(TrackNameEdit {
                    track: track.id,
                    text: track.name.clone(),
                });
            }
            // Short tracks have no room for the buttons below.
            name.context_menu(|ui| {
                if ui.button("Move up").clicked() {
                    actions.push(TimelineAction::ReorderTrack(track.id, ReorderDirection::Up));
                    ui.close_menu();
                }
                if ui.button("Move down").clicked() {
                    actions.push(TimelineAction::ReorderTrack(track.id, ReorderDirection::Down));
                    ui.close_menu();
                }
                if ui.button("Delete track").clicked() {
                    actions.push(TimelineAction::DeleteTrack(track.id));
                    ui.close_menu();
                }
            });
        }

        if track.height >= 48.0 {
            ui.horizontal(|ui| {
                if ui.small_button("⏶").on_hover_text("Move up").clicked() {
                    actions.push(TimelineAction::ReorderTrack(track.id, ReorderDirection::Up));
                }
                if ui.small_button("⏷").on_hover_text("Move down").clicked() {
                    actions.push(TimelineAction::ReorderTrack(track.id, ReorderDirection::Down));
                }
                if ui.small_button("🗑").on_hover_text("Delete track").clicked() {
                    actions.push(TimelineAction::DeleteTrack(track.id));
                }
            });
        }
    });
}

fn show_lanes(
    ui: &mut egui::Ui,
    session: &EditorSession,
    total_height: f32,
    actions: &mut Vec<TimelineAction>,
) {
    let width = session.timeline_width().max(1.0);
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(width, total_height), egui::Sense::click_and_drag());
    let origin = rect.min;

    // Pointer handling
    if response.drag_started() {
        let press = ui.input(|i| i.pointer.press_origin());
        if let Some(pos) = press.or_else(|| response.interact_pointer_pos()) {
            let point = to_point(pos, origin);
            actions.push(TimelineAction::PointerDown(session.hit_test(point), point));
        }
    } else if response.dragged() {
        let hovering = ui
            .input(|i| i.pointer.hover_pos())
            .is_some_and(|pos| drag_surface(rect).contains(pos));
        match response.interact_pointer_pos() {
            Some(pos) if hovering => actions.push(TimelineAction::PointerMove(to_point(pos, origin))),
            _ => actions.push(TimelineAction::PointerLeave),
        }
    }
    if response.drag_stopped() {
        actions.push(TimelineAction::PointerUp);
    }
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            actions.push(TimelineAction::Click(session.hit_test(to_point(pos, origin))));
        }
    }

    let hovered = response
        .hover_pos()
        .map(|pos| session.hit_test(to_point(pos, origin)));
    match hovered {
        Some(HitTarget::AnnotationEdge(_)) => ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal),
        Some(HitTarget::TrackHeightHandle(_)) => ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeVertical),
        Some(HitTarget::AnnotationBody(_)) => ui.ctx().set_cursor_icon(egui::CursorIcon::Move),
        _ => {}
    }

    // Drawing
    let painter = ui.painter_at(rect);
    let selection = session.selection();
    for (index, track) in session.tracks().ordered().into_iter().enumerate() {
        let top = track_top_offset(session.tracks().tracks(), track.order);
        let band = egui::Rect::from_min_size(origin + egui::vec2(0.0, top), egui::vec2(width, track.height));
        painter.rect_filled(band, 0.0, LANE_COLORS[index % 2]);

        for annotation in session.store().annotations(track.id) {
            let (left, span) = session.annotation_span(annotation);
            let body = egui::Rect::from_min_size(
                band.min + egui::vec2(left, 0.0),
                egui::vec2(span.max(1.0), track.height - TRACK_HANDLE_HEIGHT),
            );
            let selected = selection.is_some_and(|sel| sel.annotation == annotation.id);
            painter.rect_filled(body, 3.0, ANNOTATION_FILL);
            let border = if selected {
                egui::Stroke::new(2.0, SELECTED_BORDER)
            } else {
                egui::Stroke::new(1.0, ANNOTATION_BORDER)
            };
            painter.rect_stroke(body, 3.0, border);

            let handle_width = RESIZE_HANDLE_WIDTH.min(body.width() / 2.0);
            let handle = egui::Rect::from_min_max(
                egui::pos2(body.max.x - handle_width, body.min.y),
                body.max,
            );
            painter.rect_filled(handle, 2.0, ANNOTATION_HANDLE);

            let text_clip = body.shrink(2.0).intersect(rect);
            painter.with_clip_rect(text_clip).text(
                body.left_top() + egui::vec2(4.0, 4.0),
                egui::Align2::LEFT_TOP,
                &annotation.transcription,
                egui::FontId::proportional(11.0),
                egui::Color32::from_gray(30),
            );
        }

        let handle = egui::Rect::from_min_max(
            egui::pos2(band.min.x, band.max.y - TRACK_HANDLE_HEIGHT),
            band.max,
        );
        painter.rect_filled(handle, 0.0, TRACK_HANDLE);
    }

    let playhead_x = origin.x + session.time_to_pixel(session.timeline_position());
    painter.line_segment(
        [egui::pos2(playhead_x, rect.min.y), egui::pos2(playhead_x, rect.max.y)],
        egui::Stroke::new(2.0, PLAYHEAD),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_surface_extends_below_lanes() {
        let lanes = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(800.0, 256.0));
        let surface = drag_surface(lanes);

        // Just under the bottom track's height handle.
        assert!(surface.contains(egui::pos2(400.0, lanes.max.y + 20.0)));
        assert!(!surface.contains(egui::pos2(400.0, lanes.max.y + DRAG_MARGIN_BELOW + 1.0)));
        assert!(!surface.contains(egui::pos2(400.0, lanes.min.y - 1.0)));
        assert!(!surface.contains(egui::pos2(lanes.max.x + 1.0, 100.0)));
    }
}
