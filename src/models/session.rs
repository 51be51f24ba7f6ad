// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor session state.
//!
//! [`EditorSession`] owns everything the timeline needs: the track
//! registry, the annotation store, the playback clock, the viewport, the
//! edit panel fields, the selection and the active pointer interaction.
//! The UI only reads from it and calls its commands, so every behavior here
//! can be exercised without a rendering surface.

use super::annotation::{Annotation, AnnotationFields, AnnotationId};
use super::interaction::{AnnotationRef, HitTarget, Interaction, SnapMode, TimelinePoint};
use super::playback::PlaybackClock;
use super::store::{fit_range, AnnotationStore};
use super::track::{ReorderDirection, TrackId, TrackRegistry};
use crate::constants::{
    DEFAULT_ANNOTATION_DURATION, DEFAULT_TOTAL_DURATION, DEFAULT_TRACK_HEIGHT, GRID_INTERVAL,
    MAX_ZOOM, MIN_ZOOM, RESIZE_HANDLE_WIDTH, TRACK_HANDLE_HEIGHT, ZOOM_STEP,
};
use crate::util::geometry::{pixel_to_time, snap_to_grid, time_to_pixel};

/// Horizontal extent of the lanes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineViewport {
    /// Visible width of the lane area in pixels.
    pub container_width: f32,
    pub zoom: f32,
}

impl Default for TimelineViewport {
    fn default() -> Self {
        Self {
            container_width: 0.0,
            zoom: 1.0,
        }
    }
}

impl TimelineViewport {
    /// Full lane width at the current zoom.
    pub fn timeline_width(&self) -> f32 {
        self.container_width * self.zoom
    }
}

/// The whole editable state of one annotation session.
#[derive(Debug, Clone)]
pub struct EditorSession {
    tracks: TrackRegistry,
    store: AnnotationStore,
    clock: PlaybackClock,
    viewport: TimelineViewport,
    interaction: Interaction,
    selection: Option<AnnotationRef>,
    chosen_track: Option<TrackId>,
    snap_mode: SnapMode,
    /// Edit panel contents.
    pub fields: AnnotationFields,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_DURATION, SnapMode::default())
    }
}

impl EditorSession {
    /// Fresh session with the default tracks.
    pub fn new(total_duration: f64, snap_mode: SnapMode) -> Self {
        let tracks = TrackRegistry::with_default_tracks();
        let mut store = AnnotationStore::new();
        for track in tracks.tracks() {
            store.ensure_track(track.id);
        }
        let chosen_track = tracks.first().map(|track| track.id);
        Self {
            tracks,
            store,
            clock: PlaybackClock::new(total_duration),
            viewport: TimelineViewport::default(),
            interaction: Interaction::Idle,
            selection: None,
            chosen_track,
            snap_mode,
            fields: AnnotationFields::default(),
        }
    }

    pub fn tracks(&self) -> &TrackRegistry {
        &self.tracks
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn viewport(&self) -> TimelineViewport {
        self.viewport
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn selection(&self) -> Option<AnnotationRef> {
        self.selection
    }

    pub fn chosen_track(&self) -> Option<TrackId> {
        self.chosen_track
    }

    pub fn snap_mode(&self) -> SnapMode {
        self.snap_mode
    }

    pub fn total_duration(&self) -> f64 {
        self.clock.duration()
    }

    pub fn timeline_position(&self) -> f64 {
        self.clock.position()
    }

    // ---- playback --------------------------------------------------------

    pub fn seek(&mut self, time: f64) {
        self.clock.seek(time);
    }

    pub fn toggle_playback(&mut self) {
        self.clock.toggle();
    }

    pub fn tick(&mut self, dt: f64) {
        self.clock.tick(dt);
    }

    /// New media was loaded; rewind and stop.
    pub fn media_loaded(&mut self) {
        self.clock.reset();
    }

    /// Apply a media-reported duration and pull annotations inside it.
    pub fn set_total_duration(&mut self, duration: f64) -> bool {
        if !self.clock.set_duration(duration) {
            return false;
        }
        self.store.clamp_to_duration(duration);
        log::info!("Timeline duration set to {:.2}s", duration);
        true
    }

    // ---- viewport --------------------------------------------------------

    pub fn set_container_width(&mut self, width: f32) {
        self.viewport.container_width = width.max(0.0);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom = (self.viewport.zoom * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom = (self.viewport.zoom / ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn timeline_width(&self) -> f32 {
        self.viewport.timeline_width()
    }

    pub fn time_to_pixel(&self, time: f64) -> f32 {
        time_to_pixel(time, self.total_duration(), self.timeline_width())
    }

    /// Left offset and width of an annotation box.
    pub fn annotation_span(&self, annotation: &Annotation) -> (f32, f32) {
        let left = self.time_to_pixel(annotation.start);
        let right = self.time_to_pixel(annotation.end);
        (left, right - left)
    }

    fn pointer_time(&self, x: f32) -> f64 {
        let time = pixel_to_time(x, self.total_duration(), self.timeline_width());
        match self.snap_mode {
            SnapMode::Live => snap_to_grid(time, GRID_INTERVAL).min(self.total_duration()),
            SnapMode::OnRelease => time,
        }
    }

    // ---- tracks ----------------------------------------------------------

    pub fn choose_track(&mut self, track: TrackId) {
        if self.tracks.contains(track) {
            self.chosen_track = Some(track);
        }
    }

    pub fn add_track(&mut self) -> TrackId {
        let id = self.tracks.add();
        self.store.ensure_track(id);
        if self.chosen_track.is_none() {
            self.chosen_track = Some(id);
        }
        id
    }

    pub fn rename_track(&mut self, track: TrackId, name: &str) -> bool {
        self.tracks.rename(track, name)
    }

    /// Remove a track together with its annotations.
    pub fn delete_track(&mut self, track: TrackId) -> bool {
        if self.tracks.remove(track).is_none() {
            return false;
        }
        let dropped = self.store.remove_track(track);
        log::debug!("Dropped {} annotations with track {}", dropped.len(), track);

        if self.selection.is_some_and(|sel| sel.track == track) {
            self.clear_selection();
        }
        if self.chosen_track == Some(track) {
            self.chosen_track = self.tracks.first().map(|t| t.id);
        }
        if self.interaction.track() == Some(track) {
            self.interaction = Interaction::Idle;
        }
        true
    }

    pub fn reorder_track(&mut self, track: TrackId, direction: ReorderDirection) -> bool {
        self.tracks.reorder(track, direction)
    }

    pub fn resize_track(&mut self, track: TrackId, height: f32) -> bool {
        self.tracks.resize(track, height)
    }

    // ---- edit panel ------------------------------------------------------

    /// Load an annotation into the edit panel and remember it as selected.
    pub fn select_annotation(&mut self, target: AnnotationRef) -> bool {
        let Some(annotation) = self.store.get(target.track, target.annotation) else {
            log::warn!("Selected annotation {} no longer exists", target.annotation);
            return false;
        };
        self.fields = annotation.fields();
        let start = annotation.start;
        self.clock.seek(start);
        self.chosen_track = Some(target.track);
        self.selection = Some(target);
        true
    }

    /// Reset the edit panel and drop the selection.
    pub fn clear_selection(&mut self) {
        self.fields = AnnotationFields::default();
        self.selection = None;
    }

    /// Update the selected annotation, or create one on the chosen track at
    /// the timeline position.
    pub fn submit_fields(&mut self) -> Option<AnnotationId> {
        if self.fields.is_blank() {
            log::debug!("Ignoring submit with empty fields");
            return None;
        }
        if let Some(selected) = self.selection {
            if !self
                .store
                .update(selected.track, selected.annotation, self.fields.clone())
            {
                return None;
            }
            log::info!("Updated annotation {}", selected.annotation);
            self.clear_selection();
            return Some(selected.annotation);
        }

        let Some(track) = self.chosen_track.filter(|id| self.tracks.contains(*id)) else {
            log::warn!("No track chosen for new annotation");
            return None;
        };
        let (start, end) = fit_range(
            self.timeline_position(),
            DEFAULT_ANNOTATION_DURATION,
            self.total_duration(),
        );
        if end <= start {
            log::warn!("Timeline has no room for a new annotation");
            return None;
        }
        let annotation = Annotation::new(self.fields.clone(), start, end);
        let id = self.store.add(track, annotation);
        log::info!("Added annotation {} at {:.2}s", id, start);
        self.clear_selection();
        Some(id)
    }

    /// Delete the selected annotation and reset the edit panel.
    pub fn delete_selected(&mut self) -> bool {
        let Some(selected) = self.selection else {
            return false;
        };
        let deleted = self
            .store
            .delete(selected.track, selected.annotation)
            .is_some();
        if self.interaction.annotation_target() == Some(selected) {
            self.interaction = Interaction::Idle;
        }
        self.clear_selection();
        deleted
    }

    // ---- pointer ---------------------------------------------------------

    /// Resolve what lies under a point on the lanes.
    pub fn hit_test(&self, point: TimelinePoint) -> HitTarget {
        let Some(track) = self.tracks.track_at_y(point.y) else {
            return HitTarget::Empty;
        };
        let top = self.tracks.top_offset(track.id).unwrap_or(0.0);
        if point.y >= top + track.height - TRACK_HANDLE_HEIGHT {
            return HitTarget::TrackHeightHandle(track.id);
        }
        // Later annotations are drawn on top.
        for annotation in self.store.annotations(track.id).iter().rev() {
            let (left, width) = self.annotation_span(annotation);
            let right = left + width;
            if point.x >= left && point.x <= right {
                let target = AnnotationRef::new(track.id, annotation.id);
                if point.x >= right - RESIZE_HANDLE_WIDTH.min(width / 2.0) {
                    return HitTarget::AnnotationEdge(target);
                }
                return HitTarget::AnnotationBody(target);
            }
        }
        HitTarget::Empty
    }

    /// Start an interaction on the given target.
    pub fn pointer_down(&mut self, target: HitTarget, point: TimelinePoint) {
        if !self.interaction.is_idle() {
            log::debug!("Pointer down ignored during {:?}", self.interaction);
            return;
        }
        self.interaction = match target {
            HitTarget::Empty => Interaction::Idle,
            HitTarget::AnnotationBody(target) => {
                let Some(annotation) = self.store.get(target.track, target.annotation) else {
                    log::warn!("Drag of stale annotation {}", target.annotation);
                    return;
                };
                let grab_offset = self.pointer_time(point.x) - annotation.start;
                Interaction::DraggingAnnotation {
                    target,
                    grab_offset,
                }
            }
            HitTarget::AnnotationEdge(target) => {
                if self.store.get(target.track, target.annotation).is_none() {
                    log::warn!("Resize of stale annotation {}", target.annotation);
                    return;
                }
                Interaction::ResizingAnnotation(target)
            }
            HitTarget::TrackHeightHandle(track) if self.tracks.contains(track) => {
                Interaction::ResizingTrackHeight(track)
            }
            HitTarget::TrackGrip(track) if self.tracks.contains(track) => {
                Interaction::ReorderingTrack(track)
            }
            _ => Interaction::Idle,
        };
        if !self.interaction.is_idle() {
            log::debug!("Began {:?}", self.interaction);
        }
    }

    /// Apply pointer motion to the active interaction.
    pub fn pointer_move(&mut self, point: TimelinePoint) {
        let total = self.total_duration();
        match self.interaction {
            Interaction::Idle => {}
            Interaction::DraggingAnnotation {
                target,
                grab_offset,
            } => {
                let mut new_start = self.pointer_time(point.x) - grab_offset;
                if self.snap_mode == SnapMode::Live {
                    new_start = snap_to_grid(new_start, GRID_INTERVAL);
                }
                let destination = self
                    .tracks
                    .track_at_y(point.y)
                    .map(|track| track.id)
                    .filter(|id| *id != target.track);

                let moved = match destination {
                    Some(destination) => {
                        let moved = self.store.move_across_tracks(
                            target.track,
                            target.annotation,
                            destination,
                            new_start,
                            total,
                        );
                        if moved {
                            self.retarget(target, destination, grab_offset);
                        }
                        moved
                    }
                    None => self.store.move_within_track(
                        target.track,
                        target.annotation,
                        new_start,
                        total,
                    ),
                };
                if !moved {
                    self.interaction = Interaction::Idle;
                }
            }
            Interaction::ResizingAnnotation(target) => {
                let new_end = self.pointer_time(point.x);
                if !self
                    .store
                    .resize(target.track, target.annotation, new_end, total)
                {
                    self.interaction = Interaction::Idle;
                }
            }
            Interaction::ResizingTrackHeight(track) => {
                let Some(top) = self.tracks.top_offset(track) else {
                    self.interaction = Interaction::Idle;
                    return;
                };
                self.tracks.resize(track, point.y - top);
            }
            Interaction::ReorderingTrack(track) => {
                let Some(order) = self.tracks.drop_order_at_y(track, point.y) else {
                    self.interaction = Interaction::Idle;
                    return;
                };
                if self.tracks.move_to(track, order) {
                    log::debug!("Track {} moved to position {}", track, order);
                }
            }
        }
    }

    /// Follow an annotation that changed tracks mid-drag.
    fn retarget(&mut self, previous: AnnotationRef, track: TrackId, grab_offset: f64) {
        let target = AnnotationRef::new(track, previous.annotation);
        self.interaction = Interaction::DraggingAnnotation {
            target,
            grab_offset,
        };
        if self.selection == Some(previous) {
            self.selection = Some(target);
            self.chosen_track = Some(track);
        }
    }

    /// Finish the active interaction.
    pub fn pointer_up(&mut self) {
        if let Some(target) = self.interaction.annotation_target() {
            self.store
                .finalize_snap(target.track, target.annotation, self.total_duration());
        }
        if !self.interaction.is_idle() {
            log::debug!("Ended {:?}", self.interaction);
        }
        self.interaction = Interaction::Idle;
    }

    /// The pointer left the timeline surface.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// A click without drag.
    pub fn click(&mut self, target: HitTarget) {
        match target {
            HitTarget::AnnotationBody(target) | HitTarget::AnnotationEdge(target) => {
                self.select_annotation(target);
            }
            HitTarget::Empty => self.clear_selection(),
            HitTarget::TrackHeightHandle(_) | HitTarget::TrackGrip(_) => {}
        }
    }

    // ---- document --------------------------------------------------------

    /// Track names and annotations in display order.
    pub fn document_entries(&self) -> Vec<(&str, &[Annotation])> {
        self.tracks
            .ordered()
            .into_iter()
            .map(|track| (track.name.as_str(), self.store.annotations(track.id)))
            .collect()
    }

    /// Replace all tracks and annotations, keeping entry order as track order.
    pub fn replace_tracks(&mut self, entries: Vec<(String, Vec<Annotation>)>) {
        self.tracks = TrackRegistry::new();
        self.store.clear();
        for (name, annotations) in entries {
            let track = self.tracks.add_named(name, DEFAULT_TRACK_HEIGHT);
            self.store.ensure_track(track);
            for annotation in annotations {
                self.store.add(track, annotation);
            }
        }
        self.store.clamp_to_duration(self.total_duration());
        self.interaction = Interaction::Idle;
        self.clear_selection();
        self.chosen_track = self.tracks.first().map(|track| track.id);
        log::info!(
            "Loaded {} tracks with {} annotations",
            self.tracks.len(),
            self.store.total_count()
        );
    }
}
