// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-track annotation storage.
//!
//! Annotations are keyed by [`TrackId`] and addressed by [`AnnotationId`];
//! list positions are resolved on demand so that a held reference stays
//! valid across insertions and removals. Every operation that receives a
//! stale reference logs a warning and leaves the store untouched.

use super::annotation::{Annotation, AnnotationFields, AnnotationId};
use super::track::TrackId;
use crate::constants::GRID_INTERVAL;
use crate::util::geometry::snap_to_grid;
use std::collections::HashMap;

/// Place a range of `duration` seconds as close to `start` as fits in
/// `[0, total_duration]`.
pub fn fit_range(start: f64, duration: f64, total_duration: f64) -> (f64, f64) {
    let total = total_duration.max(0.0);
    let duration = duration.clamp(0.0, total);
    let start = start.clamp(0.0, total - duration);
    (start, start + duration)
}

/// Largest grid multiple not exceeding `value`.
fn grid_floor(value: f64) -> f64 {
    (value / GRID_INTERVAL).floor() * GRID_INTERVAL
}

/// Mapping from track to its annotations, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    lists: HashMap<TrackId, Vec<Annotation>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a (possibly empty) list exists for the track.
    pub fn ensure_track(&mut self, track: TrackId) {
        self.lists.entry(track).or_default();
    }

    /// Drop a track's whole list.
    pub fn remove_track(&mut self, track: TrackId) -> Vec<Annotation> {
        self.lists.remove(&track).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.lists.clear();
    }

    pub fn annotations(&self, track: TrackId) -> &[Annotation] {
        self.lists.get(&track).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, track: TrackId, id: AnnotationId) -> Option<&Annotation> {
        self.annotations(track).iter().find(|a| a.id == id)
    }

    /// Current list position of an annotation.
    pub fn index_of(&self, track: TrackId, id: AnnotationId) -> Option<usize> {
        self.annotations(track).iter().position(|a| a.id == id)
    }

    /// Number of annotations across all tracks.
    pub fn total_count(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    fn get_mut(&mut self, track: TrackId, id: AnnotationId) -> Option<&mut Annotation> {
        let found = self
            .lists
            .get_mut(&track)
            .and_then(|list| list.iter_mut().find(|a| a.id == id));
        if found.is_none() {
            log::warn!("Stale annotation reference {} on track {}", id, track);
        }
        found
    }

    /// Append an annotation to a track's list.
    pub fn add(&mut self, track: TrackId, annotation: Annotation) -> AnnotationId {
        let id = annotation.id;
        let list = self.lists.entry(track).or_default();
        list.push(annotation);
        log::debug!("Added annotation {} to track {}, {} on track", id, track, list.len());
        id
    }

    /// Replace the editable fields of an annotation.
    pub fn update(&mut self, track: TrackId, id: AnnotationId, fields: AnnotationFields) -> bool {
        match self.get_mut(track, id) {
            Some(annotation) => {
                annotation.apply_fields(fields);
                true
            }
            None => false,
        }
    }

    /// Shift an annotation to a new start, keeping its duration inside the timeline.
    pub fn move_within_track(
        &mut self,
        track: TrackId,
        id: AnnotationId,
        new_start: f64,
        total_duration: f64,
    ) -> bool {
        match self.get_mut(track, id) {
            Some(annotation) => {
                let (start, end) = fit_range(new_start, annotation.duration(), total_duration);
                annotation.start = start;
                annotation.end = end;
                true
            }
            None => false,
        }
    }

    /// Move an annotation to the end of another track's list with a new start.
    pub fn move_across_tracks(
        &mut self,
        source: TrackId,
        id: AnnotationId,
        destination: TrackId,
        new_start: f64,
        total_duration: f64,
    ) -> bool {
        if source == destination {
            return self.move_within_track(source, id, new_start, total_duration);
        }
        let Some(index) = self.index_of(source, id) else {
            log::warn!("Stale annotation reference {} on track {}", id, source);
            return false;
        };
        let Some(mut annotation) = self.lists.get_mut(&source).map(|list| list.remove(index))
        else {
            return false;
        };
        let (start, end) = fit_range(new_start, annotation.duration(), total_duration);
        annotation.start = start;
        annotation.end = end;
        self.lists.entry(destination).or_default().push(annotation);
        log::debug!("Moved annotation {} from track {} to {}", id, source, destination);
        true
    }

    /// Move an annotation's right edge, keeping at least one grid step of length.
    pub fn resize(
        &mut self,
        track: TrackId,
        id: AnnotationId,
        new_end: f64,
        total_duration: f64,
    ) -> bool {
        match self.get_mut(track, id) {
            Some(annotation) => {
                let min_end = annotation.start + GRID_INTERVAL;
                annotation.end = new_end.max(min_end).min(total_duration);
                if annotation.end <= annotation.start {
                    annotation.start = (annotation.end - GRID_INTERVAL).max(0.0);
                }
                true
            }
            None => false,
        }
    }

    /// Remove an annotation.
    pub fn delete(&mut self, track: TrackId, id: AnnotationId) -> Option<Annotation> {
        let Some(index) = self.index_of(track, id) else {
            log::warn!("Delete of stale annotation {} on track {}", id, track);
            return None;
        };
        self.lists.get_mut(&track).map(|list| list.remove(index))
    }

    /// Snap both edges to the time grid, keeping the range valid.
    pub fn finalize_snap(&mut self, track: TrackId, id: AnnotationId, total_duration: f64) -> bool {
        let Some(annotation) = self.get_mut(track, id) else {
            return false;
        };
        let limit = grid_floor(total_duration);
        if limit < GRID_INTERVAL {
            // Timeline shorter than one grid step; nothing to align to.
            let (start, end) = fit_range(annotation.start, annotation.duration(), total_duration);
            annotation.start = start;
            annotation.end = end;
            return true;
        }
        let mut start = snap_to_grid(annotation.start, GRID_INTERVAL).clamp(0.0, limit);
        let mut end = snap_to_grid(annotation.end, GRID_INTERVAL).min(limit);
        if end - start < GRID_INTERVAL {
            end = (start + GRID_INTERVAL).min(limit);
            start = end - GRID_INTERVAL;
        }
        annotation.start = start;
        annotation.end = end;
        true
    }

    /// Pull every annotation back inside a (new) timeline length.
    pub fn clamp_to_duration(&mut self, total_duration: f64) {
        // Same limit as finalize_snap so clamped bounds stay on the grid.
        let limit = match grid_floor(total_duration) {
            limit if limit >= GRID_INTERVAL => limit,
            _ => total_duration,
        };
        for annotation in self.lists.values_mut().flatten() {
            let (start, end) = fit_range(annotation.start, annotation.duration(), limit);
            annotation.start = start;
            annotation.end = end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOTAL: f64 = 300.0;

    fn annotation(start: f64, end: f64) -> Annotation {
        let fields = AnnotationFields {
            transcription: "word".to_string(),
            ..Default::default()
        };
        Annotation::new(fields, start, end)
    }

    fn is_on_grid(value: f64) -> bool {
        (value / GRID_INTERVAL).fract() == 0.0
    }

    #[test]
    fn test_fit_range() {
        assert_eq!(fit_range(10.0, 5.0, TOTAL), (10.0, 15.0));
        assert_eq!(fit_range(-3.0, 5.0, TOTAL), (0.0, 5.0));
        assert_eq!(fit_range(298.0, 5.0, TOTAL), (295.0, 300.0));
        assert_eq!(fit_range(2.0, 10.0, 4.0), (0.0, 4.0));
    }

    #[test]
    fn test_move_within_track_clamps() {
        let mut store = AnnotationStore::new();
        let track = TrackId::new();
        let id = store.add(track, annotation(10.0, 15.0));

        assert!(store.move_within_track(track, id, 297.0, TOTAL));
        let moved = store.get(track, id).unwrap();
        assert_eq!((moved.start, moved.end), (295.0, 300.0));

        assert!(store.move_within_track(track, id, -20.0, TOTAL));
        let moved = store.get(track, id).unwrap();
        assert_eq!((moved.start, moved.end), (0.0, 5.0));
    }

    #[test]
    fn test_move_across_tracks_is_atomic() {
        let mut store = AnnotationStore::new();
        let a = TrackId::new();
        let b = TrackId::new();
        let id = store.add(a, annotation(10.0, 15.0));
        store.add(b, annotation(0.0, 2.0));
        let before = store.total_count();

        assert!(store.move_across_tracks(a, id, b, 12.0, TOTAL));
        assert_eq!(store.total_count(), before);
        assert!(store.annotations(a).is_empty());
        assert_eq!(store.index_of(b, id), Some(1));
        let moved = store.get(b, id).unwrap();
        assert_eq!((moved.start, moved.end), (12.0, 17.0));

        // The old location is stale now.
        assert!(!store.move_across_tracks(a, id, b, 20.0, TOTAL));
        assert_eq!(store.total_count(), before);
    }

    #[test]
    fn test_resize_keeps_minimum_length() {
        let mut store = AnnotationStore::new();
        let track = TrackId::new();
        let id = store.add(track, annotation(10.0, 15.0));

        assert!(store.resize(track, id, 3.0, TOTAL));
        assert_eq!(store.get(track, id).unwrap().end, 11.0);

        assert!(store.resize(track, id, 500.0, TOTAL));
        assert_eq!(store.get(track, id).unwrap().end, TOTAL);
    }

    #[test]
    fn test_finalize_snap_aligns_to_grid() {
        let mut store = AnnotationStore::new();
        let track = TrackId::new();
        let id = store.add(track, annotation(10.4, 15.4));
        let near_end = store.add(track, annotation(295.6, 299.9));

        assert!(store.finalize_snap(track, id, TOTAL));
        let snapped = store.get(track, id).unwrap();
        assert_eq!((snapped.start, snapped.end), (10.0, 15.0));

        assert!(store.finalize_snap(track, near_end, 299.5));
        let snapped = store.get(track, near_end).unwrap();
        assert!(is_on_grid(snapped.start) && is_on_grid(snapped.end));
        assert!(snapped.start < snapped.end && snapped.end <= 299.5);
    }

    #[test]
    fn test_finalize_snap_never_collapses() {
        let mut store = AnnotationStore::new();
        let track = TrackId::new();
        let id = store.add(track, annotation(10.4, 10.6));
        store.finalize_snap(track, id, TOTAL);
        let snapped = store.get(track, id).unwrap();
        assert_eq!(snapped.end - snapped.start, GRID_INTERVAL);
    }

    #[test]
    fn test_stale_references_are_noops() {
        let mut store = AnnotationStore::new();
        let track = TrackId::new();
        let id = store.add(track, annotation(10.0, 15.0));
        let unknown = AnnotationId::new();

        assert!(!store.update(track, unknown, AnnotationFields::default()));
        assert!(!store.move_within_track(track, unknown, 0.0, TOTAL));
        assert!(!store.resize(TrackId::new(), id, 20.0, TOTAL));
        assert!(store.delete(track, unknown).is_none());
        assert_eq!(store.total_count(), 1);
    }

    #[test]
    fn test_delete_keeps_other_references_valid() {
        let mut store = AnnotationStore::new();
        let track = TrackId::new();
        let first = store.add(track, annotation(0.0, 5.0));
        let second = store.add(track, annotation(10.0, 15.0));

        assert!(store.delete(track, first).is_some());
        assert_eq!(store.index_of(track, second), Some(0));
        assert!(store.move_within_track(track, second, 20.0, TOTAL));
        assert_eq!(store.get(track, second).unwrap().start, 20.0);
    }

    #[test]
    fn test_clamp_to_duration() {
        let mut store = AnnotationStore::new();
        let track = TrackId::new();
        let id = store.add(track, annotation(100.0, 105.0));
        store.clamp_to_duration(60.0);
        let clamped = store.get(track, id).unwrap();
        assert_eq!((clamped.start, clamped.end), (55.0, 60.0));
    }

    #[test]
    fn test_clamp_to_fractional_duration_stays_on_grid() {
        let mut store = AnnotationStore::new();
        let track = TrackId::new();
        let late = store.add(track, annotation(200.0, 205.0));
        let early = store.add(track, annotation(10.0, 15.0));
        store.clamp_to_duration(100.5);

        let clamped = store.get(track, late).unwrap();
        assert_eq!((clamped.start, clamped.end), (95.0, 100.0));
        assert!(is_on_grid(clamped.start) && is_on_grid(clamped.end));
        let untouched = store.get(track, early).unwrap();
        assert_eq!((untouched.start, untouched.end), (10.0, 15.0));

        // Shorter than one grid step: keep inside the timeline.
        store.clamp_to_duration(0.5);
        let tiny = store.get(track, early).unwrap();
        assert!(0.0 <= tiny.start && tiny.end <= 0.5);
    }
}
