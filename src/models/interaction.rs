// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer interaction states on the timeline surface.
//!
//! At most one interaction is active at a time, so the state is a single
//! enum rather than a set of independent flags.

use super::annotation::AnnotationId;
use super::track::TrackId;
use serde::{Deserialize, Serialize};

/// Pointer position relative to the top-left corner of the track lanes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimelinePoint {
    pub x: f32,
    pub y: f32,
}

impl TimelinePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Where an annotation currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationRef {
    pub track: TrackId,
    pub annotation: AnnotationId,
}

impl AnnotationRef {
    pub fn new(track: TrackId, annotation: AnnotationId) -> Self {
        Self { track, annotation }
    }
}

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Lane background or outside every band.
    Empty,
    AnnotationBody(AnnotationRef),
    /// Right-edge resize strip of an annotation.
    AnnotationEdge(AnnotationRef),
    /// Bottom-edge strip of a track band.
    TrackHeightHandle(TrackId),
    /// Reorder grip in the label column.
    TrackGrip(TrackId),
}

/// The single active pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    DraggingAnnotation {
        target: AnnotationRef,
        /// Pointer time minus annotation start at pointer-down.
        grab_offset: f64,
    },
    ResizingAnnotation(AnnotationRef),
    ResizingTrackHeight(TrackId),
    ReorderingTrack(TrackId),
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// The annotation being dragged or resized.
    pub fn annotation_target(&self) -> Option<AnnotationRef> {
        match *self {
            Interaction::DraggingAnnotation { target, .. } => Some(target),
            Interaction::ResizingAnnotation(target) => Some(target),
            _ => None,
        }
    }

    /// The track this interaction touches, if any.
    pub fn track(&self) -> Option<TrackId> {
        match *self {
            Interaction::Idle => None,
            Interaction::DraggingAnnotation { target, .. } => Some(target.track),
            Interaction::ResizingAnnotation(target) => Some(target.track),
            Interaction::ResizingTrackHeight(track) => Some(track),
            Interaction::ReorderingTrack(track) => Some(track),
        }
    }
}

/// When pointer times are aligned to the time grid during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapMode {
    /// Follow the pointer smoothly and align on release.
    #[default]
    OnRelease,
    /// Align on every pointer move.
    Live,
}
