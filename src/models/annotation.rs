// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the time-ranged annotations that live on a track,
//! the fixed tone vocabulary, and the editable field set shown in the
//! edit panel.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Stable identity of an annotation for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tone tags an annotation can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToneOption {
    Determination,
    Calmness,
    Tiredness,
    Boredom,
    Relief,
    Joy,
    Amusement,
    Anxiety,
    Anger,
    Disgust,
    Sadness,
    Pain,
    Fear,
    Awe,
    Surprise,
    Interest,
    Neutral,
    Triumph,
}

impl ToneOption {
    /// Every option, in display order.
    pub const ALL: [ToneOption; 18] = [
        ToneOption::Determination,
        ToneOption::Calmness,
        ToneOption::Tiredness,
        ToneOption::Boredom,
        ToneOption::Relief,
        ToneOption::Joy,
        ToneOption::Amusement,
        ToneOption::Anxiety,
        ToneOption::Anger,
        ToneOption::Disgust,
        ToneOption::Sadness,
        ToneOption::Pain,
        ToneOption::Fear,
        ToneOption::Awe,
        ToneOption::Surprise,
        ToneOption::Interest,
        ToneOption::Neutral,
        ToneOption::Triumph,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToneOption::Determination => "Determination",
            ToneOption::Calmness => "Calmness",
            ToneOption::Tiredness => "Tiredness",
            ToneOption::Boredom => "Boredom",
            ToneOption::Relief => "Relief",
            ToneOption::Joy => "Joy",
            ToneOption::Amusement => "Amusement",
            ToneOption::Anxiety => "Anxiety",
            ToneOption::Anger => "Anger",
            ToneOption::Disgust => "Disgust",
            ToneOption::Sadness => "Sadness",
            ToneOption::Pain => "Pain",
            ToneOption::Fear => "Fear",
            ToneOption::Awe => "Awe",
            ToneOption::Surprise => "Surprise",
            ToneOption::Interest => "Interest",
            ToneOption::Neutral => "Neutral",
            ToneOption::Triumph => "Triumph",
        }
    }
}

/// The user-editable text and tags of an annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationFields {
    pub transcription: String,
    pub transliteration: String,
    pub translation: String,
    pub options: BTreeSet<ToneOption>,
}

impl AnnotationFields {
    /// True when none of the three text fields has content.
    pub fn is_blank(&self) -> bool {
        self.transcription.is_empty()
            && self.transliteration.is_empty()
            && self.translation.is_empty()
    }

    /// Add the option if absent, remove it otherwise.
    pub fn toggle_option(&mut self, option: ToneOption) {
        if !self.options.remove(&option) {
            self.options.insert(option);
        }
    }
}

/// A labelled time range on a track.
///
/// The serialized form is the exported document record; the id is
/// session-local and regenerated on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(skip)]
    pub id: AnnotationId,
    pub transcription: String,
    pub transliteration: String,
    pub translation: String,
    pub options: BTreeSet<ToneOption>,
    pub start: f64,
    pub end: f64,
}

impl Annotation {
    /// Create an annotation covering `[start, end)` from the given fields.
    pub fn new(fields: AnnotationFields, start: f64, end: f64) -> Self {
        Self {
            id: AnnotationId::new(),
            transcription: fields.transcription,
            transliteration: fields.transliteration,
            translation: fields.translation,
            options: fields.options,
            start,
            end,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Copy of the editable fields, as loaded into the edit panel.
    pub fn fields(&self) -> AnnotationFields {
        AnnotationFields {
            transcription: self.transcription.clone(),
            transliteration: self.transliteration.clone(),
            translation: self.translation.clone(),
            options: self.options.clone(),
        }
    }

    /// Overwrite the editable fields, leaving the time range alone.
    pub fn apply_fields(&mut self, fields: AnnotationFields) {
        self.transcription = fields.transcription;
        self.transliteration = fields.transliteration;
        self.translation = fields.translation;
        self.options = fields.options;
    }
}
