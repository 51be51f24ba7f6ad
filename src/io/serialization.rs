// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation document serialization and deserialization.
//!
//! The exported document is a JSON object keyed by track name, in track
//! order, whose values are the track's annotation records. YAML carries the
//! same structure.

use crate::models::annotation::Annotation;
use crate::models::session::EditorSession;
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use std::path::Path;

/// Track name to annotations, in display order.
pub type AnnotationDocument = IndexMap<String, Vec<Annotation>>;

/// Snapshot the session's tracks and annotations.
pub fn document_from_session(session: &EditorSession) -> AnnotationDocument {
    session
        .document_entries()
        .into_iter()
        .map(|(name, annotations)| (name.to_string(), annotations.to_vec()))
        .collect()
}

/// Replace the session's tracks and annotations with a document.
pub fn apply_document(session: &mut EditorSession, document: AnnotationDocument) -> Result<()> {
    validate(&document)?;
    session.replace_tracks(document.into_iter().collect());
    Ok(())
}

fn validate(document: &AnnotationDocument) -> Result<()> {
    for (name, annotations) in document {
        if name.trim().is_empty() {
            bail!("Track with an empty name");
        }
        for (index, annotation) in annotations.iter().enumerate() {
            let valid = annotation.start.is_finite()
                && annotation.end.is_finite()
                && annotation.start >= 0.0
                && annotation.end > annotation.start;
            if !valid {
                bail!(
                    "Annotation {} on track '{}' has invalid range {}..{}",
                    index,
                    name,
                    annotation.start,
                    annotation.end
                );
            }
        }
    }
    Ok(())
}

/// Serialize the session as the pretty-printed JSON document.
pub fn to_json_string(session: &EditorSession) -> Result<String> {
    let json = serde_json::to_string_pretty(&document_from_session(session))?;
    Ok(json)
}

/// Parse a JSON document.
pub fn from_json_str(json: &str) -> Result<AnnotationDocument> {
    let document = serde_json::from_str(json).context("Invalid annotation document")?;
    Ok(document)
}

/// Export the session to YAML format.
pub fn export_yaml(session: &EditorSession, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(&document_from_session(session))?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Export the session to JSON format.
pub fn export_json(session: &EditorSession, path: &Path) -> Result<()> {
    let json = to_json_string(session)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Import a document from YAML format.
pub fn import_yaml(path: &Path) -> Result<AnnotationDocument> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = serde_yaml::from_str(&yaml).context("Invalid annotation document")?;
    Ok(document)
}

/// Import a document from JSON format.
pub fn import_json(path: &Path) -> Result<AnnotationDocument> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    from_json_str(&json)
}

/// Export by file extension (`.json`, `.yaml`, `.yml`).
pub fn export_to_path(session: &EditorSession, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(session, path),
        Some("json") => export_json(session, path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

/// Import by file extension (`.json`, `.yaml`, `.yml`).
pub fn import_from_path(path: &Path) -> Result<AnnotationDocument> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{AnnotationFields, ToneOption};
    use crate::models::interaction::SnapMode;
    use crate::models::track::ReorderDirection;

    fn populated_session() -> EditorSession {
        let mut session = EditorSession::new(300.0, SnapMode::OnRelease);
        let ids: Vec<_> = session.tracks().ordered().iter().map(|t| t.id).collect();

        session.choose_track(ids[1]);
        session.seek(12.0);
        session.fields = AnnotationFields {
            transcription: "ni hao".to_string(),
            transliteration: "nǐ hǎo".to_string(),
            translation: "hello".to_string(),
            options: [ToneOption::Joy, ToneOption::Calmness].into_iter().collect(),
        };
        session.submit_fields().unwrap();

        session.choose_track(ids[0]);
        session.seek(40.0);
        session.fields.transcription = "zai jian".to_string();
        session.submit_fields().unwrap();

        session.rename_track(ids[2], "Speaker 2");
        session.reorder_track(ids[2], ReorderDirection::Up);
        session
    }

    #[test]
    fn test_document_shape() {
        let session = populated_session();
        let json = to_json_string(&session).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["Track A", "Speaker 2", "Track B", "Track D"]);

        let record = &value["Track B"][0];
        assert_eq!(record["transcription"], "ni hao");
        assert_eq!(record["options"], serde_json::json!(["Calmness", "Joy"]));
        assert_eq!(record["start"], 12.0);
        assert_eq!(record["end"], 17.0);
        assert!(record.get("id").is_none());
    }

    #[test]
    fn test_json_round_trip_is_identical() {
        let session = populated_session();
        let exported = to_json_string(&session).unwrap();

        let mut restored = EditorSession::default();
        apply_document(&mut restored, from_json_str(&exported).unwrap()).unwrap();
        assert_eq!(to_json_string(&restored).unwrap(), exported);
        assert_eq!(restored.tracks().len(), 4);
        assert_eq!(restored.store().total_count(), 2);
    }

    #[test]
    fn test_yaml_file_round_trip() {
        let session = populated_session();
        let path = std::env::temp_dir().join(format!("tonetrack-{}.yaml", std::process::id()));
        export_to_path(&session, &path).unwrap();

        let mut restored = EditorSession::default();
        apply_document(&mut restored, import_from_path(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            to_json_string(&restored).unwrap(),
            to_json_string(&session).unwrap()
        );
    }

    #[test]
    fn test_unknown_tone_option_is_rejected() {
        let json = r#"{"Track A": [{"transcription": "", "transliteration": "",
            "translation": "", "options": ["Grumpiness"], "start": 0, "end": 5}]}"#;
        assert!(from_json_str(json).is_err());
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let json = r#"{"Track A": [{"transcription": "x", "transliteration": "",
            "translation": "", "options": [], "start": 9, "end": 5}]}"#;
        let document = from_json_str(json).unwrap();
        let mut session = EditorSession::default();
        assert!(apply_document(&mut session, document).is_err());
        // Session untouched.
        assert_eq!(session.tracks().len(), 4);
    }

    #[test]
    fn test_unsupported_extension() {
        let session = EditorSession::default();
        assert!(export_to_path(&session, Path::new("annotations.txt")).is_err());
        assert!(import_from_path(Path::new("annotations.csv")).is_err());
    }
}
