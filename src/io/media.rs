// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Audio source loading.
//!
//! Audio arrives either as a local file picked by the user or as base64
//! bytes from the remote service. Only MPEG audio is accepted; decoding
//! and playback belong to the host platform.

use anyhow::{Context, Result};
use base64::Engine;
use std::path::Path;

/// MIME type of the only accepted upload format.
pub const AUDIO_MIME: &str = "audio/mpeg";

/// Encoded audio bytes with a display name.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl AudioSource {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Whether a file looks like an MPEG audio upload.
pub fn is_supported_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"))
}

/// Load a local audio file.
///
/// Returns `Ok(None)` for unsupported file types, which callers drop
/// without touching any state.
pub fn load_audio_file(path: &Path) -> Result<Option<AudioSource>> {
    if !is_supported_audio(path) {
        log::debug!("Ignoring unsupported audio file {}", path.display());
        return Ok(None);
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio.mp3".to_string());
    log::info!("Loaded audio file {} ({} bytes)", path.display(), bytes.len());
    Ok(Some(AudioSource { name, bytes }))
}

/// Decode audio delivered as base64 text.
pub fn decode_audio(name: impl Into<String>, encoded: &str) -> Result<AudioSource> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .context("Audio payload is not valid base64")?;
    Ok(AudioSource {
        name: name.into(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_audio(Path::new("clip.mp3")));
        assert!(is_supported_audio(Path::new("CLIP.MP3")));
        assert!(!is_supported_audio(Path::new("clip.wav")));
        assert!(!is_supported_audio(Path::new("clip")));
    }

    #[test]
    fn test_unsupported_file_is_silently_skipped() {
        // Never read, so it does not need to exist.
        let result = load_audio_file(Path::new("/nonexistent/notes.txt")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_local_file() {
        let path = std::env::temp_dir().join(format!("tonetrack-{}.mp3", std::process::id()));
        std::fs::write(&path, [0xFF, 0xFB, 0x90, 0x00]).unwrap();
        let source = load_audio_file(&path).unwrap().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(source.len(), 4);
        assert!(source.name.ends_with(".mp3"));
    }

    #[test]
    fn test_decode_audio() {
        let source = decode_audio("remote", "SUQzBAA=").unwrap();
        assert_eq!(source.bytes, b"ID3\x04\x00");
        assert!(decode_audio("remote", "not base64!").is_err());
    }
}
