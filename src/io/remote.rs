// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Client for the remote annotation service.
//!
//! Three calls are supported: fetch audio, submit audio and save the
//! annotation document. Requests run on a background thread and report
//! back over a channel that the UI polls once per frame. Only one request
//! is in flight at a time; new requests are refused while one is pending.

use super::media::{decode_audio, AudioSource, AUDIO_MIME};
use crate::config::EditorConfig;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::Duration;

/// A call to the annotation service.
#[derive(Debug, Clone)]
pub enum RemoteRequest {
    FetchAudio { id: Option<String> },
    SubmitAudio(AudioSource),
    SaveJson { id: String, json_data: String },
}

impl RemoteRequest {
    fn label(&self) -> &'static str {
        match self {
            RemoteRequest::FetchAudio { .. } => "fetch audio",
            RemoteRequest::SubmitAudio(_) => "submit audio",
            RemoteRequest::SaveJson { .. } => "save annotations",
        }
    }
}

/// Successful outcome of a [`RemoteRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteReply {
    AudioFetched { id: String, audio: AudioSource },
    AudioSubmitted { id: String },
    JsonSaved,
}

/// Body of the fetch-audio response: either `{id, audio}` or `{error}`.
#[derive(Debug, Deserialize)]
struct FetchAudioResponse {
    id: Option<String>,
    audio: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitAudioResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct SaveJsonRequest<'a> {
    id: &'a str,
    json_data: &'a str,
}

fn parse_fetch_response(response: FetchAudioResponse) -> Result<(String, AudioSource)> {
    if let Some(error) = response.error {
        bail!("Service error: {}", error);
    }
    let id = response
        .id
        .ok_or_else(|| anyhow!("Fetch response missing id"))?;
    let audio = response
        .audio
        .ok_or_else(|| anyhow!("Fetch response missing audio"))?;
    let source = decode_audio(id.clone(), &audio)?;
    Ok((id, source))
}

/// Blocking HTTP client for the service endpoints.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    config: EditorConfig,
}

impl RemoteClient {
    pub fn new(config: EditorConfig) -> Self {
        Self { config }
    }

    fn http(&self) -> Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    /// Fetch an audio clip, by id or the service's default.
    pub fn fetch_audio(&self, id: Option<&str>) -> Result<(String, AudioSource)> {
        let url = self.config.endpoint(&self.config.fetch_audio_path);
        let mut request = self.http()?.get(&url);
        if let Some(id) = id {
            request = request.query(&[("id", id)]);
        }
        let response = request
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;
        let status = response.status();
        let body: FetchAudioResponse = response
            .json()
            .with_context(|| format!("Unreadable fetch response ({})", status))?;
        parse_fetch_response(body)
    }

    /// Upload raw audio bytes; returns the id assigned by the service.
    pub fn submit_audio(&self, audio: &AudioSource) -> Result<String> {
        let url = self.config.endpoint(&self.config.submit_audio_path);
        let part = reqwest::blocking::multipart::Part::bytes(audio.bytes.clone())
            .file_name(audio.name.clone())
            .mime_str(AUDIO_MIME)?;
        let form = reqwest::blocking::multipart::Form::new().part("file", part);
        let body: SubmitAudioResponse = self
            .http()?
            .post(&url)
            .multipart(form)
            .send()
            .with_context(|| format!("Failed to reach {}", url))?
            .error_for_status()?
            .json()
            .context("Unreadable submit response")?;
        Ok(body.id)
    }

    /// Store the serialized annotation document under an audio id.
    pub fn save_json(&self, id: &str, json_data: &str) -> Result<()> {
        let url = self.config.endpoint(&self.config.save_json_path);
        self.http()?
            .post(&url)
            .json(&SaveJsonRequest { id, json_data })
            .send()
            .with_context(|| format!("Failed to reach {}", url))?
            .error_for_status()?;
        Ok(())
    }

    /// Run a request to completion.
    pub fn execute(&self, request: RemoteRequest) -> Result<RemoteReply> {
        match request {
            RemoteRequest::FetchAudio { id } => {
                let (id, audio) = self.fetch_audio(id.as_deref())?;
                Ok(RemoteReply::AudioFetched { id, audio })
            }
            RemoteRequest::SubmitAudio(audio) => {
                let id = self.submit_audio(&audio)?;
                Ok(RemoteReply::AudioSubmitted { id })
            }
            RemoteRequest::SaveJson { id, json_data } => {
                self.save_json(&id, &json_data)?;
                Ok(RemoteReply::JsonSaved)
            }
        }
    }
}

struct PendingRequest {
    label: &'static str,
    /// Failures are logged but not shown.
    silent: bool,
    receiver: Receiver<Result<RemoteReply, String>>,
}

/// Loading flag, error indicator and current audio id for the UI.
#[derive(Default)]
pub struct RemoteState {
    pending: Option<PendingRequest>,
    /// Message of the last visible failure.
    pub error: Option<String>,
    /// Id of the audio the annotations belong to.
    pub audio_id: Option<String>,
}

impl RemoteState {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Label of the request in flight.
    pub fn pending_label(&self) -> Option<&'static str> {
        self.pending.as_ref().map(|pending| pending.label)
    }

    /// Send a request on a background thread.
    pub fn start(&mut self, client: &RemoteClient, request: RemoteRequest, silent: bool) -> bool {
        let client = client.clone();
        let label = request.label();
        self.start_with(label, silent, move || client.execute(request))
    }

    fn start_with<F>(&mut self, label: &'static str, silent: bool, job: F) -> bool
    where
        F: FnOnce() -> Result<RemoteReply> + Send + 'static,
    {
        if let Some(pending) = &self.pending {
            log::warn!("Ignoring {} while {} is in flight", label, pending.label);
            return false;
        }
        let (sender, receiver) = channel();
        std::thread::spawn(move || {
            let result = job().map_err(|e| format!("{:#}", e));
            let _ = sender.send(result);
        });
        self.error = None;
        self.pending = Some(PendingRequest {
            label,
            silent,
            receiver,
        });
        log::info!("Started {}", label);
        true
    }

    /// Collect the finished request, if any.
    pub fn poll(&mut self) -> Option<RemoteReply> {
        let pending = self.pending.as_ref()?;
        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err("Request worker stopped".to_string()),
        };
        let pending = self.pending.take()?;
        match result {
            Ok(reply) => {
                log::info!("Finished {}", pending.label);
                Some(reply)
            }
            Err(message) => {
                log::error!("Failed to {}: {}", pending.label, message);
                if !pending.silent {
                    self.error = Some(format!("Failed to {}: {}", pending.label, message));
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn wait(state: &mut RemoteState) -> Option<RemoteReply> {
        let started = Instant::now();
        while state.is_loading() && started.elapsed() < Duration::from_secs(5) {
            if let Some(reply) = state.poll() {
                return Some(reply);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_parse_fetch_response() {
        let body = serde_json::from_str(r#"{"id": "clip-7", "audio": "SUQz"}"#).unwrap();
        let (id, audio) = parse_fetch_response(body).unwrap();
        assert_eq!(id, "clip-7");
        assert_eq!(audio.bytes, b"ID3");

        let body = serde_json::from_str(r#"{"error": "not found"}"#).unwrap();
        let err = parse_fetch_response(body).unwrap_err();
        assert!(err.to_string().contains("not found"));

        let body = serde_json::from_str(r#"{"id": "clip-7"}"#).unwrap();
        assert!(parse_fetch_response(body).is_err());
    }

    #[test]
    fn test_save_request_shape() {
        let body = serde_json::to_value(SaveJsonRequest {
            id: "clip-7",
            json_data: "{}",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"id": "clip-7", "json_data": "{}"}));
    }

    #[test]
    fn test_reply_is_delivered() {
        let mut state = RemoteState::default();
        assert!(state.start_with("submit audio", false, || Ok(RemoteReply::AudioSubmitted {
            id: "abc".to_string()
        })));
        assert_eq!(
            wait(&mut state),
            Some(RemoteReply::AudioSubmitted { id: "abc".to_string() })
        );
        assert!(!state.is_loading());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_second_request_is_refused_while_pending() {
        let mut state = RemoteState::default();
        let (release, gate) = channel::<()>();
        assert!(state.start_with("fetch audio", false, move || {
            let _ = gate.recv();
            Ok(RemoteReply::JsonSaved)
        }));
        assert!(!state.start_with("fetch audio", false, || Ok(RemoteReply::JsonSaved)));
        assert_eq!(state.pending_label(), Some("fetch audio"));
        release.send(()).unwrap();
        assert_eq!(wait(&mut state), Some(RemoteReply::JsonSaved));
    }

    #[test]
    fn test_failures_surface_unless_silent() {
        let mut state = RemoteState::default();
        state.start_with("save annotations", false, || Err(anyhow!("connection refused")));
        assert_eq!(wait(&mut state), None);
        assert!(state.error.as_deref().unwrap().contains("connection refused"));

        let mut state = RemoteState::default();
        state.start_with("fetch audio", true, || Err(anyhow!("connection refused")));
        assert_eq!(wait(&mut state), None);
        assert!(state.error.is_none());
    }
}
