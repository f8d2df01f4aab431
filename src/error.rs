//! Error types for the Octopod client and the audio output

use thiserror::Error;

/// Errors from the Octopod REST API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport level failure (DNS, connect, timeout)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }
}

/// Errors from loading or playing a clip on the audio output
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Clip bytes could not be downloaded
    #[error("Could not fetch clip audio: {0}")]
    Fetch(String),

    /// Downloaded bytes are not a playable stream
    #[error("Could not decode clip audio: {0}")]
    Decode(String),

    /// No usable output device
    #[error("Audio output unavailable: {0}")]
    Device(String),
}

/// Turn an error into a short message for the error overlay
pub fn user_message(error: &anyhow::Error) -> String {
    if let Some(client) = error.downcast_ref::<ClientError>() {
        return match client.status() {
            Some(401) | Some(403) => {
                "Not signed in. Pass --token or set OCTOPOD_TOKEN.".to_string()
            }
            Some(404) => "Clip not found on the server.".to_string(),
            Some(429) => "Rate limited. Please wait a moment.".to_string(),
            Some(status) if status >= 500 => "Octopod server error. Try again later.".to_string(),
            _ => format!("Network error: {}", client),
        };
    }
    if let Some(audio) = error.downcast_ref::<AudioError>() {
        return audio.to_string();
    }
    format!("Error: {}", error)
}
