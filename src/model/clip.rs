//! Clip and playlist data as handed out by the clip source

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque clip identifier, unique within a playlist
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(String);

impl ClipId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One playable audio item
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    pub id: ClipId,
    pub title: String,
    pub creator_name: String,
    pub audio_url: String,
    pub cover_image_url: Option<String>,
    /// Advisory only; the loaded audio resource reports the real duration
    pub duration_seconds: f64,
}

/// Ordered, immutable sequence of clips. Cheap to clone and share with views.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Playlist {
    clips: Arc<[Clip]>,
}

impl Playlist {
    pub fn new(clips: Vec<Clip>) -> Self {
        Self { clips: clips.into() }
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.clips.len().checked_sub(1)
    }

    /// Sum of advisory durations, used for the header summary
    pub fn total_seconds(&self) -> f64 {
        self.clips.iter().map(|c| c.duration_seconds).sum()
    }
}

impl From<Vec<Clip>> for Playlist {
    fn from(clips: Vec<Clip>) -> Self {
        Self::new(clips)
    }
}

#[cfg(test)]
pub(crate) fn test_clip(n: usize) -> Clip {
    Clip {
        id: ClipId::new(format!("clip-{n}")),
        title: format!("Clip {n}"),
        creator_name: format!("Creator {n}"),
        audio_url: format!("https://cdn.example.test/clip-{n}.mp3"),
        cover_image_url: None,
        duration_seconds: 100.0,
    }
}

#[cfg(test)]
pub(crate) fn test_playlist(len: usize) -> Playlist {
    Playlist::new((0..len).map(test_clip).collect())
}
