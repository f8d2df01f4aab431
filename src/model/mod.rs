//! Model module - Application state and data types
//!
//! - `clip`: clip and playlist data
//! - `engagement`: played/skipped/tipped events and the 60% rule
//! - `engine`: the playback state machine
//! - `services`: traits for the clip source and the engagement reporter
//! - `octopod_client`: REST client implementing both services
//! - `types`: UI state types
//! - `playback`: playback info for the view, with a smoothed clock
//! - `app_model`: main application model with state management methods

pub(crate) mod clip;
mod engagement;
mod engine;
mod services;
mod octopod_client;
mod types;
mod playback;
mod app_model;

pub use clip::{Clip, ClipId, Playlist};

pub use engagement::EngagementEvent;

pub use engine::{AdvanceReason, AudioDirective, MountId, PlaybackEngine, Transition};

pub use services::{ClipSource, EngagementReporter};

pub use octopod_client::OctopodClient;

pub use types::{LoadState, TipNotice, TipStatus, UiState};

pub use playback::PlaybackInfo;

pub use app_model::AppModel;
