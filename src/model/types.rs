//! Core type definitions for the UI side of the application

use std::time::Instant;

/// Where the playlist fetch for the current session stands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TipStatus {
    Sending,
    Sent,
    Failed,
}

/// Feedback for the last tip the listener sent
#[derive(Clone, Debug)]
pub struct TipNotice {
    pub status: TipStatus,
    pub clip_title: String,
    pub amount: f64,
    pub timestamp: Instant,
}

/// UI state for the application
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub load_state: LoadState,
    pub user_email: Option<String>,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
    pub tip: Option<TipNotice>,
    /// Rows the feed is currently dragged by (negative = up)
    pub swipe_offset: i32,
}
