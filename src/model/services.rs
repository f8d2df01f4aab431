//! Collaborators the playback core talks to: where clips come from and
//! where engagement goes.

use futures::future::BoxFuture;

use super::clip::{Clip, ClipId};
use super::engagement::EngagementEvent;
use crate::error::ClientError;

/// Fetches the ordered clip list for a listening session
pub trait ClipSource: Send + Sync {
    fn fetch_playlist(&self, session_budget_seconds: u32) -> BoxFuture<'_, Result<Vec<Clip>, ClientError>>;
}

/// Records play/skip/tip events on the server. Best effort.
pub trait EngagementReporter: Send + Sync {
    fn report_played<'a>(&'a self, clip_id: &'a ClipId) -> BoxFuture<'a, Result<(), ClientError>>;

    fn report_skipped<'a>(
        &'a self,
        clip_id: &'a ClipId,
        at_seconds: f64,
    ) -> BoxFuture<'a, Result<(), ClientError>>;

    fn report_tip<'a>(&'a self, clip_id: &'a ClipId, amount: f64) -> BoxFuture<'a, Result<(), ClientError>>;

    fn report<'a>(&'a self, event: &'a EngagementEvent) -> BoxFuture<'a, Result<(), ClientError>> {
        match event {
            EngagementEvent::Played { clip_id, .. } => self.report_played(clip_id),
            EngagementEvent::Skipped {
                clip_id, at_seconds, ..
            } => self.report_skipped(clip_id, *at_seconds),
            EngagementEvent::Tipped { clip_id, amount, .. } => self.report_tip(clip_id, *amount),
        }
    }
}
