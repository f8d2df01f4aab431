//! Vertical mouse drag as a swipe gesture

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::model::MountId;
use super::AppController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Dragged upward
    Next,
    /// Dragged downward
    Previous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Drag still in progress, feed offset in rows (negative = up)
    Dragging(i32),
    Commit(SwipeDirection),
    Cancelled,
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    origin_row: u16,
    offset: i32,
}

/// Tracks at most one drag at a time
#[derive(Clone, Debug)]
pub struct SwipeTracker {
    threshold: u16,
    drag: Option<Drag>,
}

impl SwipeTracker {
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold: threshold.max(1),
            drag: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.drag.is_some()
    }

    pub fn press(&mut self, row: u16) {
        self.drag = Some(Drag {
            origin_row: row,
            offset: 0,
        });
    }

    pub fn drag_to(&mut self, row: u16) -> SwipeOutcome {
        match self.drag.as_mut() {
            Some(drag) => {
                drag.offset = i32::from(row) - i32::from(drag.origin_row);
                SwipeOutcome::Dragging(drag.offset)
            }
            None => SwipeOutcome::Cancelled,
        }
    }

    pub fn release(&mut self, row: u16) -> SwipeOutcome {
        let Some(drag) = self.drag.take() else {
            return SwipeOutcome::Cancelled;
        };
        let offset = i32::from(row) - i32::from(drag.origin_row);

        if offset.unsigned_abs() < u32::from(self.threshold) {
            SwipeOutcome::Cancelled
        } else if offset < 0 {
            SwipeOutcome::Commit(SwipeDirection::Next)
        } else {
            SwipeOutcome::Commit(SwipeDirection::Previous)
        }
    }

    pub fn cancel(&mut self) {
        self.drag = None;
    }
}

impl AppController {
    pub async fn handle_mouse_event(&self, mouse: MouseEvent) {
        let outcome = {
            let mut tracker = self.swipe.lock().await;
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    tracker.press(mouse.row);
                    drop(tracker);
                    // The swipe applies to the clip that was showing when it started
                    let mount = self.model.engine().await.current_mount();
                    *self.swipe_origin.lock().await = mount;
                    return;
                }
                MouseEventKind::Drag(MouseButton::Left) => tracker.drag_to(mouse.row),
                MouseEventKind::Up(MouseButton::Left) => tracker.release(mouse.row),
                _ => return,
            }
        };

        match outcome {
            SwipeOutcome::Dragging(offset) => self.model.set_swipe_offset(offset).await,
            SwipeOutcome::Cancelled => {
                self.model.set_swipe_offset(0).await;
            }
            SwipeOutcome::Commit(direction) => {
                self.model.set_swipe_offset(0).await;
                let origin = self.swipe_origin.lock().await.take();
                if let Some(mount) = origin {
                    tracing::debug!(?direction, %mount, "Swipe committed");
                    self.swipe_from(mount, direction).await;
                }
            }
        }
    }

    /// Drop the drag in progress, if any
    pub async fn cancel_swipe(&self) -> bool {
        let mut tracker = self.swipe.lock().await;
        if !tracker.is_tracking() {
            return false;
        }
        tracker.cancel();
        drop(tracker);
        *self.swipe_origin.lock().await = None;
        self.model.set_swipe_offset(0).await;
        tracing::debug!("Swipe cancelled");
        true
    }

    pub(crate) async fn swipe_from(&self, mount: MountId, direction: SwipeDirection) {
        let mut engine = self.model.engine().await;
        let Some(index) = engine.state().current_index else {
            return;
        };
        let target = match direction {
            SwipeDirection::Next => index + 1,
            SwipeDirection::Previous => match index.checked_sub(1) {
                Some(target) => target,
                None => return,
            },
        };
        let transition = engine.jump_from(mount, target);
        self.apply_transition(&engine, transition).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    use crate::controller::testing::{CannedSource, Harness};
    use crate::model::clip::test_clip;

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 10,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn upward_drag_past_threshold_goes_to_next() {
        let mut tracker = SwipeTracker::new(3);
        tracker.press(20);
        assert_eq!(tracker.drag_to(18), SwipeOutcome::Dragging(-2));
        assert_eq!(tracker.release(16), SwipeOutcome::Commit(SwipeDirection::Next));
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn downward_drag_goes_to_previous() {
        let mut tracker = SwipeTracker::new(3);
        tracker.press(5);
        assert_eq!(tracker.release(8), SwipeOutcome::Commit(SwipeDirection::Previous));
    }

    #[test]
    fn short_drag_is_cancelled() {
        let mut tracker = SwipeTracker::new(3);
        tracker.press(10);
        assert_eq!(tracker.release(8), SwipeOutcome::Cancelled);
    }

    #[test]
    fn release_without_press_is_cancelled() {
        let mut tracker = SwipeTracker::new(3);
        assert_eq!(tracker.release(0), SwipeOutcome::Cancelled);
        assert_eq!(tracker.drag_to(4), SwipeOutcome::Cancelled);
    }

    #[test]
    fn cancel_discards_drag() {
        let mut tracker = SwipeTracker::new(3);
        tracker.press(10);
        tracker.cancel();
        assert_eq!(tracker.release(1), SwipeOutcome::Cancelled);
    }

    #[tokio::test]
    async fn swipe_up_jumps_to_next_clip() {
        let clips: Vec<_> = (0..3).map(test_clip).collect();
        let mut harness = Harness::new(CannedSource::with(clips));
        let controller = harness.controller.clone();
        controller.load_session().await;

        controller.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 20)).await;
        controller.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 15)).await;
        assert_eq!(controller.model.get_ui_state().await.swipe_offset, -5);
        controller.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 15)).await;

        let info = controller.model.get_playback_info().await;
        assert_eq!(info.snapshot.current_index, Some(1));
        assert_eq!(controller.model.get_ui_state().await.swipe_offset, 0);

        // Left the first clip at 0 s
        let event = harness.next_report().await;
        assert_eq!(event.skipped_at(), Some(0.0));
    }

    #[tokio::test]
    async fn escape_while_dragging_leaves_engine_alone() {
        let clips: Vec<_> = (0..3).map(test_clip).collect();
        let mut harness = Harness::new(CannedSource::with(clips));
        let controller = harness.controller.clone();
        controller.load_session().await;

        controller.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 20)).await;
        assert!(controller.cancel_swipe().await);
        controller.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 2)).await;

        assert_eq!(controller.model.get_playback_info().await.snapshot.current_index, Some(0));
        assert!(harness.drain_reports().await.is_empty());
    }

    #[tokio::test]
    async fn swipe_started_on_an_ended_clip_is_stale() {
        let clips: Vec<_> = (0..3).map(test_clip).collect();
        let harness = Harness::new(CannedSource::with(clips));
        let controller = harness.controller.clone();
        controller.load_session().await;

        controller.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 20)).await;
        {
            // Clip ends naturally mid-drag
            let mut engine = controller.model.engine().await;
            let mount = engine.current_mount().expect("mounted");
            let transition = engine.on_ended(mount);
            controller.apply_transition(&engine, transition).await;
        }
        controller.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 10)).await;

        assert_eq!(controller.model.get_playback_info().await.snapshot.current_index, Some(1));
    }

    #[tokio::test]
    async fn swipe_down_on_first_clip_does_nothing() {
        let clips: Vec<_> = (0..2).map(test_clip).collect();
        let harness = Harness::new(CannedSource::with(clips));
        let controller = harness.controller.clone();
        controller.load_session().await;
        harness.output.clear();

        controller.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 2)).await;
        controller.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 12)).await;

        assert_eq!(controller.model.get_playback_info().await.snapshot.current_index, Some(0));
        assert!(harness.output.calls().is_empty());
    }

    #[tokio::test]
    async fn short_drag_snaps_back_without_navigating() {
        let clips: Vec<_> = (0..3).map(test_clip).collect();
        let mut harness = Harness::new(CannedSource::with(clips));
        let controller = harness.controller.clone();
        controller.load_session().await;
        harness.output.clear();

        controller.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10)).await;
        controller.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 8)).await;
        assert_eq!(controller.model.get_ui_state().await.swipe_offset, -2);
        controller.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 8)).await;

        let info = controller.model.get_playback_info().await;
        assert_eq!(info.snapshot.current_index, Some(0));
        assert!(!info.snapshot.is_playing);
        assert_eq!(controller.model.get_ui_state().await.swipe_offset, 0);
        assert!(harness.output.calls().is_empty());
        assert!(harness.drain_reports().await.is_empty());
    }
}
