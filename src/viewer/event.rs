//=========================================================================
// Viewer Events
//=========================================================================
//
// Domain notifications published by the viewer.
//
// Events travel over a bounded crossbeam channel. The viewer never
// blocks on a slow consumer: a full channel drops the event and logs a
// warning. Hosts drain the receiver from `Viewer::events()`.
//
// Per-frame events (`Refresh`, `Draw`, `Update`) may only fill half of
// the queue. The other half is reserved for domain events, so an
// undrained render loop cannot crowd out a projection change.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use glam::Vec3;
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::projection::ProjectionKind;
use crate::core::state::ViewportSize;

//=== ViewerEvent =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// Media dimensions are known and the camera exists.
    Ready,

    /// A projection became current.
    ProjectionChanged(ProjectionKind),

    /// Coordinates were normalized for the frame.
    Refresh,

    /// A frame was drawn (or skipped while VR owns presentation).
    Draw,

    /// A full tick finished.
    Update,

    /// The field of view changed through wheel input.
    Wheel { fov: f32 },

    Size(ViewportSize),
    Resize(ViewportSize),
    LookAt(Vec3),
    Focus,
    Blur,
    VrModeChanged(bool),
    Destroyed,
}

impl ViewerEvent {
    /// Emitted on every render tick rather than on a state change.
    pub fn is_frame_event(&self) -> bool {
        matches!(self, Self::Refresh | Self::Draw | Self::Update)
    }
}

//=== EventChannel ========================================================

/// Bounded, non-blocking event queue owned by the viewer.
pub(crate) struct EventChannel {
    sender: Sender<ViewerEvent>,
    receiver: Receiver<ViewerEvent>,
    frame_limit: usize,
}

impl EventChannel {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            frame_limit: capacity - capacity / 2,
        }
    }

    /// Publishes `event`, dropping it if the queue is full.
    ///
    /// Frame events are dropped quietly once they would eat into the
    /// reserve kept for domain events.
    pub(crate) fn emit(&self, event: ViewerEvent) {
        if event.is_frame_event() && self.sender.len() >= self.frame_limit {
            trace!("Event queue backlogged, skipping {:?}", event);
            return;
        }

        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!("Event queue full, dropping {:?}", event);
            }
            Err(TrySendError::Disconnected(event)) => {
                trace!("No event receivers, dropping {:?}", event);
            }
        }
    }

    pub(crate) fn receiver(&self) -> Receiver<ViewerEvent> {
        self.receiver.clone()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_order() {
        let channel = EventChannel::new(8);
        let events = channel.receiver();

        channel.emit(ViewerEvent::Ready);
        channel.emit(ViewerEvent::Refresh);

        assert_eq!(events.try_recv(), Ok(ViewerEvent::Ready));
        assert_eq!(events.try_recv(), Ok(ViewerEvent::Refresh));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn frame_events_leave_room_for_domain_events() {
        let channel = EventChannel::new(4);
        let events = channel.receiver();

        for _ in 0..10 {
            channel.emit(ViewerEvent::Update);
        }
        assert_eq!(events.len(), 2);

        channel.emit(ViewerEvent::Focus);
        channel.emit(ViewerEvent::Blur);
        channel.emit(ViewerEvent::Destroyed);

        let queued: Vec<_> = events.try_iter().collect();
        assert_eq!(
            queued,
            vec![ViewerEvent::Update, ViewerEvent::Update, ViewerEvent::Focus, ViewerEvent::Blur]
        );
    }

    #[test]
    fn full_channel_drops_without_blocking() {
        let channel = EventChannel::new(1);
        let events = channel.receiver();

        channel.emit(ViewerEvent::Focus);
        channel.emit(ViewerEvent::Blur);

        assert_eq!(events.try_recv(), Ok(ViewerEvent::Focus));
        assert!(events.try_recv().is_err());
    }
}
