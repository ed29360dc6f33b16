//! Two-handle range slider driven by pointer events.
//!
//! A drag is an explicit state machine: `Idle` until a pointer goes down on
//! a handle, `Dragging` until it is released or capture is lost. Subscribers
//! hear about a drag once, when it ends, and only if it changed the range.

use crate::range::{Handle, RangeChange, RangeMapper, RangeSelection};
use chrono::NaiveDateTime;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Pointer gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    /// No gesture in progress.
    Idle,
    /// A handle is being dragged.
    Dragging {
        /// Handle under the pointer.
        handle: Handle,
        /// Selection when the gesture began.
        origin: (NaiveDateTime, NaiveDateTime),
    },
}

/// Range selection plus gesture handling and change notification.
#[derive(Debug)]
pub struct RangeSlider {
    selection: RangeSelection,
    state: DragState,
    subscribers: Vec<mpsc::UnboundedSender<RangeChange>>,
}

impl RangeSlider {
    /// Slider selecting the whole range of `mapper`.
    pub const fn new(mapper: RangeMapper) -> Self {
        Self {
            selection: RangeSelection::new(mapper),
            state: DragState::Idle,
            subscribers: Vec::new(),
        }
    }

    /// Current selection.
    pub const fn selection(&self) -> &RangeSelection {
        &self.selection
    }

    /// Current gesture state.
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Registers a listener for range changes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<RangeChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Starts dragging `handle`. An unfinished gesture is finalized first.
    pub fn pointer_down(&mut self, handle: Handle) {
        if matches!(self.state, DragState::Dragging { .. }) {
            self.finish_gesture();
        }
        self.state = DragState::Dragging {
            handle,
            origin: (self.selection.start(), self.selection.end()),
        };
        trace!(?handle, "Drag started");
    }

    /// Applies the latest pointer position to the dragged handle.
    ///
    /// Ignored while idle. Returns whether the handle moved.
    pub fn pointer_move(&mut self, position: f64) -> bool {
        match self.state {
            DragState::Dragging { handle, .. } => self.selection.move_handle(handle, position),
            DragState::Idle => false,
        }
    }

    /// Ends the gesture normally.
    pub fn pointer_up(&mut self) {
        self.finish_gesture();
    }

    /// Ends the gesture because the pointer capture went away.
    pub fn capture_lost(&mut self) {
        debug!("Pointer capture lost, ending drag");
        self.finish_gesture();
    }

    /// Click on the track outside a drag. Returns the handle that moved.
    pub fn click(&mut self, position: f64) -> Option<Handle> {
        if self.state != DragState::Idle {
            return None;
        }
        let moved = self.selection.click_track(position);
        if moved.is_some() {
            self.notify();
        }
        moved
    }

    /// Starts a drag that ends when the returned guard is dropped.
    pub fn begin_drag(&mut self, handle: Handle) -> DragSession<'_> {
        self.pointer_down(handle);
        DragSession { slider: self }
    }

    fn finish_gesture(&mut self) {
        let DragState::Dragging { origin, .. } = self.state else {
            return;
        };
        self.state = DragState::Idle;

        if origin != (self.selection.start(), self.selection.end()) {
            self.notify();
        }
    }

    fn notify(&mut self) {
        let change = self.selection.change();
        debug!(start = %change.start_date, end = %change.end_date, "Range changed");
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}

/// Scoped drag; the gesture is finalized however the scope is left.
#[derive(Debug)]
pub struct DragSession<'a> {
    slider: &'a mut RangeSlider,
}

impl DragSession<'_> {
    /// Moves the dragged handle to `position`.
    pub fn move_to(&mut self, position: f64) -> bool {
        self.slider.pointer_move(position)
    }

    /// Selection as it stands mid-drag.
    pub fn selection(&self) -> &RangeSelection {
        self.slider.selection()
    }

    /// Ends the drag now.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for DragSession<'_> {
    fn drop(&mut self) {
        self.slider.finish_gesture();
    }
}
