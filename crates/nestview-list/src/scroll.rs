//! # Scroll model
//!
//! A nested list scrolls along local +z. The offset is `0` with the first row
//! at the top of the viewport and goes negative as the user scrolls down the
//! content; positive values mean the list was dragged above its first row.
//!
//! Overshoot is never clamped while the user drags. Instead the controller
//! schedules a *scroll return* after each frame's walk (snap-back past the
//! end, return-to-top above the start), and the return is applied before the
//! next walk once the drag has ended.

/// Scroll offset plus the pending snap-back of one list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListScrollState {
    offset: f32,
    scroll_return: Option<f32>,
    dragging: bool,
}

impl ListScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.offset = offset;
        }
    }

    /// Move the content by `delta` (negative scrolls down the content).
    pub fn scroll_by(&mut self, delta: f32) {
        if delta.is_finite() {
            self.offset += delta;
        }
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn schedule_return(&mut self, target: f32) {
        self.scroll_return = Some(target);
    }

    pub fn pending_return(&self) -> Option<f32> {
        self.scroll_return
    }

    /// Apply a pending return unless a drag is in progress. Returns the offset
    /// it snapped to.
    pub fn apply_return(&mut self) -> Option<f32> {
        if self.dragging {
            return None;
        }
        let target = self.scroll_return.take()?;
        self.offset = target;
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_waits_for_drag_end() {
        let mut s = ListScrollState::new();
        s.begin_drag();
        s.scroll_by(-15.0);
        s.schedule_return(-8.0);
        assert_eq!(s.apply_return(), None);
        assert_eq!(s.offset(), -15.0);

        s.end_drag();
        assert_eq!(s.apply_return(), Some(-8.0));
        assert_eq!(s.offset(), -8.0);
        assert_eq!(s.pending_return(), None);
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let mut s = ListScrollState::new();
        s.scroll_by(f32::NAN);
        s.set_offset(f32::INFINITY);
        assert_eq!(s.offset(), 0.0);
    }
}
