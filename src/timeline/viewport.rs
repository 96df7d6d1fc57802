use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// Pan and zoom of the branch-tree view.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f64,
    offset: Offset,
    drag_anchor: Option<Offset>,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            scale: 1.0,
            offset: Offset::default(),
            drag_anchor: None,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.drag_anchor = Some(Offset {
            x: x - self.offset.x,
            y: y - self.offset.y,
        });
    }

    /// Follow the pointer while a drag is in progress.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        if let Some(anchor) = self.drag_anchor {
            self.offset = Offset {
                x: x - anchor.x,
                y: y - anchor.y,
            };
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    /// Zoom by whole notches; positive zooms in.
    pub fn zoom_by(&mut self, notches: i32) {
        let target = self.scale + ZOOM_STEP * f64::from(notches);
        // Snap to tenths so repeated notches don't drift.
        self.scale = ((target * 10.0).round() / 10.0).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Wheel event: scrolling up (negative delta) zooms in one notch.
    pub fn on_wheel(&mut self, delta_y: f64) {
        if delta_y < 0.0 {
            self.zoom_by(1);
        } else if delta_y > 0.0 {
            self.zoom_by(-1);
        }
    }

    pub fn reset_view(&mut self) {
        *self = Viewport::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_stays_clamped() {
        let mut viewport = Viewport::new();

        for _ in 0..100 {
            viewport.on_wheel(-120.0);
            assert!(viewport.scale() <= MAX_SCALE);
        }
        assert_eq!(viewport.scale(), MAX_SCALE);

        for _ in 0..100 {
            viewport.on_wheel(120.0);
            assert!(viewport.scale() >= MIN_SCALE);
        }
        assert_eq!(viewport.scale(), MIN_SCALE);
    }

    #[test]
    fn test_mixed_wheel_sequence_stays_in_range() {
        let mut viewport = Viewport::new();
        let deltas = [-1.0, -1.0, 3.0, 0.0, 5.0, 5.0, 5.0, -2.0, 8.0, 8.0, 8.0, 8.0, 8.0, 8.0];

        for delta in deltas {
            viewport.on_wheel(delta);
            assert!((MIN_SCALE..=MAX_SCALE).contains(&viewport.scale()));
        }
    }

    #[test]
    fn test_notch_changes_scale_by_step() {
        let mut viewport = Viewport::new();
        viewport.on_wheel(-1.0);
        assert_eq!(viewport.scale(), 1.1);
        viewport.zoom_by(-3);
        assert_eq!(viewport.scale(), 0.8);
    }

    #[test]
    fn test_drag_moves_offset() {
        let mut viewport = Viewport::new();

        viewport.begin_drag(10.0, 10.0);
        viewport.drag_to(25.0, 5.0);
        viewport.end_drag();
        assert_eq!(viewport.offset(), Offset { x: 15.0, y: -5.0 });

        // Moving without a drag does nothing
        viewport.drag_to(100.0, 100.0);
        assert_eq!(viewport.offset(), Offset { x: 15.0, y: -5.0 });

        // A second drag continues from the current offset
        viewport.begin_drag(0.0, 0.0);
        viewport.drag_to(5.0, 5.0);
        assert_eq!(viewport.offset(), Offset { x: 20.0, y: 0.0 });
    }

    #[test]
    fn test_reset_view() {
        let mut viewport = Viewport::new();
        viewport.zoom_by(5);
        viewport.begin_drag(0.0, 0.0);
        viewport.drag_to(40.0, 40.0);

        viewport.reset_view();

        assert_eq!(viewport, Viewport::default());
    }
}
