// Camera state: the viewport plus pointer-drag bookkeeping.
use geo_types::Coord;

use crate::model::Pixel;
use crate::projection::Viewport;

/// Movement (px) allowed between press and release for it to still count as a click.
pub const DRAG_TOLERANCE_PX: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct Camera {
    pub viewport: Viewport,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Primary button is held.
    pub panning: bool,
    /// The pointer moved past the tolerance since the press.
    pub dragged: bool,
    pub press_x: f64,
    pub press_y: f64,
    pub last_x: f64,
    pub last_y: f64,
}

impl Camera {
    pub fn new(center: Coord<f64>, zoom: f64, min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            viewport: Viewport::new(center, zoom.clamp(min_zoom, max_zoom), (0.0, 0.0)),
            min_zoom,
            max_zoom,
            panning: false,
            dragged: false,
            press_x: 0.0,
            press_y: 0.0,
            last_x: 0.0,
            last_y: 0.0,
        }
    }

    pub fn press(&mut self, p: Pixel) {
        self.panning = true;
        self.dragged = false;
        self.press_x = p.x;
        self.press_y = p.y;
        self.last_x = p.x;
        self.last_y = p.y;
    }

    /// Pans when the button is held. Returns true while a drag is in progress.
    pub fn drag_to(&mut self, p: Pixel) -> bool {
        if !self.panning {
            return false;
        }
        if !self.dragged {
            let moved = (p.x - self.press_x).abs().max((p.y - self.press_y).abs());
            if moved <= DRAG_TOLERANCE_PX {
                return false;
            }
            self.dragged = true;
        }
        let dx = p.x - self.last_x;
        let dy = p.y - self.last_y;
        self.last_x = p.x;
        self.last_y = p.y;
        self.viewport.pan_by_pixels(dx, dy);
        true
    }

    /// Ends a press. Returns true when it was a click rather than a drag.
    pub fn release(&mut self) -> bool {
        let was_click = self.panning && !self.dragged;
        self.panning = false;
        self.dragged = false;
        was_click
    }

    /// Wheel zoom around the cursor; `delta_y` is the wheel event's delta.
    pub fn wheel(&mut self, at: Pixel, delta_y: f64) {
        let zoom_change = (-delta_y * 0.001).exp();
        let zoom = (self.viewport.zoom + zoom_change.log2()).clamp(self.min_zoom, self.max_zoom);
        self.viewport.zoom_at(at, zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        let mut c = Camera::new(Coord { x: 0.0, y: 0.0 }, 12.0, 2.0, 19.0);
        c.viewport.set_size(800.0, 600.0);
        c
    }

    #[test]
    fn small_jitter_is_still_a_click() {
        let mut c = camera();
        c.press(Pixel::new(100.0, 100.0));
        assert!(!c.drag_to(Pixel::new(100.5, 100.0)));
        assert!(c.release());
        assert_eq!(c.viewport.center, Coord { x: 0.0, y: 0.0 });
    }

    #[test]
    fn drag_pans_and_is_not_a_click() {
        let mut c = camera();
        c.press(Pixel::new(100.0, 100.0));
        assert!(c.drag_to(Pixel::new(110.0, 100.0)));
        assert!(c.viewport.center.x < 0.0);
        assert!(!c.release());
        assert!(!c.drag_to(Pixel::new(200.0, 200.0)));
    }

    #[test]
    fn wheel_respects_zoom_limits() {
        let mut c = camera();
        for _ in 0..200 {
            c.wheel(Pixel::new(400.0, 300.0), -500.0);
        }
        assert_eq!(c.viewport.zoom, 19.0);
        for _ in 0..200 {
            c.wheel(Pixel::new(400.0, 300.0), 500.0);
        }
        assert_eq!(c.viewport.zoom, 2.0);
    }
}
