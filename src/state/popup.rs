// Popup controller: click selection, anchoring, content and placement.

use geo_types::Coord;

use crate::dispatch::{DispatchTable, PopupContent};
use crate::model::{Feature, FeatureRef, Pixel};
use crate::projection::Viewport;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupState {
    visible: bool,
    anchor: Option<Coord<f64>>,
    content: PopupContent,
}

impl PopupState {
    fn shown(anchor: Coord<f64>, content: PopupContent) -> Self {
        Self {
            visible: true,
            anchor: Some(anchor),
            content,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn anchor(&self) -> Option<Coord<f64>> {
        self.anchor
    }

    pub fn content(&self) -> &PopupContent {
        &self.content
    }
}

/// Point features anchor at themselves, everything else where it was clicked.
pub fn anchor_for(feature: &Feature, clicked: Coord<f64>) -> Coord<f64> {
    feature.point_coordinate().unwrap_or(clicked)
}

/// Panel rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Bottom-centre positioning with a fixed pixel offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupPlacement {
    pub offset: (f64, f64),
}

impl Default for PopupPlacement {
    fn default() -> Self {
        Self {
            offset: (0.0, -10.0),
        }
    }
}

impl PopupPlacement {
    /// Canvas pixel where the panel's bottom-centre goes.
    pub fn attach_point(&self, viewport: &Viewport, anchor: Coord<f64>) -> Pixel {
        let p = viewport.coordinate_to_pixel(anchor);
        Pixel::new(p.x + self.offset.0, p.y + self.offset.1)
    }

    pub fn screen_box(&self, viewport: &Viewport, anchor: Coord<f64>, (width, height): (f64, f64)) -> ScreenBox {
        let p = self.attach_point(viewport, anchor);
        ScreenBox {
            left: p.x - width / 2.0,
            top: p.y - height,
            width,
            height,
        }
    }

    /// Pixel pan (for `Viewport::pan_by_pixels`) that brings a panel sticking
    /// out of the canvas back inside, `margin` pixels from the edge it crossed.
    pub fn auto_pan_delta(&self, viewport: &Viewport, anchor: Coord<f64>, size: (f64, f64), margin: f64) -> (f64, f64) {
        let b = self.screen_box(viewport, anchor, size);
        let right_overflow = b.left + b.width - viewport.width;
        let bottom_overflow = b.top + b.height - viewport.height;
        let dx = if b.left < 0.0 {
            margin - b.left
        } else if right_overflow > 0.0 {
            -(right_overflow + margin)
        } else {
            0.0
        };
        let dy = if b.top < 0.0 {
            margin - b.top
        } else if bottom_overflow > 0.0 {
            -(bottom_overflow + margin)
        } else {
            0.0
        };
        (dx, dy)
    }
}

#[derive(Debug, Clone)]
pub struct PopupController {
    state: PopupState,
    table: DispatchTable,
    pub placement: PopupPlacement,
}

impl PopupController {
    pub fn new(table: DispatchTable, placement: PopupPlacement) -> Self {
        Self {
            state: PopupState::default(),
            table,
            placement,
        }
    }

    /// Handles a click: `picked` is the feature under it, if any.
    pub fn select(&mut self, picked: Option<&FeatureRef>, clicked: Coord<f64>) {
        self.state = match picked {
            Some(feature) => PopupState::shown(anchor_for(feature, clicked), self.table.render(feature)),
            None => PopupState::default(),
        };
    }

    /// Close control. Same result as clicking empty space.
    pub fn dismiss(&mut self) {
        self.state = PopupState::default();
    }

    /// Hides the panel while the map is dragged.
    pub fn hide(&mut self) {
        if self.state.visible {
            self.state = PopupState::default();
        }
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }
}

impl Default for PopupController {
    fn default() -> Self {
        Self::new(DispatchTable::default(), PopupPlacement::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttrValue, Attributes, LayerId};
    use geo_types::{Geometry, point, polygon};

    fn with_attrs(geometry: Geometry<f64>, attrs: &[(&str, &str)]) -> FeatureRef {
        let properties: Attributes = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), AttrValue::Text(v.to_string())))
            .collect();
        FeatureRef::new(Feature::new(LayerId::Boundary, geometry, properties))
    }

    fn square() -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 100.0, y: 0.0),
            (x: 100.0, y: 100.0),
            (x: 0.0, y: 100.0),
        ])
    }

    #[test]
    fn point_features_anchor_at_their_coordinate() {
        let f = with_attrs(Geometry::Point(point!(x: 7.0, y: 9.0)), &[("rt", "01")]);
        let mut popup = PopupController::default();
        popup.select(Some(&f), Coord { x: 8.5, y: 10.5 });
        assert!(popup.state().visible());
        assert_eq!(popup.state().anchor(), Some(Coord { x: 7.0, y: 9.0 }));
        assert_eq!(popup.state().content().to_string(), "RT: 01");
    }

    #[test]
    fn area_features_anchor_at_the_click() {
        let f = with_attrs(square(), &[("DESA", "Tampan")]);
        let mut popup = PopupController::default();
        let click = Coord { x: 90.0, y: 10.0 };
        popup.select(Some(&f), click);
        assert_eq!(popup.state().anchor(), Some(click));
        assert_ne!(popup.state().anchor(), Some(Coord { x: 50.0, y: 50.0 }));
    }

    #[test]
    fn clicking_empty_space_dismisses() {
        let f = with_attrs(square(), &[("DESA", "Tampan")]);
        let mut popup = PopupController::default();
        popup.select(Some(&f), Coord { x: 1.0, y: 1.0 });
        popup.select(None, Coord { x: 500.0, y: 500.0 });
        assert!(!popup.state().visible());
        assert_eq!(popup.state().anchor(), None);
        assert!(popup.state().content().is_empty());
    }

    #[test]
    fn feature_without_known_keys_still_opens() {
        let f = with_attrs(square(), &[("foo", "bar")]);
        let mut popup = PopupController::default();
        popup.select(Some(&f), Coord { x: 1.0, y: 1.0 });
        assert!(popup.state().visible());
        assert!(popup.state().content().is_empty());
    }

    #[test]
    fn dismiss_and_hide_clear_anchor() {
        let f = with_attrs(square(), &[]);
        let mut popup = PopupController::default();
        popup.select(Some(&f), Coord { x: 1.0, y: 1.0 });
        popup.dismiss();
        assert_eq!(popup.state(), &PopupState::default());
        popup.select(Some(&f), Coord { x: 1.0, y: 1.0 });
        popup.hide();
        assert!(!popup.state().visible());
        assert!(popup.state().anchor().is_none());
    }

    #[test]
    fn screen_box_sits_above_anchor() {
        let vp = Viewport::new(Coord { x: 0.0, y: 0.0 }, 10.0, (800.0, 600.0));
        let b = PopupPlacement::default().screen_box(&vp, Coord { x: 0.0, y: 0.0 }, (280.0, 120.0));
        assert_eq!(b.left, 400.0 - 140.0);
        assert_eq!(b.top, 300.0 - 10.0 - 120.0);
    }

    #[test]
    fn auto_pan_only_when_panel_overflows() {
        let vp = Viewport::new(Coord { x: 0.0, y: 0.0 }, 10.0, (800.0, 600.0));
        let placement = PopupPlacement::default();
        let centre = Coord { x: 0.0, y: 0.0 };
        assert_eq!(placement.auto_pan_delta(&vp, centre, (280.0, 120.0), 20.0), (0.0, 0.0));

        // anchor 5px below the top edge: the panel sticks out above the canvas
        let near_top = vp.pixel_to_coordinate(Pixel::new(400.0, 5.0));
        let (dx, dy) = placement.auto_pan_delta(&vp, near_top, (280.0, 120.0), 20.0);
        assert_eq!(dx, 0.0);
        let top = 5.0 - 10.0 - 120.0;
        assert!((dy - (20.0 - top)).abs() < 1e-6);

        let mut panned = vp;
        panned.pan_by_pixels(dx, dy);
        let b = placement.screen_box(&panned, near_top, (280.0, 120.0));
        assert!((b.top - 20.0).abs() < 1e-6);
    }

    #[test]
    fn auto_pan_left_and_right() {
        let vp = Viewport::new(Coord { x: 0.0, y: 0.0 }, 10.0, (800.0, 600.0));
        let placement = PopupPlacement::default();
        let near_right = vp.pixel_to_coordinate(Pixel::new(790.0, 300.0));
        let (dx, _) = placement.auto_pan_delta(&vp, near_right, (280.0, 120.0), 20.0);
        assert!((dx - -(790.0 + 140.0 - 800.0 + 20.0)).abs() < 1e-6);
        let near_left = vp.pixel_to_coordinate(Pixel::new(10.0, 300.0));
        let (dx, _) = placement.auto_pan_delta(&vp, near_left, (280.0, 120.0), 20.0);
        assert!((dx - (20.0 - (10.0 - 140.0))).abs() < 1e-6);
    }
}
