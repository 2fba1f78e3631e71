//! The interactive view state behind one mounted map.

use log::{debug, info};

use crate::config::MapConfig;
use crate::dispatch::{DispatchTable, PopupContent};
use crate::error::LoadError;
use crate::index::{FeatureIndex, RegistryIndex};
use crate::model::{Feature, FeatureRef, LayerId, LayerStyle, LoadState, Pixel, RegionFilter};
use crate::projection::from_lon_lat;
use crate::state::{
    Camera, Cursor, HighlightTracker, HoverBadge, LayerRegistry, LayerToggles, PopupController, PopupPlacement,
    PopupState, apply_toggles,
};

pub const HIGHLIGHT_STROKE: &str = "rgba(255, 255, 255, 0.9)";
pub const HIGHLIGHT_WIDTH: f64 = 3.0;

/// Popup as the view needs it: where its bottom-centre goes and what it says.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub x: f64,
    pub y: f64,
    pub content: PopupContent,
}

/// Everything the overlay components render, taken after each event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapUi {
    pub cursor: Cursor,
    pub badge: HoverBadge,
    pub popup: Option<PopupView>,
}

pub struct MapSession {
    pub config: MapConfig,
    pub registry: LayerRegistry,
    pub camera: Camera,
    highlight: HighlightTracker,
    popup: PopupController,
    badge: HoverBadge,
    toggles: LayerToggles,
    region: RegionFilter,
    attached: bool,
}

impl MapSession {
    pub fn new(config: MapConfig) -> Self {
        let [lon, lat] = config.center;
        let camera = Camera::new(from_lon_lat(lon, lat), config.zoom, config.min_zoom, config.max_zoom);
        let placement = PopupPlacement {
            offset: (config.popup.offset[0], config.popup.offset[1]),
        };
        let session = Self {
            registry: LayerRegistry::new(config.layers()),
            camera,
            highlight: HighlightTracker::new(LayerStyle::Outline {
                stroke: HIGHLIGHT_STROKE.into(),
                stroke_width: HIGHLIGHT_WIDTH,
            }),
            popup: PopupController::new(DispatchTable::default(), placement),
            badge: HoverBadge::default(),
            toggles: LayerToggles::default(),
            region: RegionFilter::All,
            attached: true,
            config,
        };
        info!("Map initialized");
        session
    }

    pub fn index(&self) -> RegistryIndex<'_> {
        RegistryIndex::new(
            &self.registry,
            &self.camera.viewport,
            self.config.marker_extent_px(),
            self.config.hit_tolerance_px,
        )
    }

    pub fn pick(&self, pixel: Pixel) -> Option<FeatureRef> {
        self.index().pick_top_feature(pixel)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.camera.viewport.set_size(width, height);
    }

    pub fn press(&mut self, pixel: Pixel) {
        self.camera.press(pixel);
    }

    /// Pointer motion. A drag pans and hides the popup, anything else hovers.
    /// Returns true when the canvas needs a redraw.
    pub fn pointer_move(&mut self, pixel: Pixel) -> bool {
        if self.camera.drag_to(pixel) {
            self.popup.hide();
            return true;
        }
        let picked = self.pick(pixel);
        self.hover(picked)
    }

    /// Feeds one pick result to the highlight and the badge.
    pub fn hover(&mut self, picked: Option<FeatureRef>) -> bool {
        self.badge = HoverBadge::from_pick(picked.as_deref());
        self.highlight.update(picked)
    }

    /// Ends a press; a release without drag selects what is under it.
    pub fn release(&mut self, pixel: Pixel) -> bool {
        if !self.camera.release() {
            return false;
        }
        let picked = self.pick(pixel);
        self.select(picked, pixel);
        true
    }

    pub fn select(&mut self, picked: Option<FeatureRef>, pixel: Pixel) {
        let clicked = self.camera.viewport.pixel_to_coordinate(pixel);
        self.popup.select(picked.as_ref(), clicked);
    }

    pub fn wheel(&mut self, at: Pixel, delta_y: f64) {
        self.camera.wheel(at, delta_y);
    }

    pub fn dismiss_popup(&mut self) {
        self.popup.dismiss();
    }

    /// Pans so the measured popup panel lies inside the canvas.
    pub fn auto_pan(&mut self, size: (f64, f64)) -> bool {
        let Some(anchor) = self.popup.state().anchor() else {
            return false;
        };
        let (dx, dy) =
            self.popup
                .placement
                .auto_pan_delta(&self.camera.viewport, anchor, size, self.config.popup.auto_pan_margin);
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.camera.viewport.pan_by_pixels(dx, dy);
        true
    }

    pub fn apply_toggles(&mut self, toggles: LayerToggles) -> bool {
        self.toggles = toggles;
        let changed = apply_toggles(&toggles, &mut self.registry);
        for id in &changed {
            info!("{} layer {}", id.label(), if toggles.get(*id) { "shown" } else { "hidden" });
        }
        let stale = self
            .highlight
            .current()
            .is_some_and(|f| !self.registry.is_visible(f.layer));
        if stale {
            self.hover(None);
        }
        !changed.is_empty()
    }

    pub fn set_region(&mut self, region: RegionFilter) {
        self.region = region;
        debug!("region filter set to {}", region.value());
    }

    /// Installs a finished load. Ignored once the session is torn down.
    pub fn finish_load(&mut self, id: LayerId, result: Result<Vec<Feature>, LoadError>) -> Option<LoadState> {
        if !self.attached {
            debug!("dropping {} load after teardown", id.label());
            return None;
        }
        self.registry.finish_load(id, result)
    }

    pub fn highlight(&self) -> &HighlightTracker {
        &self.highlight
    }

    pub fn popup(&self) -> &PopupState {
        self.popup.state()
    }

    pub fn badge(&self) -> &HoverBadge {
        &self.badge
    }

    pub fn toggles(&self) -> LayerToggles {
        self.toggles
    }

    pub fn region(&self) -> RegionFilter {
        self.region
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn snapshot(&self) -> MapUi {
        let state = self.popup.state();
        let popup = state.anchor().filter(|_| state.visible()).map(|anchor| {
            let p = self.popup.placement.attach_point(&self.camera.viewport, anchor);
            PopupView {
                x: p.x,
                y: p.y,
                content: state.content().clone(),
            }
        });
        MapUi {
            cursor: self.highlight.cursor(),
            badge: self.badge.clone(),
            popup,
        }
    }

    /// Detaches the session: layers emptied, highlight and popup cleared.
    pub fn teardown(&mut self) {
        self.attached = false;
        self.highlight.clear();
        self.popup.dismiss();
        self.badge = HoverBadge::default();
        self.registry.clear();
        info!("Map torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttrValue, Attributes};
    use crate::state::highlight::HighlightState;
    use geo_types::{Geometry, Point, polygon};
    use std::collections::HashMap;

    fn session() -> MapSession {
        let mut s = MapSession::new(MapConfig::default());
        s.resize(800.0, 600.0);
        s
    }

    fn feature(layer: LayerId, geometry: Geometry<f64>, attrs: &[(&str, &str)]) -> Feature {
        let properties: Attributes = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), AttrValue::Text(v.to_string())))
            .collect();
        Feature::new(layer, geometry, properties)
    }

    /// Square polygon covering `half` pixels around (x, y) in the session's view.
    fn square(s: &MapSession, x: f64, y: f64, half: f64) -> Geometry<f64> {
        let vp = &s.camera.viewport;
        let a = vp.pixel_to_coordinate(Pixel::new(x - half, y - half));
        let b = vp.pixel_to_coordinate(Pixel::new(x + half, y + half));
        Geometry::Polygon(polygon![
            (x: a.x, y: a.y),
            (x: b.x, y: a.y),
            (x: b.x, y: b.y),
            (x: a.x, y: b.y),
        ])
    }

    fn point(s: &MapSession, x: f64, y: f64) -> Geometry<f64> {
        Geometry::Point(Point::from(s.camera.viewport.pixel_to_coordinate(Pixel::new(x, y))))
    }

    fn loaded() -> MapSession {
        let mut s = session();
        let area = feature(LayerId::Boundary, square(&s, 400.0, 300.0, 150.0), &[("DESA", "Tampan"), ("OBJECTID", "7")]);
        let flood = feature(LayerId::Flood, point(&s, 300.0, 200.0), &[("Nama_Pemetaan", "Rumbai"), ("Jumlah_Korban", "12")]);
        let waste = feature(LayerId::Waste, point(&s, 100.0, 500.0), &[("type", "TPS"), ("status", "Aktif")]);
        s.finish_load(LayerId::Boundary, Ok(vec![area]));
        s.finish_load(LayerId::Flood, Ok(vec![flood]));
        s.finish_load(LayerId::Waste, Ok(vec![waste]));
        s
    }

    fn click(s: &mut MapSession, x: f64, y: f64) {
        s.press(Pixel::new(x, y));
        s.release(Pixel::new(x, y));
    }

    struct StubIndex(HashMap<(i64, i64), FeatureRef>);

    impl FeatureIndex for StubIndex {
        fn pick_top_feature(&self, pixel: Pixel) -> Option<FeatureRef> {
            self.0.get(&(pixel.x as i64, pixel.y as i64)).cloned()
        }
    }

    #[test]
    fn stub_index_drives_highlight_and_badge() {
        let mut s = session();
        let a = FeatureRef::new(feature(LayerId::Boundary, point(&s, 0.0, 0.0), &[("kelurahan", "Simpang Baru")]));
        let b = FeatureRef::new(feature(LayerId::Flood, point(&s, 0.0, 0.0), &[]));
        let stub = StubIndex(HashMap::from([((1, 1), a.clone()), ((2, 2), b.clone())]));

        s.hover(stub.pick_top_feature(Pixel::new(1.0, 1.0)));
        assert_eq!(s.badge().text, "Simpang Baru");
        assert_eq!(s.snapshot().cursor, Cursor::Pointer);

        s.hover(stub.pick_top_feature(Pixel::new(2.0, 2.0)));
        assert_eq!(s.highlight().overlay().features(), &[b]);
        assert_eq!(s.badge().text, "Hover pada fitur");

        s.hover(stub.pick_top_feature(Pixel::new(9.0, 9.0)));
        assert_eq!(s.highlight().state(), &HighlightState::Idle);
        assert!(!s.badge().visible);
        assert_eq!(s.snapshot().cursor, Cursor::Default);
    }

    #[test]
    fn hover_picks_the_topmost_feature() {
        let mut s = loaded();
        assert!(s.pointer_move(Pixel::new(300.0, 190.0)));
        assert_eq!(s.badge().text, "Rumbai");
        assert!(s.pointer_move(Pixel::new(450.0, 350.0)));
        assert_eq!(s.badge().text, "Tampan");
        assert!(!s.pointer_move(Pixel::new(451.0, 350.0)));
        assert!(s.pointer_move(Pixel::new(700.0, 50.0)));
        assert!(s.highlight().current().is_none());
    }

    #[test]
    fn clicking_a_point_anchors_at_the_point() {
        let mut s = loaded();
        click(&mut s, 305.0, 185.0);
        let popup = s.popup();
        assert!(popup.visible());
        let anchor = s.camera.viewport.coordinate_to_pixel(popup.anchor().unwrap());
        assert!((anchor.x - 300.0).abs() < 1e-6 && (anchor.y - 200.0).abs() < 1e-6);
        assert_eq!(popup.content().to_string(), "Nama Daerah: Rumbai\nJumlah Korban: 12");

        let view = s.snapshot().popup.unwrap();
        assert!((view.x - 300.0).abs() < 1e-6);
        assert!((view.y - 190.0).abs() < 1e-6);
    }

    #[test]
    fn clicking_an_area_anchors_at_the_click() {
        let mut s = loaded();
        click(&mut s, 500.0, 420.0);
        let anchor = s.camera.viewport.coordinate_to_pixel(s.popup().anchor().unwrap());
        assert!((anchor.x - 500.0).abs() < 1e-6 && (anchor.y - 420.0).abs() < 1e-6);
        assert_eq!(s.popup().content().to_string(), "Desa: Tampan\nID: 7");
    }

    #[test]
    fn clicking_empty_space_or_the_close_control_dismisses() {
        let mut s = loaded();
        click(&mut s, 100.0, 490.0);
        assert_eq!(s.popup().content().to_string(), "Tipe: TPS\nStatus: Aktif");
        click(&mut s, 700.0, 50.0);
        assert!(!s.popup().visible());
        assert!(s.snapshot().popup.is_none());

        click(&mut s, 100.0, 490.0);
        s.dismiss_popup();
        assert!(!s.popup().visible());
        assert!(s.popup().anchor().is_none());
    }

    #[test]
    fn dragging_pans_hides_popup_and_does_not_select() {
        let mut s = loaded();
        click(&mut s, 100.0, 490.0);
        let before = s.camera.viewport.center;
        s.press(Pixel::new(600.0, 100.0));
        assert!(s.pointer_move(Pixel::new(640.0, 120.0)));
        assert!(!s.popup().visible());
        assert!(!s.release(Pixel::new(640.0, 120.0)));
        assert_ne!(s.camera.viewport.center, before);
        assert!(!s.popup().visible());
    }

    #[test]
    fn hiding_a_layer_makes_it_unpickable() {
        let mut s = loaded();
        s.pointer_move(Pixel::new(300.0, 190.0));
        assert_eq!(s.badge().text, "Rumbai");
        assert!(s.apply_toggles(LayerToggles::default().toggled(LayerId::Flood)));
        assert!(s.highlight().current().is_none());
        s.pointer_move(Pixel::new(300.0, 190.0));
        assert_eq!(s.badge().text, "Tampan");
        assert!(s.registry.is_visible(LayerId::Waste));
        assert!(!s.apply_toggles(s.toggles()));
    }

    #[test]
    fn hiding_the_highlighted_layer_resets_the_cursor() {
        let mut s = loaded();
        assert!(s.pointer_move(Pixel::new(300.0, 190.0)));
        let hovering = s.snapshot();
        assert_eq!(hovering.cursor, Cursor::Pointer);

        assert!(s.apply_toggles(LayerToggles::default().toggled(LayerId::Flood)));
        let hidden = s.snapshot();
        assert_eq!(hidden.cursor, Cursor::Default);
        assert_eq!(hidden.cursor.css(), "");
        assert!(!hidden.badge.visible);
        // the view re-syncs from this snapshot; no later move has to fix it up
        assert_ne!(hidden, hovering);
        assert!(!s.pointer_move(Pixel::new(700.0, 50.0)));
        assert_eq!(s.snapshot(), hidden);
    }

    #[test]
    fn a_failed_layer_leaves_the_rest_usable() {
        let mut s = session();
        let flood = feature(LayerId::Flood, point(&s, 300.0, 200.0), &[("Nama_Pemetaan", "Rumbai")]);
        let err = LoadError::Fetch {
            url: "/data/polygon_riau.json".into(),
            reason: "offline".into(),
        };
        assert_eq!(s.finish_load(LayerId::Boundary, Err(err)), Some(LoadState::Error));
        assert_eq!(s.finish_load(LayerId::Flood, Ok(vec![flood])), Some(LoadState::Ready));
        s.pointer_move(Pixel::new(400.0, 300.0));
        assert!(!s.badge().visible);
        s.pointer_move(Pixel::new(300.0, 190.0));
        assert_eq!(s.badge().text, "Rumbai");
    }

    #[test]
    fn auto_pan_brings_popup_into_view() {
        let mut s = loaded();
        click(&mut s, 300.0, 190.0);
        assert!(!s.auto_pan((200.0, 100.0)));
        assert!(s.auto_pan((200.0, 250.0)));
        let view = s.snapshot().popup.unwrap();
        assert!((view.y - 250.0 - 20.0).abs() < 1e-6);
    }

    #[test]
    fn region_filter_is_inert() {
        let mut s = loaded();
        s.set_region(RegionFilter::Tampan);
        assert_eq!(s.region(), RegionFilter::Tampan);
        assert!(s.registry.iter().filter(|l| l.is_vector()).all(|l| l.features.len() == 1));
    }

    #[test]
    fn teardown_clears_and_ignores_late_loads() {
        let mut s = loaded();
        s.pointer_move(Pixel::new(300.0, 190.0));
        click(&mut s, 300.0, 190.0);
        s.teardown();
        assert!(!s.is_attached());
        assert!(s.highlight().overlay().features().is_empty());
        assert_eq!(s.snapshot(), MapUi::default());
        assert!(s.registry.iter().all(|l| l.features.is_empty()));

        let late = feature(LayerId::Waste, point(&s, 1.0, 1.0), &[]);
        assert_eq!(s.finish_load(LayerId::Waste, Ok(vec![late])), None);
        assert!(s.registry.iter().all(|l| l.features.is_empty()));
    }
}
