//! Pixel picking against the rendered layers.

use geo::{Contains, EuclideanDistance};
use geo_types::{Coord, Geometry, Point};

use crate::model::{FeatureRef, Pixel};
use crate::projection::Viewport;
use crate::state::LayerRegistry;

/// Resolves a canvas pixel to the topmost feature drawn there.
pub trait FeatureIndex {
    fn pick_top_feature(&self, pixel: Pixel) -> Option<FeatureRef>;
}

/// Hit-tests the registry's visible vector layers as drawn in `viewport`.
///
/// Layers are searched top down and features in reverse draw order. Layers
/// that are still loading, or failed to, hold no features and never match.
pub struct RegistryIndex<'a> {
    registry: &'a LayerRegistry,
    viewport: &'a Viewport,
    /// Edge length of the square point marker, anchored bottom-centre.
    marker_extent_px: f64,
    tolerance_px: f64,
}

impl<'a> RegistryIndex<'a> {
    pub fn new(registry: &'a LayerRegistry, viewport: &'a Viewport, marker_extent_px: f64, tolerance_px: f64) -> Self {
        Self {
            registry,
            viewport,
            marker_extent_px,
            tolerance_px,
        }
    }

    fn marker_hit(&self, at: Coord<f64>, pixel: Pixel) -> bool {
        let anchor = self.viewport.coordinate_to_pixel(at);
        let half = self.marker_extent_px / 2.0;
        (anchor.x - half..=anchor.x + half).contains(&pixel.x)
            && (anchor.y - self.marker_extent_px..=anchor.y).contains(&pixel.y)
    }

    fn hits(&self, geometry: &Geometry<f64>, pixel: Pixel, at: Point<f64>) -> bool {
        let tolerance = self.tolerance_px * self.viewport.resolution();
        match geometry {
            Geometry::Point(p) => self.marker_hit(p.0, pixel),
            Geometry::MultiPoint(mp) => mp.iter().any(|p| self.marker_hit(p.0, pixel)),
            Geometry::Polygon(poly) => poly.contains(&at),
            Geometry::MultiPolygon(mp) => mp.contains(&at),
            Geometry::Rect(r) => r.to_polygon().contains(&at),
            Geometry::Triangle(t) => t.to_polygon().contains(&at),
            Geometry::Line(l) => at.euclidean_distance(l) <= tolerance,
            Geometry::LineString(ls) => at.euclidean_distance(ls) <= tolerance,
            Geometry::MultiLineString(mls) => mls.iter().any(|ls| at.euclidean_distance(ls) <= tolerance),
            Geometry::GeometryCollection(gc) => gc.iter().any(|g| self.hits(g, pixel, at)),
        }
    }
}

impl FeatureIndex for RegistryIndex<'_> {
    fn pick_top_feature(&self, pixel: Pixel) -> Option<FeatureRef> {
        let at = Point::from(self.viewport.pixel_to_coordinate(pixel));
        self.registry
            .iter()
            .rev()
            .filter(|layer| layer.visible && layer.is_vector())
            .find_map(|layer| {
                layer
                    .features
                    .iter()
                    .rev()
                    .find(|f| self.hits(&f.geometry, pixel, at))
                    .cloned()
            })
    }
}
