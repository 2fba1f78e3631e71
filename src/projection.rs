//! Web Mercator projection and the pixel <-> map coordinate transform of the
//! visible viewport.

use geo_types::Coord;

use crate::model::Pixel;

/// Equatorial radius used by EPSG:3857.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the width of the projected world in metres.
pub const HALF_WORLD: f64 = std::f64::consts::PI * EARTH_RADIUS;

/// Resolution (metres per pixel) of zoom level 0 with 256px tiles.
pub const MAX_RESOLUTION: f64 = 2.0 * HALF_WORLD / 256.0;

pub const TILE_SIZE: f64 = 256.0;

/// Projects a longitude/latitude pair (degrees) into EPSG:3857.
pub fn from_lon_lat(lon: f64, lat: f64) -> Coord<f64> {
    let x = EARTH_RADIUS * lon.to_radians();
    let lat = lat.clamp(-85.051_128_779_806_59, 85.051_128_779_806_59);
    let y = EARTH_RADIUS * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Coord { x, y }
}

pub fn resolution_for_zoom(zoom: f64) -> f64 {
    MAX_RESOLUTION / 2f64.powf(zoom)
}

/// Visible part of the map: centre, zoom and canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center: Coord<f64>,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: Coord<f64>, zoom: f64, (width, height): (f64, f64)) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    pub fn resolution(&self) -> f64 {
        resolution_for_zoom(self.zoom)
    }

    pub fn coordinate_to_pixel(&self, c: Coord<f64>) -> Pixel {
        let res = self.resolution();
        Pixel {
            x: self.width / 2.0 + (c.x - self.center.x) / res,
            y: self.height / 2.0 - (c.y - self.center.y) / res,
        }
    }

    pub fn pixel_to_coordinate(&self, p: Pixel) -> Coord<f64> {
        let res = self.resolution();
        Coord {
            x: self.center.x + (p.x - self.width / 2.0) * res,
            y: self.center.y - (p.y - self.height / 2.0) * res,
        }
    }

    /// Moves the content by `(dx, dy)` pixels, as a drag would.
    pub fn pan_by_pixels(&mut self, dx: f64, dy: f64) {
        let res = self.resolution();
        self.center.x -= dx * res;
        self.center.y += dy * res;
    }

    /// Changes zoom while keeping the coordinate under `anchor` in place.
    pub fn zoom_at(&mut self, anchor: Pixel, zoom: f64) {
        let fixed = self.pixel_to_coordinate(anchor);
        self.zoom = zoom;
        let res = self.resolution();
        self.center = Coord {
            x: fixed.x - (anchor.x - self.width / 2.0) * res,
            y: fixed.y + (anchor.y - self.height / 2.0) * res,
        };
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// XYZ tiles covering the viewport at the nearest integer zoom.
    pub fn visible_tiles(&self) -> Vec<TileCoord> {
        let z = self.zoom.round().clamp(0.0, 19.0) as u32;
        let n = 1i64 << z;
        let tile_span = 2.0 * HALF_WORLD / n as f64;
        let top_left = self.pixel_to_coordinate(Pixel::new(0.0, 0.0));
        let bottom_right = self.pixel_to_coordinate(Pixel::new(self.width, self.height));
        let to_col = |x: f64| ((x + HALF_WORLD) / tile_span).floor() as i64;
        let to_row = |y: f64| ((HALF_WORLD - y) / tile_span).floor() as i64;
        let (c0, c1) = (to_col(top_left.x).max(0), to_col(bottom_right.x).min(n - 1));
        let (r0, r1) = (to_row(top_left.y).max(0), to_row(bottom_right.y).min(n - 1));
        let mut tiles = Vec::new();
        for y in r0..=r1 {
            for x in c0..=c1 {
                tiles.push(TileCoord {
                    z,
                    x: x as u32,
                    y: y as u32,
                });
            }
        }
        tiles
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    /// Map extent `(min_x, min_y, max_x, max_y)` of the tile.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        let span = 2.0 * HALF_WORLD / (1u64 << self.z) as f64;
        let min_x = -HALF_WORLD + self.x as f64 * span;
        let max_y = HALF_WORLD - self.y as f64 * span;
        (min_x, max_y - span, min_x + span, max_y)
    }

    pub fn url(&self, template: &str) -> String {
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}
