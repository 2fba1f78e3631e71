//! Canvas2D drawing of the base tiles, the thematic layers and the highlight.

use std::collections::HashMap;
use std::rc::Rc;

use geo_types::{Coord, Geometry, LineString, Polygon};
use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::model::{LayerSource, LayerStyle, Pixel};
use crate::projection::{TileCoord, Viewport};
use crate::session::MapSession;

const BACKGROUND: &str = "#e5e3df";
/// Cached tiles beyond this are dropped unless currently visible.
const TILE_CACHE_LIMIT: usize = 512;

struct CachedTile {
    image: HtmlImageElement,
    _onload: Closure<dyn FnMut()>,
}

/// Raster tiles by coordinate. A tile that finishes loading asks for a redraw.
#[derive(Default)]
pub struct TileCache {
    tiles: HashMap<TileCoord, CachedTile>,
}

impl TileCache {
    /// The tile's image once it has loaded. Starts the request on first use.
    fn image(&mut self, tile: TileCoord, template: &str, redraw: &Rc<dyn Fn()>) -> Option<&HtmlImageElement> {
        if !self.tiles.contains_key(&tile) {
            let image = match HtmlImageElement::new() {
                Ok(img) => img,
                Err(e) => {
                    warn!("cannot create tile image: {:?}", e);
                    return None;
                }
            };
            let onload = {
                let redraw = redraw.clone();
                Closure::wrap(Box::new(move || redraw()) as Box<dyn FnMut()>)
            };
            image.set_onload(Some(onload.as_ref().unchecked_ref()));
            image.set_src(&tile.url(template));
            self.tiles.insert(tile, CachedTile { image, _onload: onload });
        }
        self.tiles
            .get(&tile)
            .map(|t| &t.image)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }

    fn prune(&mut self, keep: &[TileCoord]) {
        if self.tiles.len() > TILE_CACHE_LIMIT {
            self.tiles.retain(|coord, _| keep.contains(coord));
        }
    }

    pub fn clear(&mut self) {
        for tile in self.tiles.values() {
            tile.image.set_onload(None);
        }
        self.tiles.clear();
    }
}

pub fn draw(ctx: &CanvasRenderingContext2d, session: &MapSession, tiles: &mut TileCache, redraw: &Rc<dyn Fn()>) {
    let vp = &session.camera.viewport;
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, vp.width, vp.height);

    let extent = session.config.marker_extent_px();
    for layer in session.registry.iter().filter(|l| l.visible) {
        match (&layer.source, &layer.style) {
            (LayerSource::Tiles(template), _) => draw_tiles(ctx, vp, template, tiles, redraw),
            (_, style) => {
                for feature in &layer.features {
                    draw_geometry(ctx, vp, &feature.geometry, style, extent);
                }
            }
        }
    }

    let overlay = session.highlight().overlay();
    for feature in overlay.features() {
        draw_geometry(ctx, vp, &feature.geometry, &overlay.style, extent);
    }
}

fn draw_tiles(
    ctx: &CanvasRenderingContext2d,
    vp: &Viewport,
    template: &str,
    tiles: &mut TileCache,
    redraw: &Rc<dyn Fn()>,
) {
    let visible = vp.visible_tiles();
    for tile in &visible {
        let (min_x, min_y, max_x, max_y) = tile.extent();
        let top_left = vp.coordinate_to_pixel(Coord { x: min_x, y: max_y });
        let bottom_right = vp.coordinate_to_pixel(Coord { x: max_x, y: min_y });
        if let Some(img) = tiles.image(*tile, template, redraw) {
            // half-pixel overlap hides seams between neighbours
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                top_left.x.floor(),
                top_left.y.floor(),
                (bottom_right.x - top_left.x).ceil() + 0.5,
                (bottom_right.y - top_left.y).ceil() + 0.5,
            )
            .ok();
        }
    }
    tiles.prune(&visible);
}

fn trace_ring(ctx: &CanvasRenderingContext2d, vp: &Viewport, ring: &LineString<f64>, close: bool) {
    let mut points = ring.coords().map(|c| vp.coordinate_to_pixel(*c));
    let Some(first) = points.next() else {
        return;
    };
    ctx.move_to(first.x, first.y);
    for p in points {
        ctx.line_to(p.x, p.y);
    }
    if close {
        ctx.close_path();
    }
}

fn trace_polygon(ctx: &CanvasRenderingContext2d, vp: &Viewport, poly: &Polygon<f64>) {
    trace_ring(ctx, vp, poly.exterior(), true);
    for hole in poly.interiors() {
        trace_ring(ctx, vp, hole, true);
    }
}

/// Pin outline with its tip at `at`.
fn trace_pin(ctx: &CanvasRenderingContext2d, at: Pixel, extent: f64) {
    let r = extent * 0.3;
    let cy = at.y - extent + r + extent * 0.05;
    ctx.move_to(at.x, at.y);
    ctx.arc(at.x, cy, r, 0.75 * std::f64::consts::PI, 0.25 * std::f64::consts::PI).ok();
    ctx.close_path();
}

fn draw_pin(ctx: &CanvasRenderingContext2d, at: Pixel, extent: f64, color: &str) {
    ctx.begin_path();
    trace_pin(ctx, at, extent);
    ctx.set_fill_style_str(color);
    ctx.fill();
    ctx.set_line_width(1.5);
    ctx.set_stroke_style_str("#ffffff");
    ctx.stroke();

    let r = extent * 0.12;
    let cy = at.y - extent + extent * 0.35;
    ctx.begin_path();
    ctx.arc(at.x, cy, r, 0.0, std::f64::consts::TAU).ok();
    ctx.set_fill_style_str("#ffffff");
    ctx.fill();
}

fn points_of(geometry: &Geometry<f64>) -> Vec<Coord<f64>> {
    match geometry {
        Geometry::Point(p) => vec![p.0],
        Geometry::MultiPoint(mp) => mp.iter().map(|p| p.0).collect(),
        Geometry::GeometryCollection(gc) => gc.iter().flat_map(points_of).collect(),
        _ => Vec::new(),
    }
}

/// Adds every line and area part of `geometry` to the current path.
fn trace_shapes(ctx: &CanvasRenderingContext2d, vp: &Viewport, geometry: &Geometry<f64>) {
    match geometry {
        Geometry::Polygon(poly) => trace_polygon(ctx, vp, poly),
        Geometry::MultiPolygon(mp) => mp.iter().for_each(|poly| trace_polygon(ctx, vp, poly)),
        Geometry::Rect(r) => trace_polygon(ctx, vp, &r.to_polygon()),
        Geometry::Triangle(t) => trace_polygon(ctx, vp, &t.to_polygon()),
        Geometry::LineString(ls) => trace_ring(ctx, vp, ls, false),
        Geometry::MultiLineString(mls) => mls.iter().for_each(|ls| trace_ring(ctx, vp, ls, false)),
        Geometry::Line(l) => trace_ring(ctx, vp, &LineString::from(vec![l.start, l.end]), false),
        Geometry::GeometryCollection(gc) => gc.iter().for_each(|g| trace_shapes(ctx, vp, g)),
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
    }
}

fn draw_geometry(ctx: &CanvasRenderingContext2d, vp: &Viewport, geometry: &Geometry<f64>, style: &LayerStyle, extent: f64) {
    match style {
        LayerStyle::Tiles => {}
        LayerStyle::Fill {
            fill,
            stroke,
            stroke_width,
        } => {
            ctx.begin_path();
            trace_shapes(ctx, vp, geometry);
            ctx.set_fill_style_str(fill);
            ctx.fill();
            ctx.set_line_width(*stroke_width);
            ctx.set_stroke_style_str(stroke);
            ctx.stroke();
        }
        LayerStyle::Marker { color, .. } => {
            for c in points_of(geometry) {
                draw_pin(ctx, vp.coordinate_to_pixel(c), extent, color);
            }
        }
        LayerStyle::Outline { stroke, stroke_width } => {
            ctx.begin_path();
            trace_shapes(ctx, vp, geometry);
            for c in points_of(geometry) {
                trace_pin(ctx, vp.coordinate_to_pixel(c), extent);
            }
            ctx.set_line_width(*stroke_width);
            ctx.set_stroke_style_str(stroke);
            ctx.stroke();
        }
    }
}
