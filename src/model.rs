//! Core data models for the thematic map.
//! Layers, features and their attribute values, shared by the interaction
//! state machines and the canvas renderer.

use geo_types::{Coord, Geometry};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::util::format_number;

/// Screen position in CSS pixels, relative to the map canvas' top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}

impl Pixel {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerId {
    /// OpenStreetMap raster tiles underneath everything else.
    Base,
    /// Administrative boundary polygons.
    Boundary,
    /// Flood-risk points.
    Flood,
    /// Waste-collection points.
    Waste,
}

impl LayerId {
    /// Thematic layers in stacking order, bottom first.
    pub const THEMATIC: [LayerId; 3] = [LayerId::Boundary, LayerId::Flood, LayerId::Waste];

    pub fn label(self) -> &'static str {
        match self {
            LayerId::Base => "OSM",
            LayerId::Boundary => "Riau",
            LayerId::Flood => "Banjir",
            LayerId::Waste => "Trash",
        }
    }
}

/// Scalar attribute value read from a GeoJSON `properties` object.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl AttrValue {
    /// Nulls, arrays and objects have no scalar rendering and are dropped.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(AttrValue::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(AttrValue::Number),
            serde_json::Value::Bool(b) => Some(AttrValue::Bool(*b)),
            _ => None,
        }
    }

    /// Empty text, zero, NaN and `false` do not count as present.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Text(s) => !s.is_empty(),
            AttrValue::Number(n) => *n != 0.0 && !n.is_nan(),
            AttrValue::Bool(b) => *b,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Number(n) => f.write_str(&format_number(*n)),
            AttrValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

pub type Attributes = BTreeMap<String, AttrValue>;

#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// Geometry in map projection (EPSG:3857 metres).
    pub geometry: Geometry<f64>,
    pub properties: Attributes,
    pub layer: LayerId,
}

impl Feature {
    pub fn new(layer: LayerId, geometry: Geometry<f64>, properties: Attributes) -> Self {
        Self {
            geometry,
            properties,
            layer,
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.properties.get(key)
    }

    /// Coordinate of a single-point geometry.
    pub fn point_coordinate(&self) -> Option<Coord<f64>> {
        match &self.geometry {
            Geometry::Point(p) => Some(p.0),
            _ => None,
        }
    }
}

/// Shared handle to a loaded feature. Equality is identity, not value.
#[derive(Clone, Debug)]
pub struct FeatureRef(Rc<Feature>);

impl FeatureRef {
    pub fn new(feature: Feature) -> Self {
        Self(Rc::new(feature))
    }
}

impl PartialEq for FeatureRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for FeatureRef {}

impl std::ops::Deref for FeatureRef {
    type Target = Feature;

    fn deref(&self) -> &Feature {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayerSource {
    /// GeoJSON feature collection fetched over HTTP.
    Url(String),
    /// XYZ raster tile template with `{z}`, `{x}` and `{y}` placeholders.
    Tiles(String),
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayerStyle {
    Tiles,
    Fill {
        fill: String,
        stroke: String,
        stroke_width: f64,
    },
    /// Pin marker drawn with its bottom-centre on the point.
    Marker { color: String, scale: f64 },
    Outline { stroke: String, stroke_width: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Error,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoadState::Loading => "loading",
            LoadState::Ready => "ready",
            LoadState::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub id: LayerId,
    pub source: LayerSource,
    pub style: LayerStyle,
    pub visible: bool,
    pub load_state: LoadState,
    /// Draw order; the last feature is drawn on top.
    pub features: Vec<FeatureRef>,
}

impl Layer {
    pub fn new(id: LayerId, source: LayerSource, style: LayerStyle, visible: bool) -> Self {
        let load_state = match source {
            LayerSource::Url(_) => LoadState::Loading,
            LayerSource::Tiles(_) | LayerSource::Empty => LoadState::Ready,
        };
        Self {
            id,
            source,
            style,
            visible,
            load_state,
            features: Vec::new(),
        }
    }

    pub fn is_vector(&self) -> bool {
        !matches!(self.source, LayerSource::Tiles(_))
    }
}

/// Region selector options. Selecting one does not filter anything yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegionFilter {
    #[default]
    All,
    Sukajadi,
    Tampan,
    Sidomulyo,
}

impl RegionFilter {
    pub const ALL: [RegionFilter; 4] = [
        RegionFilter::All,
        RegionFilter::Sukajadi,
        RegionFilter::Tampan,
        RegionFilter::Sidomulyo,
    ];

    pub fn value(self) -> &'static str {
        match self {
            RegionFilter::All => "all",
            RegionFilter::Sukajadi => "Sukajadi",
            RegionFilter::Tampan => "Tampan",
            RegionFilter::Sidomulyo => "Sidomulyo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RegionFilter::All => "📍 Semua Kelurahan",
            RegionFilter::Sukajadi => "🏘️ Kelurahan Sukajadi",
            RegionFilter::Tampan => "🏘️ Kelurahan Tampan",
            RegionFilter::Sidomulyo => "🏘️ Kelurahan Sidomulyo",
        }
    }

    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|r| r.value() == value)
            .unwrap_or_default()
    }
}
