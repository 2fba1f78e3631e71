//! Map configuration: compiled-in defaults plus an optional JSON override kept
//! in `localStorage`.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Layer, LayerId, LayerSource, LayerStyle};

/// `localStorage` key holding a partial `MapConfig` as JSON.
pub const STORAGE_KEY: &str = "tm_map_config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// `log` level name passed to `console_log` ("error" .. "trace").
    pub log_level: String,
    /// Initial view centre as `[longitude, latitude]`.
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub tile_url: String,
    pub boundary_url: String,
    pub flood_url: String,
    pub waste_url: String,
    pub marker: MarkerConfig,
    /// Extra pick distance for line geometries, in pixels.
    pub hit_tolerance_px: f64,
    pub popup: PopupConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Icon edge length before scaling.
    pub size_px: f64,
    pub scale: f64,
    pub flood_color: String,
    pub waste_color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Pixel offset of the panel's bottom-centre from its anchor.
    pub offset: [f64; 2],
    /// Space kept between an auto-panned panel and the canvas edge.
    pub auto_pan_margin: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            center: [101.438309, 0.51044],
            zoom: 12.0,
            min_zoom: 2.0,
            max_zoom: 19.0,
            tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            boundary_url: "/data/polygon_riau.json".into(),
            flood_url: "/data/banjir.json".into(),
            waste_url: "/data/trash_points.json".into(),
            marker: MarkerConfig::default(),
            hit_tolerance_px: 3.0,
            popup: PopupConfig::default(),
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            size_px: 32.0,
            scale: 1.2,
            flood_color: "#3B82F6".into(),
            waste_color: "#EF3434".into(),
        }
    }
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, -10.0],
            auto_pan_margin: 20.0,
        }
    }
}

impl MapConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: MapConfig = serde_json::from_str(raw)?;
        if config.min_zoom > config.max_zoom {
            return Err(ConfigError::ZoomRange {
                min: config.min_zoom,
                max: config.max_zoom,
            });
        }
        Ok(config)
    }

    /// Defaults, replaced by the stored override when one parses.
    pub fn load() -> Self {
        let Some(raw) = web_sys::window()
            .and_then(|win| win.local_storage().ok().flatten())
            .and_then(|store| store.get_item(STORAGE_KEY).ok().flatten())
        else {
            return Self::default();
        };
        match Self::from_json(&raw) {
            Ok(config) => {
                info!("using map config override from localStorage");
                config
            }
            Err(e) => {
                warn!("ignoring stored map config: {}", e);
                Self::default()
            }
        }
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    pub fn marker_extent_px(&self) -> f64 {
        self.marker.size_px * self.marker.scale
    }

    /// Layer stack, bottom first: base tiles then the three thematic layers.
    pub fn layers(&self) -> Vec<Layer> {
        vec![
            Layer::new(
                LayerId::Base,
                LayerSource::Tiles(self.tile_url.clone()),
                LayerStyle::Tiles,
                true,
            ),
            Layer::new(
                LayerId::Boundary,
                LayerSource::Url(self.boundary_url.clone()),
                LayerStyle::Fill {
                    fill: "rgba(145, 255, 131, 0.3)".into(),
                    stroke: "#91ff83".into(),
                    stroke_width: 2.0,
                },
                true,
            ),
            Layer::new(
                LayerId::Flood,
                LayerSource::Url(self.flood_url.clone()),
                LayerStyle::Marker {
                    color: self.marker.flood_color.clone(),
                    scale: self.marker.scale,
                },
                true,
            ),
            Layer::new(
                LayerId::Waste,
                LayerSource::Url(self.waste_url.clone()),
                LayerStyle::Marker {
                    color: self.marker.waste_color.clone(),
                    scale: self.marker.scale,
                },
                true,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_center_on_pekanbaru() {
        let c = MapConfig::default();
        assert_eq!(c.center, [101.438309, 0.51044]);
        assert_eq!(c.zoom, 12.0);
        assert_eq!(c.popup.offset, [0.0, -10.0]);
        assert!((c.marker_extent_px() - 38.4).abs() < 1e-9);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let c = MapConfig::from_json(r#"{"zoom": 9, "popup": {"auto_pan_margin": 5}}"#).unwrap();
        assert_eq!(c.zoom, 9.0);
        assert_eq!(c.popup.auto_pan_margin, 5.0);
        assert_eq!(c.popup.offset, [0.0, -10.0]);
        assert_eq!(c.flood_url, "/data/banjir.json");
    }

    #[test]
    fn rejects_bad_overrides() {
        assert!(matches!(MapConfig::from_json("{"), Err(ConfigError::Json(_))));
        assert!(matches!(
            MapConfig::from_json(r#"{"min_zoom": 10, "max_zoom": 3}"#),
            Err(ConfigError::ZoomRange { .. })
        ));
    }

    #[test]
    fn log_level_falls_back_to_info() {
        let mut c = MapConfig::default();
        c.log_level = "debug".into();
        assert_eq!(c.log_level(), log::Level::Debug);
        c.log_level = "loud".into();
        assert_eq!(c.log_level(), log::Level::Info);
    }

    #[test]
    fn layer_stack_order() {
        let ids: Vec<LayerId> = MapConfig::default().layers().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![LayerId::Base, LayerId::Boundary, LayerId::Flood, LayerId::Waste]);
    }
}
