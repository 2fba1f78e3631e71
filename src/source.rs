//! GeoJSON vector sources: fetch a document and turn it into projected
//! features for one layer.

use geo::MapCoords;
use geo_types::Geometry;
use geojson::GeoJson;
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::error::LoadError;
use crate::model::{AttrValue, Attributes, Feature, LayerId};
use crate::projection::from_lon_lat;

/// Parses a FeatureCollection whose coordinates are lon/lat degrees.
///
/// Features without a usable geometry are skipped, as are attribute values
/// that are not scalars.
pub fn parse_feature_collection(text: &str, layer: LayerId) -> Result<Vec<Feature>, LoadError> {
    let collection = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(_) => return Err(LoadError::NotACollection("Feature")),
        GeoJson::Geometry(_) => return Err(LoadError::NotACollection("Geometry")),
    };

    let mut features = Vec::with_capacity(collection.features.len());
    for (i, feature) in collection.features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            debug!("{} feature #{} has no geometry, skipped", layer.label(), i);
            continue;
        };
        let geometry: Geometry<f64> = match geometry.value.try_into() {
            Ok(g) => g,
            Err(e) => {
                debug!("{} feature #{} has unusable geometry: {}", layer.label(), i, e);
                continue;
            }
        };
        let projected = geometry.map_coords(|c| from_lon_lat(c.x, c.y));
        let properties: Attributes = feature
            .properties
            .unwrap_or_default()
            .iter()
            .filter_map(|(k, v)| AttrValue::from_json(v).map(|a| (k.clone(), a)))
            .collect();
        features.push(Feature::new(layer, projected, properties));
    }
    Ok(features)
}

fn fetch_error(url: &str, err: JsValue) -> LoadError {
    LoadError::Fetch {
        url: url.to_string(),
        reason: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
    }
}

/// GETs `url` and returns the body as text.
pub async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let window = web_sys::window().ok_or_else(|| LoadError::Fetch {
        url: url.to_string(),
        reason: "no window".into(),
    })?;
    let value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fetch_error(url, e))?;
    let response: Response = value.dyn_into().map_err(|e| fetch_error(url, e))?;
    if !response.ok() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let body = response.text().map_err(|e| fetch_error(url, e))?;
    let text = JsFuture::from(body).await.map_err(|e| fetch_error(url, e))?;
    text.as_string().ok_or_else(|| LoadError::Body {
        url: url.to_string(),
    })
}

pub async fn load_features(layer: LayerId, url: String) -> Result<Vec<Feature>, LoadError> {
    let text = fetch_text(&url).await?;
    parse_feature_collection(&text, layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOD: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {"type": "Feature",
         "geometry": {"type": "Point", "coordinates": [101.44, 0.51]},
         "properties": {"Nama_Pemetaan": "Rumbai", "Jumlah_Korban": 12, "tags": ["a"], "note": null}},
        {"type": "Feature", "geometry": null, "properties": {"Nama_Pemetaan": "lost"}},
        {"type": "Feature",
         "geometry": {"type": "Polygon", "coordinates": [[[101.4,0.5],[101.5,0.5],[101.5,0.6],[101.4,0.5]]]},
         "properties": null}
      ]
    }"#;

    #[test]
    fn parses_and_projects_features() {
        let features = parse_feature_collection(FLOOD, LayerId::Flood).unwrap();
        assert_eq!(features.len(), 2);

        let point = &features[0];
        assert_eq!(point.layer, LayerId::Flood);
        assert_eq!(point.point_coordinate(), Some(from_lon_lat(101.44, 0.51)));
        assert_eq!(point.get("Nama_Pemetaan"), Some(&AttrValue::Text("Rumbai".into())));
        assert_eq!(point.get("Jumlah_Korban"), Some(&AttrValue::Number(12.0)));
        assert!(point.get("tags").is_none());
        assert!(point.get("note").is_none());

        assert!(matches!(features[1].geometry, Geometry::Polygon(_)));
        assert!(features[1].properties.is_empty());
    }

    #[test]
    fn rejects_non_collections() {
        let single = r#"{"type": "Feature", "geometry": null, "properties": {}}"#;
        assert!(matches!(
            parse_feature_collection(single, LayerId::Waste),
            Err(LoadError::NotACollection("Feature"))
        ));
        assert!(matches!(
            parse_feature_collection("not json", LayerId::Waste),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn empty_collection_is_fine() {
        let empty = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(parse_feature_collection(empty, LayerId::Boundary).unwrap().is_empty());
    }
}
