use log::{info, warn};

use crate::error::LoadError;
use crate::model::{Feature, FeatureRef, Layer, LayerId, LoadState};

/// Owns the layer stack. Layers are addressed by id, never by position.
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    /// Bottom first.
    layers: Vec<Layer>,
}

impl LayerRegistry {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn is_visible(&self, id: LayerId) -> bool {
        self.get(id).is_some_and(|l| l.visible)
    }

    /// Returns true when the flag actually changed.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> bool {
        match self.get_mut(id) {
            Some(layer) if layer.visible != visible => {
                layer.visible = visible;
                true
            }
            _ => false,
        }
    }

    /// Installs the outcome of a layer's load. A failure leaves the layer
    /// present but empty.
    pub fn finish_load(&mut self, id: LayerId, result: Result<Vec<Feature>, LoadError>) -> Option<LoadState> {
        let layer = self.get_mut(id)?;
        match result {
            Ok(features) => {
                layer.features = features.into_iter().map(FeatureRef::new).collect();
                layer.load_state = LoadState::Ready;
            }
            Err(e) => {
                warn!("{} layer failed to load: {}", id.label(), e);
                layer.features.clear();
                layer.load_state = LoadState::Error;
            }
        }
        info!(
            "{} layer status: {} ({} features)",
            id.label(),
            layer.load_state,
            layer.features.len()
        );
        Some(layer.load_state)
    }

    /// Drops every loaded feature.
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.features.clear();
        }
    }
}
