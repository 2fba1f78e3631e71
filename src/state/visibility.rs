use super::registry::LayerRegistry;
use crate::model::LayerId;

/// Checkbox state of the three thematic layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerToggles {
    pub boundary: bool,
    pub flood: bool,
    pub waste: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            boundary: true,
            flood: true,
            waste: true,
        }
    }
}

impl LayerToggles {
    pub fn get(&self, id: LayerId) -> bool {
        match id {
            LayerId::Boundary => self.boundary,
            LayerId::Flood => self.flood,
            LayerId::Waste => self.waste,
            LayerId::Base => true,
        }
    }

    pub fn with(mut self, id: LayerId, on: bool) -> Self {
        match id {
            LayerId::Boundary => self.boundary = on,
            LayerId::Flood => self.flood = on,
            LayerId::Waste => self.waste = on,
            LayerId::Base => {}
        }
        self
    }

    pub fn toggled(self, id: LayerId) -> Self {
        let on = self.get(id);
        self.with(id, !on)
    }
}

/// Pushes toggle state into the registry. Returns the layers that changed.
pub fn apply_toggles(toggles: &LayerToggles, registry: &mut LayerRegistry) -> Vec<LayerId> {
    LayerId::THEMATIC
        .into_iter()
        .filter(|&id| registry.set_visible(id, toggles.get(id)))
        .collect()
}
