use crate::model::{FeatureRef, LayerStyle};

/// Features drawn on top of everything else, outside the layer stack.
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    pub style: LayerStyle,
    features: Vec<FeatureRef>,
    /// Bumped on every add and remove.
    revision: u64,
}

impl OverlayLayer {
    pub fn new(style: LayerStyle) -> Self {
        Self {
            style,
            features: Vec::new(),
            revision: 0,
        }
    }

    pub fn add_feature(&mut self, feature: FeatureRef) {
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
        self.revision += 1;
    }

    pub fn remove_feature(&mut self, feature: &FeatureRef) {
        self.features.retain(|f| f != feature);
        self.revision += 1;
    }

    pub fn features(&self) -> &[FeatureRef] {
        &self.features
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum HighlightState {
    #[default]
    Idle,
    Highlighted(FeatureRef),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "",
            Cursor::Pointer => "pointer",
        }
    }
}

/// Keeps at most one feature highlighted, mirrored into a dedicated overlay.
#[derive(Debug, Clone)]
pub struct HighlightTracker {
    state: HighlightState,
    overlay: OverlayLayer,
}

impl HighlightTracker {
    pub fn new(style: LayerStyle) -> Self {
        Self {
            state: HighlightState::Idle,
            overlay: OverlayLayer::new(style),
        }
    }

    /// Moves the highlight to `picked`. Returns false when nothing changed.
    pub fn update(&mut self, picked: Option<FeatureRef>) -> bool {
        let unchanged = match (&self.state, &picked) {
            (HighlightState::Idle, None) => true,
            (HighlightState::Highlighted(current), Some(p)) => current == p,
            _ => false,
        };
        if unchanged {
            return false;
        }
        // old one leaves the overlay before the new one joins
        if let HighlightState::Highlighted(old) = std::mem::take(&mut self.state) {
            self.overlay.remove_feature(&old);
        }
        if let Some(feature) = picked {
            self.overlay.add_feature(feature.clone());
            self.state = HighlightState::Highlighted(feature);
        }
        true
    }

    pub fn clear(&mut self) {
        self.update(None);
    }

    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    pub fn current(&self) -> Option<&FeatureRef> {
        match &self.state {
            HighlightState::Highlighted(f) => Some(f),
            HighlightState::Idle => None,
        }
    }

    pub fn cursor(&self) -> Cursor {
        match self.state {
            HighlightState::Highlighted(_) => Cursor::Pointer,
            HighlightState::Idle => Cursor::Default,
        }
    }

    pub fn overlay(&self) -> &OverlayLayer {
        &self.overlay
    }
}
