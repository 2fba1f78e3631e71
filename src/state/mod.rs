pub mod camera;
pub mod highlight;
pub mod hover;
pub mod popup;
pub mod registry;
pub mod visibility;

pub use camera::Camera;
pub use highlight::{Cursor, HighlightTracker};
pub use hover::HoverBadge;
pub use popup::{PopupController, PopupPlacement, PopupState};
pub use registry::LayerRegistry;
pub use visibility::{LayerToggles, apply_toggles};
