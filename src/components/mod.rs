pub mod app;
pub mod info_badge;
pub mod legend;
pub mod loading_overlay;
pub mod map_view;
pub mod popup;
pub mod sidebar;
