mod components;
mod config;
mod dispatch;
mod error;
mod index;
mod model;
mod projection;
mod render;
mod session;
mod source;
mod state;
mod util;

use components::app::{App, AppProps};
use config::MapConfig;

fn main() {
    console_error_panic_hook::set_once();
    let config = MapConfig::load();
    if console_log::init_with_level(config.log_level()).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
