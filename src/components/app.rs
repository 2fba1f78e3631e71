use super::{map_view::MapView, sidebar::Sidebar};
use crate::config::MapConfig;
use crate::model::{LayerId, RegionFilter};
use crate::state::LayerToggles;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: MapConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let toggles = use_state_eq(LayerToggles::default);
    let region = use_state_eq(RegionFilter::default);
    let map_ready = use_state_eq(|| false);

    let set_layer = {
        let toggles = toggles.clone();
        Callback::from(move |(id, on): (LayerId, bool)| toggles.set(toggles.with(id, on)))
    };
    let set_region = {
        let region = region.clone();
        Callback::from(move |r: RegionFilter| region.set(r))
    };
    let on_ready = {
        let map_ready = map_ready.clone();
        Callback::from(move |_: ()| map_ready.set(true))
    };

    html! {
        <div style="display:flex; height:100vh; background:#f3f4f6; font-family:system-ui, sans-serif;">
            <Sidebar
                toggles={*toggles}
                {set_layer}
                region={*region}
                {set_region}
                map_ready={*map_ready}
            />
            <MapView
                config={props.config.clone()}
                toggles={*toggles}
                region={*region}
                map_ready={*map_ready}
                {on_ready}
            />
        </div>
    }
}
