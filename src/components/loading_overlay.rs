use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LoadingOverlayProps {
    pub show: bool,
}

#[function_component(LoadingOverlay)]
pub fn loading_overlay(props: &LoadingOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    html! {
        <div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(255,255,255,0.75); z-index:20;">
            <div style="text-align:center;">
                <div style="width:64px; height:64px; margin:0 auto 16px auto; border-radius:50%; border-bottom:4px solid #16a34a; animation:spin 1s linear infinite;"></div>
                <p style="color:#4b5563; font-weight:600;">{"Loading Map..."}</p>
            </div>
        </div>
    }
}
