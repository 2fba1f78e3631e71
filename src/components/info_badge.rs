use yew::prelude::*;

use crate::state::HoverBadge;

/// Read-only overlay; the canvas below keeps receiving the pointer.
const BADGE_STYLE: &str = "position:absolute; top:16px; left:16px; background:#fff; padding:8px 16px; border-radius:8px; box-shadow:0 10px 15px -3px rgba(0,0,0,0.1); font-size:14px; font-weight:600; color:#374151; border:1px solid #e5e7eb; z-index:12; pointer-events:none;";

#[derive(Properties, PartialEq, Clone)]
pub struct InfoBadgeProps {
    pub badge: HoverBadge,
}

#[function_component(InfoBadge)]
pub fn info_badge(props: &InfoBadgeProps) -> Html {
    if !props.badge.visible {
        return html! {};
    }
    html! {
        <div style={BADGE_STYLE}>
            { props.badge.text.clone() }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_does_not_capture_the_pointer() {
        assert!(BADGE_STYLE.contains("pointer-events:none"));
    }
}
