use yew::prelude::*;

use crate::dispatch::{POPUP_TITLE, Tone};
use crate::session::PopupView;

#[derive(Properties, PartialEq, Clone)]
pub struct PopupPanelProps {
    pub view: Option<PopupView>,
    pub node_ref: NodeRef,
    pub on_close: Callback<()>,
}

fn tone_style(tone: Tone) -> &'static str {
    match tone {
        Tone::Plain => "",
        Tone::Positive => "color:#16a34a; font-weight:600;",
        Tone::Negative => "color:#dc2626; font-weight:600;",
    }
}

/// Panel body lets pointer events through to the canvas; only the close
/// button takes them.
fn panel_style(view: Option<&PopupView>) -> String {
    let position = match view {
        Some(v) => format!("display:block; left:{}px; top:{}px;", v.x, v.y),
        None => "display:none;".to_string(),
    };
    format!("position:absolute; {} transform:translate(-50%, -100%); background:#fff; border-radius:12px; box-shadow:0 25px 50px -12px rgba(0,0,0,0.25); border:2px solid #d1d5db; min-width:280px; padding:16px; z-index:15; pointer-events:none;", position)
}

const CLOSE_STYLE: &str = "position:absolute; top:-8px; right:-8px; width:32px; height:32px; background:#ef4444; color:#fff; border:none; border-radius:50%; font-weight:700; cursor:pointer; pointer-events:auto; box-shadow:0 10px 15px -3px rgba(0,0,0,0.2);";

/// Feature details, bottom-centre on the popup anchor.
#[function_component(PopupPanel)]
pub fn popup_panel(props: &PopupPanelProps) -> Html {
    let onclick = {
        let cb = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            cb.emit(());
        })
    };
    let lines = props.view.as_ref().map(|v| v.content.lines.clone()).unwrap_or_default();
    html! {
        <div ref={props.node_ref.clone()} style={panel_style(props.view.as_ref())}>
            <button {onclick} style={CLOSE_STYLE}>
                {"×"}
            </button>
            <div style="font-size:14px;">
                <h3 style="font-weight:700; font-size:18px; margin:0 0 8px 0; color:#1f2937;">{ POPUP_TITLE }</h3>
                { for lines.iter().map(|line| html! {
                    <p style="margin:0 0 4px 0;">
                        <strong>{ format!("{}:", line.label) }</strong>{" "}
                        <span style={tone_style(line.tone)}>{ line.value.clone() }</span>
                    </p>
                }) }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::PopupContent;

    #[test]
    fn body_passes_pointer_events_to_the_map() {
        let view = PopupView { x: 120.0, y: 80.0, content: PopupContent::default() };
        let shown = panel_style(Some(&view));
        assert!(shown.contains("left:120px; top:80px;"));
        assert!(shown.contains("pointer-events:none"));
        assert!(panel_style(None).contains("display:none"));
        assert!(CLOSE_STYLE.contains("pointer-events:auto"));
    }
}
