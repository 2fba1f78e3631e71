use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LegendRowProps {
    pub color: AttrValue,
    pub border: AttrValue,
    pub label: &'static str,
    /// Round swatch for point layers, square for areas.
    #[prop_or(false)]
    pub round: bool,
}

#[function_component(LegendRow)]
pub fn legend_row(props: &LegendRowProps) -> Html {
    let radius = if props.round { "50%" } else { "4px" };
    html! { <div style="display:flex; align-items:center; gap:12px; padding:8px; background:#f9fafb; border-radius:8px;"> <span style={format!("display:inline-block; width:28px; height:28px; background:{}; border:2px solid {}; border-radius:{};", props.color, props.border, radius)}></span> <span style="font-size:14px; color:#374151; font-weight:500;">{ props.label }</span> </div> }
}
