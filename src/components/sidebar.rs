use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::legend::LegendRow;
use crate::model::{LayerId, RegionFilter};
use crate::state::LayerToggles;

#[derive(Properties, PartialEq, Clone)]
pub struct SidebarProps {
    pub toggles: LayerToggles,
    pub set_layer: Callback<(LayerId, bool)>,
    pub region: RegionFilter,
    pub set_region: Callback<RegionFilter>,
    pub map_ready: bool,
}

struct ToggleCard {
    id: LayerId,
    title: &'static str,
    hint: &'static str,
    card: &'static str,
    accent: &'static str,
}

const CARDS: [ToggleCard; 3] = [
    ToggleCard {
        id: LayerId::Boundary,
        title: "Polygon Kelurahan",
        hint: "Batas wilayah Riau",
        card: "background:linear-gradient(to right,#f0fdf4,#ecfdf5); border:2px solid #bbf7d0;",
        accent: "#16a34a",
    },
    ToggleCard {
        id: LayerId::Flood,
        title: "Titik Banjir",
        hint: "Lokasi rawan banjir",
        card: "background:linear-gradient(to right,#eff6ff,#ecfeff); border:2px solid #bfdbfe;",
        accent: "#2563eb",
    },
    ToggleCard {
        id: LayerId::Waste,
        title: "Titik Tempat Sampah",
        hint: "TPS & Kontainer",
        card: "background:linear-gradient(to right,#fef2f2,#fff7ed); border:2px solid #fecaca;",
        accent: "#dc2626",
    },
];

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let cards = CARDS.iter().map(|c| {
        let id = c.id;
        let onchange = {
            let set_layer = props.set_layer.clone();
            Callback::from(move |e: Event| {
                let input: HtmlInputElement = e.target_unchecked_into();
                set_layer.emit((id, input.checked()));
            })
        };
        html! {
            <div style={format!("padding:16px; border-radius:12px; {}", c.card)}>
                <label style="display:flex; align-items:center; gap:12px; cursor:pointer;">
                    <input type="checkbox" checked={props.toggles.get(id)} {onchange}
                        style={format!("width:20px; height:20px; accent-color:{};", c.accent)} />
                    <div>
                        <span style="display:block; font-weight:600; color:#1f2937;">{ c.title }</span>
                        <span style="font-size:12px; color:#6b7280;">{ c.hint }</span>
                    </div>
                </label>
            </div>
        }
    });

    let on_region = {
        let set_region = props.set_region.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            set_region.emit(RegionFilter::from_value(&select.value()));
        })
    };

    let status = if props.map_ready { "✅ Map Ready" } else { "⏳ Loading..." };

    html! {
        <div style="width:320px; background:#fff; box-shadow:0 25px 50px -12px rgba(0,0,0,0.25); padding:24px; overflow-y:auto; z-index:10; border-right:1px solid #e5e7eb;">
            <div style="margin-bottom:24px;">
                <h3 style="font-size:24px; font-weight:700; color:#1f2937; margin:0 0 8px 0;">{"Filter Layer"}</h3>
                <p style="font-size:14px; color:#6b7280; margin:0;">{"Pilih layer yang ingin ditampilkan"}</p>
            </div>
            <div style="display:flex; flex-direction:column; gap:16px; margin-bottom:32px;">
                { for cards }
            </div>
            <div style="margin-bottom:32px;">
                <h4 style="font-weight:600; margin:0 0 12px 0; color:#374151;">{"Filter Kelurahan"}</h4>
                <select onchange={on_region} style="width:100%; padding:12px; border:2px solid #d1d5db; border-radius:8px; background:#fff;">
                    { for RegionFilter::ALL.iter().map(|r| html! {
                        <option value={r.value()} selected={*r == props.region}>{ r.label() }</option>
                    }) }
                </select>
            </div>
            <div style="border-top:2px solid #e5e7eb; padding-top:24px;">
                <h4 style="font-weight:600; margin:0 0 16px 0; color:#374151;">{"Legenda"}</h4>
                <div style="display:flex; flex-direction:column; gap:12px;">
                    <LegendRow color="#4ade80" border="#16a34a" label="Polygon Kelurahan" />
                    <LegendRow color="#3b82f6" border="#3b82f6" label="Titik Banjir" round={true} />
                    <LegendRow color="#ef4444" border="#ef4444" label="Tempat Sampah" round={true} />
                </div>
            </div>
            <div style="margin-top:24px; padding:16px; background:linear-gradient(to bottom right,#eff6ff,#dbeafe); border-radius:8px; border:2px solid #bfdbfe;">
                <p style="font-size:14px; color:#374151; line-height:1.6; margin:0;">
                    <strong style="color:#1d4ed8;">{"💡 Tips:"}</strong><br/>
                    {"Klik pada marker atau polygon untuk melihat informasi detail"}
                </p>
            </div>
            <div style="margin-top:16px; padding:12px; background:#f9fafb; border-radius:8px; border:1px solid #e5e7eb;">
                <p style="font-size:12px; color:#4b5563; margin:0;"><strong>{"Status:"}</strong>{" "}{ status }</p>
                <p style="font-size:12px; color:#6b7280; margin:4px 0 0 0;">{"Buka Console (F12) untuk info loading"}</p>
            </div>
        </div>
    }
}
