use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent};
use yew::prelude::*;

use super::{info_badge::InfoBadge, loading_overlay::LoadingOverlay, popup::PopupPanel};
use crate::config::MapConfig;
use crate::model::{LayerSource, Pixel, RegionFilter};
use crate::render::{self, TileCache};
use crate::session::{MapSession, MapUi};
use crate::source::load_features;
use crate::state::LayerToggles;

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub config: MapConfig,
    pub toggles: LayerToggles,
    pub region: RegionFilter,
    pub map_ready: bool,
    pub on_ready: Callback<()>,
}

/// DOM listener removed again when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(target: &EventTarget, kind: &'static str, f: impl FnMut(Event) + 'static) -> Option<Self> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        if let Err(e) = target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref()) {
            warn!("cannot listen for {}: {:?}", kind, e);
            return None;
        }
        Some(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

fn event_pixel(canvas: &HtmlCanvasElement, e: &MouseEvent) -> Pixel {
    let rect = canvas.get_bounding_client_rect();
    Pixel::new(e.client_x() as f64 - rect.left(), e.client_y() as f64 - rect.top())
}

fn fit_canvas(canvas: &HtmlCanvasElement, container: &HtmlElement, session: &RefCell<MapSession>) {
    let width = container.client_width().max(0) as u32;
    let height = container.client_height().max(0) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    session.borrow_mut().resize(width as f64, height as f64);
}

type Redraw = Rc<RefCell<Option<Rc<dyn Fn()>>>>;

fn redraw(draw_ref: &Redraw) {
    let f = draw_ref.borrow().clone();
    if let Some(f) = f {
        f();
    }
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let container_ref = use_node_ref();
    let popup_ref = use_node_ref();
    let session = {
        let config = props.config.clone();
        use_mut_ref(move || MapSession::new(config))
    };
    let tiles = use_mut_ref(TileCache::default);
    let draw_ref: Redraw = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let ui = use_state_eq(MapUi::default);
    let click_count = use_mut_ref(|| 0_u32);
    let clicks = use_state_eq(|| 0_u32);

    // Mount: canvas sizing, drawing, DOM listeners and layer loads
    {
        let canvas_ref = canvas_ref.clone();
        let container_ref = container_ref.clone();
        let session = session.clone();
        let tiles = tiles.clone();
        let draw_ref = draw_ref.clone();
        let ui = ui.clone();
        let clicks = clicks.clone();
        let click_count = click_count.clone();
        let on_ready = props.on_ready.clone();
        use_effect_with((), move |_| {
            let mounted = (|| {
                let window = web_sys::window()?;
                let canvas = canvas_ref.cast::<HtmlCanvasElement>()?;
                let container = container_ref.cast::<HtmlElement>()?;
                fit_canvas(&canvas, &container, &session);

                let draw: Rc<dyn Fn()> = {
                    let canvas = canvas.clone();
                    let session = session.clone();
                    let tiles = tiles.clone();
                    let on_tile: Rc<dyn Fn()> = {
                        let draw_ref = draw_ref.clone();
                        Rc::new(move || redraw(&draw_ref))
                    };
                    Rc::new(move || {
                        if !canvas.is_connected() {
                            return;
                        }
                        let Some(ctx) = canvas
                            .get_context("2d")
                            .ok()
                            .flatten()
                            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                        else {
                            return;
                        };
                        render::draw(&ctx, &session.borrow(), &mut tiles.borrow_mut(), &on_tile);
                    })
                };
                *draw_ref.borrow_mut() = Some(draw.clone());

                let sync = {
                    let session = session.clone();
                    let ui = ui.clone();
                    move || ui.set(session.borrow().snapshot())
                };

                let mut listeners = Vec::new();
                listeners.push(Listener::new(&canvas, "mousedown", {
                    let canvas = canvas.clone();
                    let session = session.clone();
                    move |e: Event| {
                        let e: MouseEvent = e.unchecked_into();
                        if e.button() == 0 {
                            session.borrow_mut().press(event_pixel(&canvas, &e));
                        }
                    }
                }));
                listeners.push(Listener::new(&canvas, "mousemove", {
                    let canvas = canvas.clone();
                    let session = session.clone();
                    let draw = draw.clone();
                    let sync = sync.clone();
                    move |e: Event| {
                        let e: MouseEvent = e.unchecked_into();
                        let changed = session.borrow_mut().pointer_move(event_pixel(&canvas, &e));
                        if changed {
                            draw();
                            sync();
                        }
                    }
                }));
                listeners.push(Listener::new(&window, "mouseup", {
                    let canvas = canvas.clone();
                    let session = session.clone();
                    let sync = sync.clone();
                    move |e: Event| {
                        let e: MouseEvent = e.unchecked_into();
                        let clicked = session.borrow_mut().release(event_pixel(&canvas, &e));
                        if clicked {
                            let n = {
                                let mut c = click_count.borrow_mut();
                                *c += 1;
                                *c
                            };
                            sync();
                            clicks.set(n);
                        }
                    }
                }));
                listeners.push(Listener::new(&canvas, "wheel", {
                    let canvas = canvas.clone();
                    let session = session.clone();
                    let draw = draw.clone();
                    let sync = sync.clone();
                    move |e: Event| {
                        let e: WheelEvent = e.unchecked_into();
                        e.prevent_default();
                        session.borrow_mut().wheel(event_pixel(&canvas, &e), e.delta_y());
                        draw();
                        sync();
                    }
                }));
                listeners.push(Listener::new(&window, "resize", {
                    let canvas = canvas.clone();
                    let session = session.clone();
                    let draw = draw.clone();
                    let sync = sync.clone();
                    move |_e: Event| {
                        fit_canvas(&canvas, &container, &session);
                        draw();
                        sync();
                    }
                }));

                let loads: Vec<_> = session
                    .borrow()
                    .registry
                    .iter()
                    .filter_map(|layer| match &layer.source {
                        LayerSource::Url(url) => Some((layer.id, url.clone())),
                        _ => None,
                    })
                    .collect();
                for (id, url) in loads {
                    let weak = Rc::downgrade(&session);
                    let draw_ref = draw_ref.clone();
                    spawn_local(async move {
                        let result = load_features(id, url).await;
                        let Some(session) = weak.upgrade() else {
                            debug!("{} load finished after unmount", id.label());
                            return;
                        };
                        let installed = session.borrow_mut().finish_load(id, result);
                        if installed.is_some() {
                            redraw(&draw_ref);
                        }
                    });
                }

                draw();
                sync();
                on_ready.emit(());
                Some(listeners)
            })();

            let session = session.clone();
            let tiles = tiles.clone();
            let draw_ref = draw_ref.clone();
            move || {
                drop(mounted);
                *draw_ref.borrow_mut() = None;
                tiles.borrow_mut().clear();
                session.borrow_mut().teardown();
            }
        });
    }

    // Cursor follows the highlight, whichever path updated the snapshot
    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with(ui.cursor, move |cursor| {
            if let Some(canvas) = canvas_ref.cast::<HtmlElement>() {
                let _ = canvas.style().set_property("cursor", cursor.css());
            }
            || ()
        });
    }
    // Visibility bridge
    {
        let session = session.clone();
        let draw_ref = draw_ref.clone();
        let ui = ui.clone();
        use_effect_with(props.toggles, move |toggles| {
            let changed = session.borrow_mut().apply_toggles(*toggles);
            if changed {
                redraw(&draw_ref);
                ui.set(session.borrow().snapshot());
            }
            || ()
        });
    }
    {
        let session = session.clone();
        use_effect_with(props.region, move |region| {
            session.borrow_mut().set_region(*region);
            || ()
        });
    }
    // Auto-pan once the selected popup has rendered and can be measured
    {
        let session = session.clone();
        let popup_ref = popup_ref.clone();
        let draw_ref = draw_ref.clone();
        let ui = ui.clone();
        use_effect_with(*clicks, move |_| {
            if let Some(panel) = popup_ref.cast::<HtmlElement>() {
                let size = (panel.offset_width() as f64, panel.offset_height() as f64);
                let panned = size.0 > 0.0 && session.borrow_mut().auto_pan(size);
                if panned {
                    redraw(&draw_ref);
                    ui.set(session.borrow().snapshot());
                }
            }
            || ()
        });
    }

    let on_close = {
        let session = session.clone();
        let ui = ui.clone();
        Callback::from(move |_: ()| {
            session.borrow_mut().dismiss_popup();
            ui.set(session.borrow().snapshot());
        })
    };

    html! {
        <div ref={container_ref} style="flex:1; position:relative; overflow:hidden;">
            <canvas ref={canvas_ref} style="display:block; width:100%; height:100%;"></canvas>
            <PopupPanel view={ui.popup.clone()} node_ref={popup_ref} {on_close} />
            <InfoBadge badge={ui.badge.clone()} />
            <a href="/" style="position:absolute; top:16px; right:16px; background:linear-gradient(to right,#16a34a,#059669); color:#fff; padding:12px 24px; border-radius:12px; box-shadow:0 20px 25px -5px rgba(0,0,0,0.2); font-weight:600; display:flex; align-items:center; gap:8px; text-decoration:none; z-index:12;">
                <span>{"←"}</span>
                {"Kembali ke Profil"}
            </a>
            <LoadingOverlay show={!props.map_ready} />
        </div>
    }
}
