#![cfg(target_arch = "wasm32")]
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use crosscut_core::{ObjectKind, PlaneField, Scene, DEFAULT_PRESET};

pub mod dom;
pub mod events;
pub mod frame;
pub mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("crosscut-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::document()?;
    let canvas_el = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    dom::sync_canvas_backing_size(&canvas);
    {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let canvas_resize = canvas.clone();
        let resize_closure = Closure::wrap(Box::new(move || {
            dom::sync_canvas_backing_size(&canvas_resize);
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
            .ok();
        resize_closure.forget();
    }

    // The GPU must be up before anything renders; bail once and loudly if
    // the context cannot be created.
    let gpu = match frame::init_gpu(&canvas).await {
        Some(g) => g,
        None => {
            log::error!("no graphics context, not starting the render loop");
            return Ok(());
        }
    };

    let scene = Rc::new(RefCell::new(Scene::new()));
    populate_preset_selector(&document, scene.borrow().object);

    wire_sliders(&document, scene.clone());
    wire_object_selector(&document, scene.clone());
    wire_preset_selector(&document, scene.clone());
    wire_buttons(&document, scene.clone());
    events::wire_camera_drag(&document, &canvas, scene.clone());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        scene,
        canvas,
        gpu: Some(gpu),
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}

fn wire_sliders(document: &web::Document, scene: Rc<RefCell<Scene>>) {
    // One delegated listener on the slider container; the input's id names
    // the plane field it edits.
    let Some(container) = dom::element(document, "sliderList") else {
        return;
    };
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        let Some(slider) = ev
            .target()
            .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        else {
            return;
        };
        let field = match PlaneField::from_str(&slider.id()) {
            Ok(f) => f,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };
        let Ok(value) = slider.value().parse::<f32>() else {
            return;
        };
        scene.borrow_mut().set_plane_field(field, value);
        if let Some(doc) = web::window().and_then(|w| w.document()) {
            dom::set_text(&doc, &format!("{}Value", field.id()), &slider.value());
        }
    }) as Box<dyn FnMut(_)>);
    container
        .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())
        .ok();
    closure.forget();
}

fn wire_object_selector(document: &web::Document, scene: Rc<RefCell<Scene>>) {
    // Delegated listener on the radio list; the checked radio's id names the
    // object kind. An id that parses to no kind is a configuration error.
    let Some(container) = dom::element(document, "objectList") else {
        return;
    };
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        let Some(radio) = ev
            .target()
            .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        else {
            return;
        };
        match ObjectKind::from_str(&radio.id()) {
            Ok(kind) => {
                scene.borrow_mut().select_object(kind);
                if let Some(doc) = web::window().and_then(|w| w.document()) {
                    populate_preset_selector(&doc, kind);
                }
                log::info!("object: {}", kind.id());
            }
            Err(e) => log::error!("{e}"),
        }
    }) as Box<dyn FnMut(_)>);
    container
        .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
        .ok();
    closure.forget();
}

fn wire_preset_selector(document: &web::Document, scene: Rc<RefCell<Scene>>) {
    let Some(select) = dom::element(document, "presetPlane") else {
        return;
    };
    let Ok(select) = select.dyn_into::<web::HtmlSelectElement>() else {
        return;
    };
    let select_for_read = select.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        scene.borrow_mut().select_preset(&select_for_read.value());
    }) as Box<dyn FnMut(_)>);
    select
        .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
        .ok();
    closure.forget();
}

fn wire_buttons(document: &web::Document, scene: Rc<RefCell<Scene>>) {
    {
        let scene = scene.clone();
        dom::add_click_listener(document, "setCamera", move || {
            let mut s = scene.borrow_mut();
            s.cycle_camera();
            log::info!("camera status: {}", s.rig.status.index());
        });
    }
    {
        let scene = scene.clone();
        dom::add_click_listener(document, "resetButton", move || {
            scene.borrow_mut().reset_all();
            if let Some(doc) = web::window().and_then(|w| w.document()) {
                reset_slider_display(&doc);
            }
        });
    }
    dom::add_click_listener(document, "playDemo", move || {
        scene.borrow_mut().enqueue_demo()
    });
}

fn populate_preset_selector(document: &web::Document, kind: ObjectKind) {
    let Some(select) = document.get_element_by_id("presetPlane") else {
        return;
    };
    let mut html = format!("<option value=\"{DEFAULT_PRESET}\" selected>default</option>");
    for name in crosscut_core::preset_names(kind) {
        html.push_str(&format!("<option value=\"{name}\">{name}</option>"));
    }
    select.set_inner_html(&html);
}

fn reset_slider_display(document: &web::Document) {
    for field in PlaneField::ALL {
        if let Some(slider) = dom::input(document, field.id()) {
            slider.set_value("0");
        }
        dom::set_text(document, &format!("{}Value", field.id()), "0");
    }
}
