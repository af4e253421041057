use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crosscut_core::Scene;

#[derive(Default, Clone, Copy)]
pub struct DragState {
    pub dragging: bool,
    pub last_x: f32,
    pub last_y: f32,
}

/// Wire camera-orbit mouse dragging on the canvas. Mouse-up is bound to the
/// document so a drag released outside the canvas still ends.
pub fn wire_camera_drag(
    document: &web::Document,
    canvas: &web::HtmlCanvasElement,
    scene: Rc<RefCell<Scene>>,
) {
    let drag = Rc::new(RefCell::new(DragState::default()));

    {
        let drag = drag.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            let mut d = drag.borrow_mut();
            d.dragging = true;
            d.last_x = ev.offset_x() as f32;
            d.last_y = ev.offset_y() as f32;
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    {
        let drag = drag.clone();
        let scene = scene.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            let mut d = drag.borrow_mut();
            if !d.dragging {
                return;
            }
            let x = ev.offset_x() as f32;
            let y = ev.offset_y() as f32;
            scene.borrow_mut().rig.rotate(x - d.last_x, y - d.last_y);
            d.last_x = x;
            d.last_y = y;
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    {
        let drag = drag.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::MouseEvent| {
            drag.borrow_mut().dragging = false;
        }) as Box<dyn FnMut(_)>);
        document
            .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }
}
