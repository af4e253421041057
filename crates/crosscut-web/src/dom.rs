use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn document() -> anyhow::Result<web::Document> {
    web::window()
        .and_then(|w| w.document())
        .ok_or_else(|| anyhow::anyhow!("no document"))
}

pub fn element(document: &web::Document, id: &str) -> Option<web::Element> {
    let el = document.get_element_by_id(id);
    if el.is_none() {
        log::warn!("missing element #{id}");
    }
    el
}

pub fn input(document: &web::Document, id: &str) -> Option<web::HtmlInputElement> {
    element(document, id).and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
}

pub fn set_text(document: &web::Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

pub fn add_click_listener(
    document: &web::Document,
    id: &str,
    mut handler: impl FnMut() + 'static,
) {
    let Some(el) = element(document, id) else {
        return;
    };
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Resize the canvas backing store to its CSS size times the device pixel
/// ratio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        canvas.set_width(((rect.width() * dpr) as u32).max(1));
        canvas.set_height(((rect.height() * dpr) as u32).max(1));
    }
}
