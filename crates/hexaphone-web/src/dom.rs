use hexaphone_core::BoardConfig;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Size the canvas backing store should have: its CSS size times the device
/// pixel ratio.
pub fn canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    let Some(w) = web::window() else {
        return (canvas.width(), canvas.height());
    };
    let dpr = w.device_pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    let w_px = ((rect.width() * dpr) as u32).max(1);
    let h_px = ((rect.height() * dpr) as u32).max(1);
    (w_px, h_px)
}

/// Replaces the text of an optional element; pages without it are fine.
#[inline]
pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}

/// Reads board settings from the page's query string, e.g.
/// `?tonality=D%20minor&timbre=piano&broadcast=localhost:4562`.
pub fn config_from_query(window: &web::Window) -> BoardConfig {
    let mut config = BoardConfig::default();
    let Ok(search) = window.location().search() else {
        return config;
    };
    let Ok(params) = web::UrlSearchParams::new_with_str(&search) else {
        return config;
    };
    // key names come from the raw string so unknown ones get reported too
    let keys: Vec<String> = search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split('=').next())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    let pairs: Vec<(String, String)> = keys
        .into_iter()
        .filter_map(|k| params.get(&k).map(|v| (k, v)))
        .collect();
    config.apply_all(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    config
}
