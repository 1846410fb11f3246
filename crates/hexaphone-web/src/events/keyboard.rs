use crate::Shared;
use hexaphone_core::{Mode, Timbre, Tonality};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[inline]
pub fn root_for_key(key: &str) -> Option<&'static str> {
    match key {
        "a" | "A" => Some("A"),
        "b" | "B" => Some("B"),
        "c" | "C" => Some("C"),
        "d" | "D" => Some("D"),
        "e" | "E" => Some("E"),
        "f" | "F" => Some("F"),
        "g" | "G" => Some("G"),
        _ => None,
    }
}

#[inline]
pub fn mode_for_digit(key: &str) -> Option<Mode> {
    match key {
        "1" => Some(Mode::Major),
        "2" => Some(Mode::Minor),
        _ => None,
    }
}

#[inline]
pub fn timbre_for_key(key: &str) -> Option<Timbre> {
    match key {
        "q" | "Q" => Some(Timbre::Basic),
        "w" | "W" => Some(Timbre::Piano),
        "e" | "E" => Some(Timbre::Violin),
        "r" | "R" => Some(Timbre::Saxophone),
        "t" | "T" => Some(Timbre::Harp),
        _ => None,
    }
}

/// Selects a timbre and loads its samples in the background.
pub fn select_timbre(board: &Shared, timbre: Timbre) {
    let load = board.borrow_mut().set_timbre(timbre);
    spawn_local(async move {
        if let Err(e) = load.await {
            log::warn!("[audio] {}", e);
        }
    });
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, board: &Shared, canvas: &web::HtmlCanvasElement) {
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    let key = ev.key();
    // 'e' picks the violin; Shift+E is the E root
    if let Some(timbre) = timbre_for_key(&key).filter(|_| !ev.shift_key()) {
        select_timbre(board, timbre);
        return;
    }
    if let Some(root) = root_for_key(&key) {
        let mut b = board.borrow_mut();
        let mode = b.tonality().map_or(Mode::Major, |t| t.mode());
        b.set_tonality(Tonality::new(root, mode));
        return;
    }
    if let Some(mode) = mode_for_digit(&key) {
        let mut b = board.borrow_mut();
        let next = match b.tonality() {
            Some(t) => t.with_mode(mode),
            None => match Tonality::new("C", mode) {
                Some(t) => t,
                None => return,
            },
        };
        b.set_tonality(Some(next));
        return;
    }
    match key.as_str() {
        "0" => board.borrow_mut().set_tonality(None),
        "l" | "L" => {
            let mut b = board.borrow_mut();
            let next = b.labels().next();
            b.set_labels(next);
        }
        "Enter" => {
            if let Some(doc) = web::window().and_then(|w| w.document()) {
                if doc.fullscreen_element().is_some() {
                    doc.exit_fullscreen();
                } else {
                    let _ = canvas.request_fullscreen();
                }
            }
            ev.prevent_default();
        }
        _ => {}
    }
}

pub fn wire_global_keydown(board: Shared, canvas: web::HtmlCanvasElement) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &board, &canvas);
            }) as Box<dyn FnMut(_)>);
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
