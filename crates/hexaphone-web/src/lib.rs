#![cfg(target_arch = "wasm32")]
mod audio;
mod broadcast;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod surface;

use crate::audio::WebAudioEngine;
use crate::broadcast::WebSocketSink;
use crate::frame::InstantClock;
use crate::surface::CanvasSurface;
use futures::StreamExt;
use hexaphone_core::{Board, Surface};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// The board every event handler and the render loop share.
pub(crate) type Shared = Rc<RefCell<Board<WebAudioEngine, CanvasSurface>>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hexaphone-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let config = dom::config_from_query(&window);
    log::info!("[board] config {:?}", config);

    let (w, h) = dom::canvas_backing_size(&canvas);
    let mut surface = CanvasSurface::new(canvas.clone())?;
    surface.resize(w, h);

    let broadcast_target = config.broadcast.clone();
    let initial_timbre = config.timbre;
    let board: Shared = Rc::new(RefCell::new(Board::new(
        config,
        WebAudioEngine::new(),
        surface,
    )));

    if let Some(target) = broadcast_target {
        match WebSocketSink::connect(&target) {
            Ok(sink) => board.borrow_mut().set_broadcast(Some(Box::new(sink))),
            Err(e) => log::warn!("[broadcast] disabled: {:?}", e),
        }
    }

    wire_hints(&board, &document);

    let clock = InstantClock::new();
    events::wire_input_handlers(board.clone(), canvas.clone(), clock);
    events::wire_global_keydown(board.clone(), canvas.clone());
    events::wire_resize(board.clone(), canvas);

    // Audio may only start from a user gesture: the overlay button.
    {
        let board = board.clone();
        let doc = document.clone();
        dom::add_click_listener(&document, "overlay-ok", move || {
            overlay::hide(&doc);
            let start = board.borrow().start_audio();
            let board = board.clone();
            let doc = doc.clone();
            spawn_local(async move {
                if let Err(e) = start.await {
                    log::error!("[audio] {}", e);
                    overlay::show_error(&doc, &e.to_string());
                    return;
                }
                events::keyboard::select_timbre(&board, initial_timbre);
            });
        });
    }

    frame::start_loop(board, clock);
    log::info!("[board] ready");
    Ok(())
}

/// Mirrors the current tonality and timbre into optional hint elements.
fn wire_hints(board: &Shared, document: &web::Document) {
    let mut tonalities = board.borrow_mut().subscribe_tonality();
    let doc = document.clone();
    spawn_local(async move {
        while let Some(t) = tonalities.next().await {
            let text = t.map_or_else(|| "chromatic".to_string(), |t| t.to_string());
            dom::set_text(&doc, "tonality-hint", &text);
        }
    });

    let mut timbres = board.borrow_mut().subscribe_timbre();
    let doc = document.clone();
    spawn_local(async move {
        while let Some(t) = timbres.next().await {
            dom::set_text(&doc, "timbre-hint", t.name());
        }
    });
}
