use crate::dom;
use crate::frame::InstantClock;
use crate::input;
use crate::Shared;
use hexaphone_core::Clock;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn on_mouse(
    canvas: &web::HtmlCanvasElement,
    event: &str,
    handler: impl FnMut(web::MouseEvent) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::MouseEvent)>);
    let _ = canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn on_touch(
    canvas: &web::HtmlCanvasElement,
    event: &str,
    handler: impl FnMut(web::TouchEvent) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::TouchEvent)>);
    let _ = canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Mouse and touch listeners on the canvas, feeding the board in canvas
/// pixels.
pub fn wire_input_handlers(board: Shared, canvas: web::HtmlCanvasElement, clock: InstantClock) {
    // mousedown
    {
        let board = board.clone();
        on_mouse(&canvas, "mousedown", move |_| {
            board.borrow_mut().pointer_down(clock.now_ms());
        });
    }
    // mousemove
    {
        let board = board.clone();
        let c = canvas.clone();
        on_mouse(&canvas, "mousemove", move |ev| {
            let p = input::mouse_canvas_px(&ev, &c);
            board.borrow_mut().pointer_move(p.x, p.y, clock.now_ms());
        });
    }
    // mouseup / mouseleave
    for event in ["mouseup", "mouseleave"] {
        let board = board.clone();
        on_mouse(&canvas, event, move |_| board.borrow_mut().pointer_up());
    }
    // click
    {
        let board = board.clone();
        let c = canvas.clone();
        on_mouse(&canvas, "click", move |ev| {
            let p = input::mouse_canvas_px(&ev, &c);
            if board.borrow_mut().click(p.x, p.y).is_none() {
                log::debug!("[input] click at ({:.0}, {:.0}) hit no playable key", p.x, p.y);
            }
        });
    }
    // touchstart: every finger down, including the one just placed
    {
        let board = board.clone();
        let c = canvas.clone();
        on_touch(&canvas, "touchstart", move |ev| {
            ev.prevent_default();
            let points = input::touch_points(&ev.touches(), &c);
            board.borrow_mut().touch_start(&points, clock.now_ms());
        });
    }
    // touchmove: every finger still down
    {
        let board = board.clone();
        let c = canvas.clone();
        on_touch(&canvas, "touchmove", move |ev| {
            ev.prevent_default();
            let points = input::touch_points(&ev.touches(), &c);
            board.borrow_mut().touch_move(&points, clock.now_ms());
        });
    }
    // touchend / touchcancel
    for event in ["touchend", "touchcancel"] {
        let board = board.clone();
        on_touch(&canvas, event, move |ev| {
            let ids = input::touch_ids(&ev.changed_touches());
            board.borrow_mut().touch_end(&ids);
        });
    }
}

/// Keeps the canvas backing store and the layout in step with the window.
pub fn wire_resize(board: Shared, canvas: web::HtmlCanvasElement) {
    let Some(window) = web::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move || {
        let (w, h) = dom::canvas_backing_size(&canvas);
        board.borrow_mut().resize(w, h);
    }) as Box<dyn FnMut()>);
    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}
