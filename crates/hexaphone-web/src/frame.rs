use crate::Shared;
use hexaphone_core::Clock;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Milliseconds since page start, from `performance.now()`.
#[derive(Clone, Copy, Debug)]
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Drives the board's render loop with `setTimeout`. Each tick reschedules
/// itself with the delay the loop returns and stops once the loop is
/// stopped.
pub fn start_loop(board: Shared, clock: InstantClock) {
    board.borrow_mut().start_loop();

    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let next = board.borrow_mut().render_tick(&clock);
        match next {
            Some(delay_ms) => schedule(&tick_clone, delay_ms),
            None => log::info!("[render] loop stopped"),
        }
    }) as Box<dyn FnMut()>));
    schedule(&tick, 0.0);
}

fn schedule(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>, delay_ms: f64) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            delay_ms.round() as i32,
        );
    }
}
