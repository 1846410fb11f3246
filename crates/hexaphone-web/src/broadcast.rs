use hexaphone_core::{BroadcastSink, BroadcastTarget, NoteMessage};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Sends every triggered note as JSON over a WebSocket. Messages sent while
/// the socket is connecting, closing or closed are dropped.
pub struct WebSocketSink {
    socket: web::WebSocket,
}

impl WebSocketSink {
    pub fn connect(target: &BroadcastTarget) -> anyhow::Result<Self> {
        let url = target.websocket_url();
        let socket = web::WebSocket::new(&url)
            .map_err(|e| anyhow::anyhow!("websocket {}: {:?}", url, e))?;

        let open_url = url.clone();
        let on_open = Closure::wrap(Box::new(move |_: web::Event| {
            log::info!("[broadcast] connected to {}", open_url);
        }) as Box<dyn FnMut(_)>);
        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        let on_error = Closure::wrap(Box::new(move |_: web::Event| {
            log::debug!("[broadcast] {} connection error", url);
        }) as Box<dyn FnMut(_)>);
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();

        Ok(Self { socket })
    }
}

impl BroadcastSink for WebSocketSink {
    fn send(&self, message: &NoteMessage) {
        if self.socket.ready_state() != web::WebSocket::OPEN {
            return;
        }
        if let Err(e) = self.socket.send_with_str(&message.to_json()) {
            log::debug!("[broadcast] send failed: {:?}", e);
        }
    }
}
