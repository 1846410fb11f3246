//! Best-effort one-way broadcast of triggered notes.
//!
//! Sinks must never block or fail the caller; a sink that cannot deliver just
//! drops the message.

use crate::constants::{BROADCAST_DEFAULT_CHANNEL, BROADCAST_DEFAULT_PORT};
use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteMessage {
    pub frequency: f32,
    pub force: f32,
}

impl NoteMessage {
    pub fn to_json(&self) -> String {
        // two plain floats always serialize; NaN/inf become null
        serde_json::to_string(self).unwrap_or_default()
    }
}

pub trait BroadcastSink {
    fn send(&self, message: &NoteMessage);
}

/// Where a broadcast sink connects: `host[:port][/channel]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BroadcastTarget {
    pub host: String,
    pub port: u16,
    pub channel: String,
}

impl BroadcastTarget {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: BROADCAST_DEFAULT_PORT,
            channel: BROADCAST_DEFAULT_CHANNEL.to_string(),
        }
    }

    pub fn websocket_url(&self) -> String {
        format!("ws://{}:{}/{}", self.host, self.port, self.channel)
    }
}

impl fmt::Display for BroadcastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.channel)
    }
}

impl FromStr for BroadcastTarget {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr, channel) = match s.split_once('/') {
            Some((a, c)) if !c.is_empty() => (a, Some(c)),
            Some((a, _)) => (a, None),
            None => (s, None),
        };
        let (host, port) = match addr.rsplit_once(':') {
            Some((h, p)) => {
                let port = p.parse().map_err(|_| ParseError::new("broadcast target", s))?;
                (h, Some(port))
            }
            None => (addr, None),
        };
        if host.is_empty() {
            return Err(ParseError::new("broadcast target", s));
        }
        let mut target = BroadcastTarget::new(host);
        if let Some(port) = port {
            target.port = port;
        }
        if let Some(channel) = channel {
            target.channel = channel.to_string();
        }
        Ok(target)
    }
}
