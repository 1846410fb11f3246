//! Minimal publish/subscribe plumbing.
//!
//! `Topic` fans every published value out to all live subscribers; receivers
//! that have been dropped are pruned on the next publish. `Watch` additionally
//! remembers the current value and hands it to new subscribers first.

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};

#[derive(Debug)]
pub struct Topic<T> {
    subscribers: Vec<UnboundedSender<T>>,
}

impl<T> Default for Topic<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<T: Clone> Topic<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<T> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, value: T) {
        self.subscribers
            .retain(|tx| tx.unbounded_send(value.clone()).is_ok());
    }

    fn publish_to_last(&mut self, value: T) {
        if let Some(tx) = self.subscribers.last() {
            let _ = tx.unbounded_send(value);
        }
    }

    /// Live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[derive(Debug)]
pub struct Watch<T> {
    value: T,
    topic: Topic<T>,
}

impl<T: Clone> Watch<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            topic: Topic::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores and publishes a new value; returns the previous one.
    pub fn set(&mut self, value: T) -> T {
        let prev = std::mem::replace(&mut self.value, value.clone());
        self.topic.publish(value);
        prev
    }

    /// New receivers see the current value before any later change.
    pub fn subscribe(&mut self) -> UnboundedReceiver<T> {
        let rx = self.topic.subscribe();
        self.topic.publish_to_last(self.value.clone());
        rx
    }
}
