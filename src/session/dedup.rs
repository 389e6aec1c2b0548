//! Recognizing API sends on the create-event stream
//!
//! A send through the API is tagged with a marker before dispatch, and its
//! message id is remembered once the client returns it. The create-event
//! listener skips anything carrying a known marker or id, so the same
//! logical send is relayed only once.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::types::ClientMessage;

const MARKER_PREFIX: &str = "bridge-api-";

#[derive(Default)]
struct Recent {
    order: VecDeque<String>,
    set: HashSet<String>,
}

/// Bounded memory of messages sent through the API
pub struct SentRegistry {
    next_marker: AtomicU64,
    capacity: usize,
    recent: Mutex<Recent>,
}

impl SentRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            next_marker: AtomicU64::new(1),
            capacity: capacity.max(1),
            recent: Mutex::new(Recent::default()),
        }
    }

    /// Fresh marker to attach to an outgoing send
    pub fn next_marker(&self) -> String {
        let n = self.next_marker.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", MARKER_PREFIX, n)
    }

    /// Remember the marker or id of a send. The oldest entry is evicted at capacity.
    pub fn remember(&self, key: &str) {
        let mut recent = self.recent.lock();
        if !recent.set.insert(key.to_string()) {
            return;
        }
        recent.order.push_back(key.to_string());
        while recent.order.len() > self.capacity {
            if let Some(old) = recent.order.pop_front() {
                recent.set.remove(&old);
            }
        }
    }

    /// Whether `message` is the echo of an API send
    pub fn is_api_send(&self, message: &ClientMessage) -> bool {
        if let Some(marker) = &message.marker {
            if marker.starts_with(MARKER_PREFIX) {
                return true;
            }
        }
        self.recent.lock().set.contains(&message.id)
    }

    pub fn len(&self) -> usize {
        self.recent.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SentRegistry {
    fn default() -> Self {
        Self::new(1024)
    }
}
