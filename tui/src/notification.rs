//! Notification banners for page actions.
//!
//! `NotificationCenter` is a bounded queue of transient banners: success
//! messages expire after a few seconds (the way the original pages hid
//! their success divs on a timer), errors persist until the next
//! submission clears them. Expired entries are pruned on access.

use serde::{Deserialize, Serialize};

/// How long a success banner stays visible, in milliseconds.
pub const SUCCESS_TTL_MS: u64 = 3500;


/// The severity of a notification banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl NotificationKind {
    /// ANSI color for this kind.
    pub fn color(&self) -> &str {
        match self {
            NotificationKind::Info => "\x1b[36m",
            NotificationKind::Success => "\x1b[32m",
            NotificationKind::Error => "\x1b[31m",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        }
    }
}


/// A single banner entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub body: String,
    /// Timestamp (ms since epoch) when the banner was created.
    pub created_ms: u64,
    /// Time-to-live in milliseconds; `None` persists until cleared.
    pub ttl_ms: Option<u64>,
}

impl Notification {
    /// Whether this banner has outlived its TTL at time `now_ms`.
    pub fn expired(&self, now_ms: u64) -> bool {
        match self.ttl_ms {
            Some(ttl) => now_ms.saturating_sub(self.created_ms) >= ttl,
            None => false,
        }
    }
}


/// Bounded queue of notification banners.
pub struct NotificationCenter {
    items: Vec<Notification>,
    max_items: usize,
}


impl NotificationCenter {
    pub fn new(max_items: usize) -> Self {
        NotificationCenter {
            items: Vec::new(),
            max_items,
        }
    }

    fn push(&mut self, kind: NotificationKind, body: &str, now_ms: u64, ttl_ms: Option<u64>) {
        if self.items.len() >= self.max_items {
            self.items.remove(0);
        }
        self.items.push(Notification {
            kind,
            body: body.to_string(),
            created_ms: now_ms,
            ttl_ms,
        });
    }

    /// Push a success banner that expires after [`SUCCESS_TTL_MS`].
    pub fn success(&mut self, body: &str, now_ms: u64) {
        self.push(NotificationKind::Success, body, now_ms, Some(SUCCESS_TTL_MS));
    }

    /// Push a persistent error banner.
    pub fn error(&mut self, body: &str, now_ms: u64) {
        self.push(NotificationKind::Error, body, now_ms, None);
    }

    /// Push an info banner that expires like a success banner.
    pub fn info(&mut self, body: &str, now_ms: u64) {
        self.push(NotificationKind::Info, body, now_ms, Some(SUCCESS_TTL_MS));
    }

    /// Drop expired banners.
    pub fn prune(&mut self, now_ms: u64) {
        self.items.retain(|n| !n.expired(now_ms));
    }

    /// Remove error banners. Called when a new submission begins, the
    /// way the original pages blanked their error divs before each call.
    pub fn clear_errors(&mut self) {
        self.items.retain(|n| n.kind != NotificationKind::Error);
    }

    /// The most recent unexpired banner, if any.
    pub fn latest(&mut self, now_ms: u64) -> Option<&Notification> {
        self.prune(now_ms);
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_expires_after_ttl() {
        let mut center = NotificationCenter::new(10);
        center.success("Device successfully updated.", 1_000);
        assert!(center.latest(1_000).is_some());
        assert!(center.latest(1_000 + SUCCESS_TTL_MS).is_none());
    }

    #[test]
    fn error_persists_until_cleared() {
        let mut center = NotificationCenter::new(10);
        center.error("Error: device has open work orders", 1_000);
        assert!(center.latest(1_000_000).is_some());

        center.clear_errors();
        assert!(center.is_empty());
    }

    #[test]
    fn clear_errors_keeps_other_banners() {
        let mut center = NotificationCenter::new(10);
        center.error("boom", 0);
        center.success("saved", 0);
        center.clear_errors();
        assert_eq!(center.len(), 1);
        assert_eq!(center.latest(0).unwrap().kind, NotificationKind::Success);
    }

    #[test]
    fn queue_is_bounded() {
        let mut center = NotificationCenter::new(2);
        center.error("one", 0);
        center.error("two", 0);
        center.error("three", 0);
        assert_eq!(center.len(), 2);
        assert_eq!(center.latest(0).unwrap().body, "three");
    }

    #[test]
    fn latest_prefers_most_recent() {
        let mut center = NotificationCenter::new(10);
        center.info("loading", 0);
        center.success("done", 10);
        assert_eq!(center.latest(10).unwrap().body, "done");
    }

    #[test]
    fn notification_round_trip() {
        let banner = Notification {
            kind: NotificationKind::Error,
            body: "backend error".into(),
            created_ms: 42,
            ttl_ms: None,
        };
        let json = serde_json::to_string(&banner).unwrap();
        let back: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, NotificationKind::Error);
        assert_eq!(back.body, "backend error");
    }
}
