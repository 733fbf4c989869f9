/// Transient notification queue
///
/// Holds the set of live toasts in creation order. The queue itself is
/// purely synchronous; auto-expiry is driven by the application scheduling
/// a delayed message per toast (see `Message::ToastExpired` in main.rs).
/// Both the expiry path and manual dismissal funnel into `dismiss`, whose
/// idempotence makes the race between them harmless.

use std::time::Duration;

use chrono::Utc;

use super::data::{Toast, ToastId, ToastKind};

/// How long a toast stays on screen before auto-expiry
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Owner of all live toasts
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a toast and append it to the live set
    ///
    /// Returns the new toast's id so the caller can schedule its expiry.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;

        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
            created_at: Utc::now().timestamp(),
        });

        id
    }

    /// Remove the toast with the given id
    ///
    /// Returns true if a toast was removed. A second call for the same id
    /// is a no-op, which covers the race between the auto-expiry timer and
    /// manual dismissal. Removal never reorders the remaining toasts.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Live toasts in creation order
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Whether a toast with this id is still live
    pub fn is_live(&self, id: ToastId) -> bool {
        self.toasts.iter().any(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_appears_immediately() {
        let mut queue = ToastQueue::new();
        let id = queue.push(ToastKind::Info, "hello");

        assert!(queue.is_live(id));
        assert_eq!(queue.toasts().len(), 1);
        assert_eq!(queue.toasts()[0].message, "hello");
    }

    #[test]
    fn test_dismiss_removes_and_is_idempotent() {
        let mut queue = ToastQueue::new();
        let id = queue.push(ToastKind::Error, "boom");

        assert!(queue.dismiss(id));
        assert!(!queue.is_live(id));

        // Second dismissal (e.g. a stale expiry timer) is a no-op
        assert!(!queue.dismiss(id));
        assert!(queue.toasts().is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_order_is_preserved() {
        let mut queue = ToastQueue::new();
        let a = queue.push(ToastKind::Info, "a");
        let b = queue.push(ToastKind::Warning, "b");
        let c = queue.push(ToastKind::Success, "c");

        assert_ne!(a, b);
        assert_ne!(b, c);

        // Removing the middle toast keeps the others in creation order
        queue.dismiss(b);
        let messages: Vec<&str> = queue.toasts().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "c"]);
    }

    #[test]
    fn test_multiple_toasts_may_be_live_concurrently() {
        let mut queue = ToastQueue::new();
        for i in 0..10 {
            queue.push(ToastKind::Info, format!("toast {i}"));
        }
        assert_eq!(queue.toasts().len(), 10);
    }
}
