/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The screen state machine (view.rs)
/// - Session handling and the entity bridge (session.rs, bridge.rs)
/// - The coordinator composing view, session and transformation (coordinator.rs)
/// - Persisted transformation history (history.rs, store.rs)
/// - Transient notifications (toast.rs)

pub mod bridge;
pub mod coordinator;
pub mod data;
pub mod history;
pub mod session;
pub mod store;
pub mod toast;
pub mod view;
