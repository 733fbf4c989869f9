/// View/session coordinator
///
/// Top-level state machine owning the active screen, the authentication
/// status, and the transformation currently under review. Session freshness
/// is kept current through an entity bridge onto the session handle, so the
/// handle's in-place token refreshes are visible without polling.
///
/// Navigation policy: `current_transformation` is retained across
/// navigation so a user can return to review a result without loss; it is
/// cleared only by an explicit reset or by starting a new capture.

use std::sync::Arc;

use super::bridge::EntityBridge;
use super::data::{ToastId, ToastKind, Transformation};
use super::session::{AuthState, SessionClient, SessionSnapshot, TransferPayload};
use super::toast::ToastQueue;
use super::view::{View, ViewAction};

pub struct Coordinator {
    current_view: View,
    auth: AuthState,
    current_transformation: Option<Transformation>,
    session_bridge: EntityBridge<SessionClient, SessionSnapshot>,
}

impl Coordinator {
    pub fn new() -> Self {
        Coordinator {
            current_view: View::Landing,
            auth: AuthState::default(),
            current_transformation: None,
            session_bridge: EntityBridge::new(SessionSnapshot::of),
        }
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    /// Unconditional transition to a screen
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Apply a named navigation action
    ///
    /// Returns whether a defined edge was taken; an undefined action
    /// leaves the view unchanged.
    pub fn apply(&mut self, action: ViewAction) -> bool {
        match self.current_view.apply(action) {
            Some(next) => {
                self.current_view = next;
                true
            }
            None => false,
        }
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn current_transformation(&self) -> Option<&Transformation> {
        self.current_transformation.as_ref()
    }

    /// Set the transformation under review
    ///
    /// One code path for both a freshly completed transformation and a
    /// revisited history item.
    pub fn set_current_transformation(&mut self, transformation: Transformation) {
        self.current_transformation = Some(transformation);
    }

    /// Clear the transformation under review (new capture starting)
    pub fn clear_transformation(&mut self) {
        self.current_transformation = None;
    }

    /// Explicit reset back to the landing screen
    pub fn reset(&mut self) {
        self.current_view = View::Landing;
        self.current_transformation = None;
    }

    /// Adopt a session supplied out-of-band by the transfer mechanism
    ///
    /// Success installs the handle and clears any previous auth error;
    /// failure records a user-displayable error and leaves authentication
    /// untouched. Either way the transferred flag is raised and a toast is
    /// enqueued — this path renders a transient banner, never a redirect.
    /// The current view never changes. Returns the enqueued toast's id so
    /// the caller can schedule its expiry.
    pub fn adopt_transferred_session(
        &mut self,
        payload: &str,
        toasts: &mut ToastQueue,
    ) -> ToastId {
        self.auth.session_transferred = true;

        match TransferPayload::parse(payload) {
            Ok(payload) => {
                self.install_client(Arc::new(SessionClient::from_transfer(&payload)));
                println!("🔑 Session adopted from transfer");
                toasts.push(ToastKind::Success, "Signed in from your other device")
            }
            Err(e) => {
                let message = e.to_string();
                eprintln!("❌ Session transfer rejected: {}", message);
                self.auth.error = Some(message.clone());
                toasts.push(ToastKind::Error, message)
            }
        }
    }

    /// Interactive sign-in with explicit tokens
    pub fn sign_in(
        &mut self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: Option<i64>,
    ) {
        self.install_client(Arc::new(SessionClient::from_tokens(
            access_token,
            refresh_token,
            expires_in,
        )));
    }

    pub fn sign_out(&mut self) {
        self.session_bridge.set_entity(None);
        self.auth = AuthState::default();
    }

    /// Clear the one-shot transferred flag once the banner is acknowledged
    pub fn acknowledge_transfer(&mut self) {
        self.auth.session_transferred = false;
    }

    /// Record a non-fatal auth failure (e.g. a rejected refresh)
    pub fn record_auth_error(&mut self, message: impl Into<String>) {
        self.auth.error = Some(message.into());
    }

    /// Whether the session can authenticate requests right now
    ///
    /// Combines handle presence with the bridge-derived snapshot, so an
    /// in-place token expiry or refresh is reflected without polling.
    pub fn is_authenticated(&self) -> bool {
        self.auth.client.is_some() && self.session_bridge.value().signed_in
    }

    /// The session handle
    ///
    /// Precondition: a session is installed — callers must gate on
    /// `is_authenticated()`. Calling this without one is a UI-gating bug,
    /// not a user-facing condition, and fails immediately.
    pub fn session(&self) -> &Arc<SessionClient> {
        self.auth
            .client
            .as_ref()
            .expect("operation requires a session; gate on is_authenticated() first")
    }

    fn install_client(&mut self, client: Arc<SessionClient>) {
        self.session_bridge.set_entity(Some(Arc::clone(&client)));
        self.auth.client = Some(client);
        self.auth.is_authenticated = true;
        self.auth.error = None;
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("current_view", &self.current_view)
            .field("authenticated", &self.auth.is_authenticated)
            .field("has_transformation", &self.current_transformation.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::super::data::StyleParams;
    use super::*;

    const GOOD_PAYLOAD: &str = "access_token=abc&refresh_token=def&expires_in=3600";

    fn style() -> Transformation {
        Transformation {
            id: "film-noir".to_string(),
            name: "Film Noir".to_string(),
            category: "cinematic".to_string(),
            parameters: StyleParams::default(),
        }
    }

    #[test]
    fn test_initial_state() {
        let coordinator = Coordinator::new();
        assert_eq!(coordinator.current_view(), View::Landing);
        assert!(!coordinator.is_authenticated());
        assert!(coordinator.current_transformation().is_none());
        assert!(!coordinator.auth().session_transferred);
    }

    #[test]
    fn test_apply_walks_defined_edges_only() {
        let mut coordinator = Coordinator::new();

        assert!(coordinator.apply(ViewAction::StartCapture));
        assert_eq!(coordinator.current_view(), View::Capture);

        // Undefined from Capture: nothing moves
        assert!(!coordinator.apply(ViewAction::OpenHistory));
        assert_eq!(coordinator.current_view(), View::Capture);

        assert!(coordinator.apply(ViewAction::PhotoAccepted));
        assert!(coordinator.apply(ViewAction::TransformationCompleted));
        assert_eq!(coordinator.current_view(), View::Results);
    }

    #[test]
    fn test_transformation_retained_across_navigation() {
        let mut coordinator = Coordinator::new();
        coordinator.set_view(View::Studio);
        coordinator.set_current_transformation(style());

        coordinator.apply(ViewAction::TransformationCompleted);
        coordinator.apply(ViewAction::OpenHistory);
        coordinator.apply(ViewAction::SelectHistoryItem);

        // Still there after a round trip through history
        assert!(coordinator.current_transformation().is_some());

        coordinator.reset();
        assert_eq!(coordinator.current_view(), View::Landing);
        assert!(coordinator.current_transformation().is_none());
    }

    #[test]
    fn test_adopt_valid_payload_authenticates() {
        let mut coordinator = Coordinator::new();
        let mut toasts = ToastQueue::new();

        coordinator.adopt_transferred_session(GOOD_PAYLOAD, &mut toasts);

        assert!(coordinator.is_authenticated());
        assert!(coordinator.auth().session_transferred);
        assert!(coordinator.auth().error.is_none());
        assert_eq!(toasts.toasts().len(), 1);

        coordinator.acknowledge_transfer();
        assert!(!coordinator.auth().session_transferred);
        // Acknowledging the banner does not sign the user out
        assert!(coordinator.is_authenticated());
    }

    #[test]
    fn test_adopt_invalid_payload_raises_banner_state() {
        let mut coordinator = Coordinator::new();
        let mut toasts = ToastQueue::new();
        coordinator.set_view(View::Studio);

        let toast_id = coordinator.adopt_transferred_session("broken link", &mut toasts);

        assert!(coordinator.auth().session_transferred);
        assert!(!coordinator.is_authenticated());
        assert!(!coordinator.auth().error.as_deref().unwrap_or("").is_empty());

        // Failure is non-fatal: the user stays where they were
        assert_eq!(coordinator.current_view(), View::Studio);

        // Dismissing the toast does not alter the view either
        toasts.dismiss(toast_id);
        assert_eq!(coordinator.current_view(), View::Studio);
    }

    #[test]
    fn test_successful_adoption_supersedes_error() {
        let mut coordinator = Coordinator::new();
        let mut toasts = ToastQueue::new();

        coordinator.adopt_transferred_session("broken link", &mut toasts);
        assert!(coordinator.auth().error.is_some());

        coordinator.adopt_transferred_session(GOOD_PAYLOAD, &mut toasts);
        assert!(coordinator.auth().error.is_none());
        assert!(coordinator.is_authenticated());
    }

    #[test]
    fn test_bridge_tracks_in_place_expiry_and_refresh() {
        let mut coordinator = Coordinator::new();
        coordinator.sign_in("abc", "def", Some(3600));
        assert!(coordinator.is_authenticated());

        // The handle expires in place; no reference changed hands
        coordinator.session().apply_refresh("abc", "def", Some(-10));
        assert!(!coordinator.is_authenticated());

        coordinator.session().apply_refresh("fresh", "def", Some(3600));
        assert!(coordinator.is_authenticated());
    }

    #[test]
    fn test_sign_out_clears_auth() {
        let mut coordinator = Coordinator::new();
        coordinator.sign_in("abc", "def", None);
        coordinator.sign_out();

        assert!(!coordinator.is_authenticated());
        assert!(coordinator.auth().client.is_none());
    }

    #[test]
    #[should_panic(expected = "requires a session")]
    fn test_session_without_client_is_a_hard_failure() {
        let coordinator = Coordinator::new();
        let _ = coordinator.session();
    }
}
