/// Authenticated session handling
///
/// `SessionClient` is the long-lived external session handle: its tokens
/// mutate in place on refresh while the reference stays the same, and it
/// announces those mutations through the subscription surface consumed by
/// the entity bridge. `TransferPayload` parses credentials handed off from
/// another device or tab (a deep link fragment) as opposed to interactive
/// sign-in.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use thiserror::Error;

use super::bridge::{Capability, Entity, Listener, Subscribe, SubscriptionId, UPDATED_EVENT};

/// Authentication failures, worded for direct display to the user
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("This sign-in link is malformed. Request a new one and try again.")]
    MalformedTransfer,
    #[error("This sign-in link is missing credentials. Request a new one and try again.")]
    MissingCredentials,
}

/// Credentials carried by a session-transfer deep link
///
/// Accepted shape is a URL fragment: `access_token=…&refresh_token=…`
/// with an optional `expires_in` in seconds. A full deep link such as
/// `restyle://session#access_token=…` is accepted too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Option<i64>,
}

impl TransferPayload {
    /// Parse a transfer fragment
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        // Keep only the fragment part of a full deep link
        let fragment = raw.rsplit('#').next().unwrap_or(raw).trim();

        if fragment.is_empty() {
            return Err(SessionError::MalformedTransfer);
        }

        let mut access_token = None;
        let mut refresh_token = None;
        let mut expires_in = None;

        for pair in fragment.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(SessionError::MalformedTransfer);
            };
            match key {
                "access_token" => access_token = Some(value.to_string()),
                "refresh_token" => refresh_token = Some(value.to_string()),
                "expires_in" => expires_in = value.parse::<i64>().ok(),
                // Unknown keys are tolerated; transfer links grow fields
                _ => {}
            }
        }

        match (access_token, refresh_token) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Ok(TransferPayload {
                    access_token: access,
                    refresh_token: refresh,
                    expires_in,
                })
            }
            _ => Err(SessionError::MissingCredentials),
        }
    }
}

/// Mutable token state behind the handle
#[derive(Debug, Clone)]
struct SessionTokens {
    access_token: String,
    refresh_token: String,
    /// Unix seconds after which the access token is stale
    expires_at: Option<i64>,
}

/// The opaque session handle
///
/// Holders keep one `Arc<SessionClient>` for the whole session; refreshes
/// mutate the tokens in place and fire "updated" to subscribers.
pub struct SessionClient {
    tokens: Mutex<SessionTokens>,
    listeners: Mutex<Vec<(SubscriptionId, String, Listener)>>,
    next_listener: Mutex<u64>,
}

impl SessionClient {
    pub fn from_tokens(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: Option<i64>,
    ) -> Self {
        SessionClient {
            tokens: Mutex::new(SessionTokens {
                access_token: access_token.into(),
                refresh_token: refresh_token.into(),
                expires_at: expires_in.map(|secs| Utc::now().timestamp() + secs),
            }),
            listeners: Mutex::new(Vec::new()),
            next_listener: Mutex::new(0),
        }
    }

    pub fn from_transfer(payload: &TransferPayload) -> Self {
        Self::from_tokens(
            payload.access_token.clone(),
            payload.refresh_token.clone(),
            payload.expires_in,
        )
    }

    pub fn access_token(&self) -> String {
        self.tokens.lock().unwrap().access_token.clone()
    }

    pub fn refresh_token(&self) -> String {
        self.tokens.lock().unwrap().refresh_token.clone()
    }

    /// Whether the session can currently authenticate requests
    pub fn is_session_valid(&self) -> bool {
        let tokens = self.tokens.lock().unwrap();
        !tokens.access_token.is_empty()
            && tokens
                .expires_at
                .map_or(true, |at| at > Utc::now().timestamp())
    }

    /// Install refreshed tokens and notify subscribers
    ///
    /// This is the in-place mutation the entity bridge exists to observe.
    pub fn apply_refresh(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: Option<i64>,
    ) {
        {
            let mut tokens = self.tokens.lock().unwrap();
            tokens.access_token = access_token.into();
            tokens.refresh_token = refresh_token.into();
            tokens.expires_at = expires_in.map(|secs| Utc::now().timestamp() + secs);
        }
        self.emit(UPDATED_EVENT);
    }

    /// Run all listeners registered for an event
    fn emit(&self, event: &str) {
        // Clone out so listeners run without holding the table lock
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, name, _)| name == event)
            .map(|(_, _, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

impl Subscribe for SessionClient {
    fn subscribe(&self, event: &str, listener: Listener) -> SubscriptionId {
        let mut next = self.next_listener.lock().unwrap();
        let id = SubscriptionId(*next);
        *next += 1;
        self.listeners
            .lock()
            .unwrap()
            .push((id, event.to_string(), listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.lock().unwrap().retain(|(sid, _, _)| *sid != id);
    }
}

impl Entity for SessionClient {
    fn capability(&self) -> Capability<'_> {
        Capability::Subscribable(self)
    }
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("valid", &self.is_session_valid())
            .finish()
    }
}

/// Render-ready projection of the session handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub signed_in: bool,
    pub expires_at: Option<i64>,
}

impl SessionSnapshot {
    pub fn signed_out() -> Self {
        SessionSnapshot {
            signed_in: false,
            expires_at: None,
        }
    }

    /// Project a possibly-absent session handle
    pub fn of(client: Option<&SessionClient>) -> Self {
        match client {
            Some(client) => SessionSnapshot {
                signed_in: client.is_session_valid(),
                expires_at: client.tokens.lock().unwrap().expires_at,
            },
            None => Self::signed_out(),
        }
    }
}

/// Authentication status owned by the coordinator
#[derive(Debug, Default)]
pub struct AuthState {
    /// The adopted or signed-in session handle, if any
    pub client: Option<Arc<SessionClient>>,
    /// Whether a session handle is installed
    pub is_authenticated: bool,
    /// One-shot flag: the current session came from an external transfer;
    /// cleared once the banner is acknowledged
    pub session_transferred: bool,
    /// Last auth-related failure, cleared on successful (re)authentication
    pub error: Option<String>,
}
