//! Single-flight Diffie–Hellman handshake.
//!
//! `HandshakeCoordinator::obtain_session_key` runs the full round trip:
//!
//! ```text
//! IDLE -> FETCHING_PARAMS -> GENERATING_KEYS -> EXCHANGING
//!      -> DERIVING_SESSION_KEY -> COMPLETE | FAILED -> IDLE
//! ```
//!
//! At most one handshake is in flight per coordinator. Callers arriving
//! while one is running await the same shared future and receive the same
//! session key (or the same error). The in-flight marker is cleared when
//! the handshake settles, on every exit path, so the next call starts over.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, Once, PoisonError, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::crypto::{ExponentPolicy, KeyExchange, SessionKey};
use crate::errors::{CredSealError, Result};
use crate::transport::{HttpTransport, Transport};

type HandshakeFuture = Shared<BoxFuture<'static, Result<SessionKey>>>;

static FIXED_EXPONENT_WARNING: Once = Once::new();

/// Where the current handshake is, as seen by observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    FetchingParams,
    GeneratingKeys,
    Exchanging,
    DerivingSessionKey,
    Complete,
    Failed,
}

struct InFlight {
    id: u64,
    future: HandshakeFuture,
}

struct Inner {
    in_flight: Option<InFlight>,
    state: HandshakeState,
    next_id: u64,
}

/// Coordinates handshakes against one server.
///
/// Cheap to clone; clones share the same in-flight marker.
#[derive(Clone)]
pub struct HandshakeCoordinator {
    transport: Arc<dyn Transport>,
    policy: ExponentPolicy,
    timeout: Option<Duration>,
    inner: Arc<Mutex<Inner>>,
}

impl HandshakeCoordinator {
    /// Coordinator with the legacy fixed exponent and no handshake bound.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            policy: ExponentPolicy::Fixed,
            timeout: None,
            inner: Arc::new(Mutex::new(Inner {
                in_flight: None,
                state: HandshakeState::Idle,
                next_id: 0,
            })),
        }
    }

    /// Coordinator talking HTTP to the server named in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let transport = HttpTransport::from_settings(settings)?;
        Ok(Self::new(Arc::new(transport))
            .with_policy(settings.exponent_policy())
            .with_timeout(settings.handshake_timeout()))
    }

    pub fn with_policy(mut self, policy: ExponentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bound each handshake; `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> HandshakeState {
        lock(&self.inner).state
    }

    /// Whether a handshake is currently in flight.
    pub fn is_in_flight(&self) -> bool {
        lock(&self.inner).in_flight.is_some()
    }

    /// Obtain a session key, joining the in-flight handshake if there is one.
    pub async fn obtain_session_key(&self) -> Result<SessionKey> {
        let future = {
            let mut inner = lock(&self.inner);
            match &inner.in_flight {
                Some(existing) => {
                    debug!(handshake = existing.id, "joining in-flight key exchange");
                    existing.future.clone()
                }
                None => {
                    inner.next_id += 1;
                    let id = inner.next_id;
                    inner.state = HandshakeState::FetchingParams;

                    let future = self.start(id).boxed().shared();
                    inner.in_flight = Some(InFlight {
                        id,
                        future: future.clone(),
                    });
                    future
                }
            }
        };

        future.await
    }

    fn start(&self, id: u64) -> impl Future<Output = Result<SessionKey>> + Send + 'static {
        let transport = Arc::clone(&self.transport);
        // The in-flight entry owns this future, so it must not own `inner`.
        let inner = Arc::downgrade(&self.inner);
        let policy = self.policy;
        let timeout = self.timeout;

        async move {
            let _guard = SettleGuard {
                inner: Weak::clone(&inner),
                id,
            };
            info!(handshake = id, "starting key exchange");
            if policy == ExponentPolicy::Fixed {
                FIXED_EXPONENT_WARNING.call_once(|| {
                    warn!("fixed legacy private exponent in use; no forward secrecy");
                });
            }

            let run = run_handshake(transport.as_ref(), policy, &inner);
            let outcome = match timeout {
                Some(limit) => tokio::time::timeout(limit, run)
                    .await
                    .unwrap_or(Err(CredSealError::Timeout(limit))),
                None => run.await,
            };

            match &outcome {
                Ok(_) => {
                    set_state(&inner, HandshakeState::Complete);
                    info!(handshake = id, "key exchange complete");
                }
                Err(e) => {
                    set_state(&inner, HandshakeState::Failed);
                    warn!(handshake = id, error = %e, "key exchange failed");
                }
            }

            outcome
        }
    }
}

/// The strictly sequential steps of one handshake.
async fn run_handshake(
    transport: &dyn Transport,
    policy: ExponentPolicy,
    inner: &Weak<Mutex<Inner>>,
) -> Result<SessionKey> {
    set_state(inner, HandshakeState::FetchingParams);
    let params = transport.fetch_params().await?;
    debug!(bits = params.modulus.bits(), "received domain parameters");

    set_state(inner, HandshakeState::GeneratingKeys);
    let kex = KeyExchange::new(params, policy)?;

    set_state(inner, HandshakeState::Exchanging);
    let server_public = transport.exchange(kex.public_value()).await?;
    debug!("received server public value");

    set_state(inner, HandshakeState::DerivingSessionKey);
    kex.compute_shared(&server_public).to_session_key()
}

/// Clears the in-flight marker when the handshake future finishes or is
/// dropped, whatever the outcome.
struct SettleGuard {
    inner: Weak<Mutex<Inner>>,
    id: u64,
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        // Gone once every coordinator clone has been dropped.
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut inner = lock(&inner);
        if inner.in_flight.as_ref().is_some_and(|f| f.id == self.id) {
            inner.in_flight = None;
            inner.state = HandshakeState::Idle;
        }
    }
}

fn set_state(inner: &Weak<Mutex<Inner>>, state: HandshakeState) {
    if let Some(inner) = inner.upgrade() {
        lock(&inner).state = state;
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
