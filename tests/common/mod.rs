//! In-memory stand-in for the server side of the handshake.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use credseal::crypto::{DomainParameters, KeyExchange, SessionKey};
use credseal::errors::{CredSealError, Result};
use credseal::transport::Transport;
use num_bigint::BigUint;
use tokio::sync::Notify;

/// RFC 3526 1536-bit MODP group prime.
pub const MODP_1536_HEX: &str = "\
FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
9ED529077096966D670C354E4ABC9804F1746C08CA237327FFFFFFFFFFFFFFFF";

/// The server's own fixed private exponent.
pub const SERVER_PRIVATE_HEX: &str = "1234567890ABCDEF1234567890ABCDEF12345678";

pub fn modp_params() -> DomainParameters {
    DomainParameters::from_wire(MODP_1536_HEX, "2").unwrap()
}

#[derive(Default)]
pub struct FakeServer {
    fetch_calls: AtomicUsize,
    exchange_calls: AtomicUsize,
    /// When set, `fetch_params` waits for a permit before answering.
    pub fetch_gate: Option<Arc<Notify>>,
    /// Number of upcoming parameter fetches that answer `success: false`.
    pub failing_fetches: AtomicUsize,
    /// Number of upcoming exchanges that answer `success: false`.
    pub failing_exchanges: AtomicUsize,
    session_keys: Mutex<Vec<SessionKey>>,
    client_publics: Mutex<Vec<BigUint>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            fetch_gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    /// Session key the server derived in its most recent exchange.
    pub fn last_session_key(&self) -> SessionKey {
        self.session_keys.lock().unwrap().last().cloned().expect("no exchange yet")
    }

    pub fn client_publics(&self) -> Vec<BigUint> {
        self.client_publics.lock().unwrap().clone()
    }

    fn server_side(&self) -> KeyExchange {
        let private = BigUint::parse_bytes(SERVER_PRIVATE_HEX.as_bytes(), 16).unwrap();
        KeyExchange::with_private_exponent(modp_params(), private)
    }
}

fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl Transport for FakeServer {
    async fn fetch_params(&self) -> Result<DomainParameters> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        // Suspend like a real round trip so concurrent callers can join.
        tokio::task::yield_now().await;
        if let Some(gate) = &self.fetch_gate {
            gate.notified().await;
        }
        if take_failure(&self.failing_fetches) {
            return Err(CredSealError::Server("crypto parameters unavailable".into()));
        }
        Ok(modp_params())
    }

    async fn exchange(&self, client_public: &BigUint) -> Result<BigUint> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.failing_exchanges) {
            return Err(CredSealError::Server("invalid public key".into()));
        }

        let server = self.server_side();
        let key = server.compute_shared(client_public).to_session_key()?;
        self.session_keys.lock().unwrap().push(key);
        self.client_publics.lock().unwrap().push(client_public.clone());

        Ok(server.public_value().clone())
    }
}
