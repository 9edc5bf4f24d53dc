//! Device and session identity.
//!
//! Visitors are never authenticated. Instead every browser gets a long-lived
//! pseudo-anonymous **device id** and every pass through the flow gets a
//! **session id**; both are opaque strings persisted in a key/value store the
//! client owns (browser local storage, or [`MemoryStore`] in tests and
//! server-side tooling). All downstream writes (responses, claims,
//! engagement events) are correlated through these two ids.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::OsRng;
use rand::{Rng, TryRngCore};
use uuid::Uuid;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Storage keys
// ---------------------------------------------------------------------------

/// Well-known keys in the client-side key/value store.
///
/// All values are plain strings with no schema versioning; a missing or
/// malformed value is treated as "none", never as an error.
pub mod keys {
    pub const DEVICE_ID: &str = "deviceId";
    pub const SESSION_ID: &str = "currentSessionId";
    pub const PARTNER_ID: &str = "currentPartnerId";
    pub const HOTSPOT_ID: &str = "currentHotspotId";
    pub const USER_EMAIL: &str = "userEmail";
}

// ---------------------------------------------------------------------------
// KeyValueStore
// ---------------------------------------------------------------------------

/// Abstraction over the persisted client-side key/value state.
pub trait KeyValueStore {
    /// Read a key. Missing keys return `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a key, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Remove a key if present.
    fn remove(&self, key: &str);
}

/// In-memory [`KeyValueStore`] for tests and server-side use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

// ---------------------------------------------------------------------------
// Device id
// ---------------------------------------------------------------------------

/// Number of random bytes in a device id (hex-encoded to 32 characters).
const DEVICE_ID_BYTES: usize = 16;

/// Minimum length of a stored device id before it is considered malformed.
const DEVICE_ID_MIN_HEX_LEN: usize = 20;

/// Monotonic discriminator for the degraded device-id fallback.
static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Check that a stored device id looks like one we generated: lowercase hex,
/// at least [`DEVICE_ID_MIN_HEX_LEN`] characters.
pub fn is_valid_device_id(value: &str) -> bool {
    value.len() >= DEVICE_ID_MIN_HEX_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// Generate a fresh device id.
///
/// Uses [`DEVICE_ID_BYTES`] bytes from the OS RNG. When the secure RNG is
/// unavailable the id degrades to a timestamp + counter string — still
/// unique enough for analytics correlation, and the flow must never fail
/// for lack of entropy.
pub fn generate_device_id() -> String {
    let mut bytes = [0u8; DEVICE_ID_BYTES];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => hex::encode(&bytes),
        Err(_) => {
            let now = chrono::Utc::now();
            let counter = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!(
                "{:012x}{:08x}{:04x}",
                now.timestamp_millis(),
                now.timestamp_subsec_nanos(),
                counter & 0xffff
            )
        }
    }
}

/// Read the device id from the store, creating and persisting one when the
/// stored value is absent or malformed.
pub fn get_or_create_device_id(store: &dyn KeyValueStore) -> String {
    if let Some(existing) = store.get(keys::DEVICE_ID) {
        if is_valid_device_id(&existing) {
            return existing;
        }
    }
    let id = generate_device_id();
    store.set(keys::DEVICE_ID, &id);
    id
}

// ---------------------------------------------------------------------------
// Session id
// ---------------------------------------------------------------------------

/// Length of each random segment in a session id.
const SESSION_SEGMENT_LEN: usize = 8;

/// Generate a session id of the form `session-<rand>-<rand>-<epochMillis>`.
///
/// Two calls in the same millisecond still differ because the random
/// segments are drawn independently.
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    let segment = |rng: &mut rand::rngs::ThreadRng| -> String {
        (0..SESSION_SEGMENT_LEN)
            .map(|_| rng.sample(rand::distr::Alphanumeric) as char)
            .collect::<String>()
            .to_lowercase()
    };
    format!(
        "session-{}-{}-{}",
        segment(&mut rng),
        segment(&mut rng),
        chrono::Utc::now().timestamp_millis()
    )
}

/// Read the current session id, creating one when none exists.
///
/// When a `partner_id` is supplied it is persisted alongside for later
/// event correlation.
pub fn get_or_create_session_id(store: &dyn KeyValueStore, partner_id: Option<&str>) -> String {
    if let Some(partner) = partner_id {
        store.set(keys::PARTNER_ID, partner);
    }
    if let Some(existing) = store.get(keys::SESSION_ID) {
        if !existing.is_empty() {
            return existing;
        }
    }
    start_new_session(store, partner_id)
}

/// Unconditionally replace the current session id (flow restart).
pub fn start_new_session(store: &dyn KeyValueStore, partner_id: Option<&str>) -> String {
    let id = generate_session_id();
    store.set(keys::SESSION_ID, &id);
    match partner_id {
        Some(partner) => store.set(keys::PARTNER_ID, partner),
        None => store.remove(keys::PARTNER_ID),
    }
    id
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// Explicit per-visit context threaded through flow operations instead of
/// ad-hoc reads from the key/value store.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub device_id: String,
    pub session_id: String,
    pub partner_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

impl SessionContext {
    /// Assemble a context from the store, creating device/session ids as
    /// needed. Malformed partner/location values are treated as absent.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let device_id = get_or_create_device_id(store);
        let session_id = get_or_create_session_id(store, None);
        let partner_id = store
            .get(keys::PARTNER_ID)
            .and_then(|v| Uuid::parse_str(&v).ok());
        let location_id = store
            .get(keys::HOTSPOT_ID)
            .and_then(|v| Uuid::parse_str(&v).ok());
        Self {
            device_id,
            session_id,
            partner_id,
            location_id,
        }
    }

    /// Epoch milliseconds embedded in the session id, if parseable.
    pub fn session_started_at(&self) -> Option<Timestamp> {
        let millis: i64 = self.session_id.rsplit('-').next()?.parse().ok()?;
        chrono::DateTime::from_timestamp_millis(millis)
    }
}

// ---------------------------------------------------------------------------
// hex encoding helper (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes
            .as_ref()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_is_stable_across_calls() {
        let store = MemoryStore::new();
        let first = get_or_create_device_id(&store);
        let second = get_or_create_device_id(&store);
        assert_eq!(first, second);
        assert!(is_valid_device_id(&first));
    }

    #[test]
    fn cleared_store_yields_a_new_device_id() {
        let store = MemoryStore::new();
        let first = get_or_create_device_id(&store);
        store.remove(keys::DEVICE_ID);
        let second = get_or_create_device_id(&store);
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_device_id_is_replaced() {
        let store = MemoryStore::new();
        store.set(keys::DEVICE_ID, "not-hex-at-all");
        let id = get_or_create_device_id(&store);
        assert!(is_valid_device_id(&id));
        assert_eq!(store.get(keys::DEVICE_ID).as_deref(), Some(id.as_str()));
    }

    #[test]
    fn session_ids_differ_even_within_one_millisecond() {
        let store = MemoryStore::new();
        let a = start_new_session(&store, None);
        let b = start_new_session(&store, None);
        assert_ne!(a, b);
        assert!(a.starts_with("session-"));
    }

    #[test]
    fn start_new_session_replaces_and_tracks_partner() {
        let store = MemoryStore::new();
        let first = get_or_create_session_id(&store, None);
        let second = start_new_session(&store, Some("partner-1"));
        assert_ne!(first, second);
        assert_eq!(store.get(keys::SESSION_ID).as_deref(), Some(second.as_str()));
        assert_eq!(store.get(keys::PARTNER_ID).as_deref(), Some("partner-1"));

        // Restart without a partner clears the stored partner.
        start_new_session(&store, None);
        assert_eq!(store.get(keys::PARTNER_ID), None);
    }

    #[test]
    fn get_or_create_session_reuses_the_existing_id() {
        let store = MemoryStore::new();
        let first = get_or_create_session_id(&store, None);
        let second = get_or_create_session_id(&store, None);
        assert_eq!(first, second);
    }

    #[test]
    fn session_context_ignores_malformed_partner_ids() {
        let store = MemoryStore::new();
        store.set(keys::PARTNER_ID, "definitely-not-a-uuid");
        let ctx = SessionContext::load(&store);
        assert!(ctx.partner_id.is_none());
        assert!(is_valid_device_id(&ctx.device_id));
        assert!(ctx.session_started_at().is_some());
    }
}
