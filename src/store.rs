//! Profile storage boundary.
//!
//! Analyses never reach into a hidden global; callers inject a
//! [`ProfileStore`] and the core stays a pure function of its explicit
//! inputs. The bundled [`MemoryStore`] is a mutex-guarded map handing out
//! `Arc`s, which gives at-most-one construction per id and safe concurrent
//! reads.

use crate::error::{ProfileError, Result};
use crate::model::Profile;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Abstract fetch/insert interface over stored profiles.
///
/// Retention, eviction, and durability are the implementer's concern.
pub trait ProfileStore {
    /// Fetch a profile by id.
    fn get(&self, profile_id: &str) -> Result<Arc<Profile>>;

    /// Store a profile, returning its id.
    fn put(&self, profile: Profile) -> String;
}

/// In-memory store keyed by profile id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: Mutex<HashMap<String, Arc<Profile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored ids in ascending order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .profiles
            .lock()
            .expect("store lock poisoned")
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

impl ProfileStore for MemoryStore {
    fn get(&self, profile_id: &str) -> Result<Arc<Profile>> {
        self.profiles
            .lock()
            .expect("store lock poisoned")
            .get(profile_id)
            .cloned()
            .ok_or_else(|| ProfileError::ProfileNotFound(profile_id.to_string()))
    }

    fn put(&self, profile: Profile) -> String {
        let id = profile.profile_id.clone();
        self.profiles
            .lock()
            .expect("store lock poisoned")
            .insert(id.clone(), Arc::new(profile));
        id
    }
}
