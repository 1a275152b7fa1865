//! Named practice sessions and the records they hold.
//!
//! Every session lives in the key-value store under `session:<name>` as a
//! JSON array of records. The active session's records are cached in memory
//! and written back in full after every mutation. Storage failures are
//! logged and absorbed; callers only ever see "it worked" or "nothing
//! happened".

use crate::error::{SerializeSnafu, StoreResult};
use crate::record::{AttemptRecord, Annotation, PenaltyPolicy};
use crate::store::KvStore;
use log::{debug, info, warn};
use snafu::ResultExt;

pub const DEFAULT_SESSION: &str = "Default";
pub const SESSION_PREFIX: &str = "session:";
pub const ACTIVE_KEY: &str = "meta:active";

fn session_key(name: &str) -> String {
    format!("{SESSION_PREFIX}{name}")
}

/// Session registry plus the record store of the active session
#[derive(Debug)]
pub struct SessionRegistry<S: KvStore> {
    store: S,
    active: String,
    records: Vec<AttemptRecord>,
    /// False when the active session's stored value did not load in full;
    /// writing the cache back would drop the unread records.
    writable: bool,
    penalty_policy: PenaltyPolicy,
}

impl<S: KvStore> SessionRegistry<S> {
    /// Opens the registry on the last active session, or "Default"
    pub fn new(store: S, penalty_policy: PenaltyPolicy) -> Self {
        let active = match store.get(ACTIVE_KEY) {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => DEFAULT_SESSION.to_string(),
            Err(e) => {
                warn!("Could not read active session pointer: {e}");
                DEFAULT_SESSION.to_string()
            }
        };

        let mut registry = Self {
            store,
            active,
            records: Vec::new(),
            writable: true,
            penalty_policy,
        };
        let active = registry.active.clone();
        registry.load_active(&active);
        registry
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn penalty_policy(&self) -> PenaltyPolicy {
        self.penalty_policy
    }

    pub fn set_penalty_policy(&mut self, policy: PenaltyPolicy) {
        self.penalty_policy = policy;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Records of the active session, oldest first
    pub fn records(&self) -> &[AttemptRecord] {
        &self.records
    }

    /// Reads a session straight from storage. Records that do not parse
    /// are skipped; a missing or unreadable session is empty.
    pub fn records_of(&self, name: &str) -> Vec<AttemptRecord> {
        self.load(name).0
    }

    /// Whether mutations of the active session reach the store
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Records that parse, plus whether the stored value was read in full
    fn load(&self, name: &str) -> (Vec<AttemptRecord>, bool) {
        let json = match self.store.get(&session_key(name)) {
            Ok(Some(json)) => json,
            Ok(None) => return (Vec::new(), true),
            Err(e) => {
                warn!("Could not load session {name}: {e}");
                return (Vec::new(), false);
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&json) {
            Ok(values) => values,
            Err(e) => {
                warn!("Session {name} holds unreadable records, treating as empty: {e}");
                return (Vec::new(), false);
            }
        };

        let total = values.len();
        let records: Vec<AttemptRecord> = values
            .into_iter()
            .filter_map(|value| {
                serde_json::from_value(value)
                    .map_err(|e| warn!("Skipping unreadable record in session {name}: {e}"))
                    .ok()
            })
            .collect();
        let intact = records.len() == total;
        (records, intact)
    }

    fn load_active(&mut self, name: &str) {
        let (records, intact) = self.load(name);
        if !intact {
            warn!("Session {name} is read-only until its stored records are repaired");
        }
        self.active = name.to_string();
        self.records = records;
        self.writable = intact;
    }

    pub fn exists(&self, name: &str) -> bool {
        matches!(self.store.get(&session_key(name)), Ok(Some(_)))
    }

    /// "Default" first, then persisted sessions in creation order, then the
    /// active session if it has not been written yet.
    pub fn list(&self) -> Vec<String> {
        let keys = self.store.keys().unwrap_or_else(|e| {
            warn!("Could not enumerate sessions: {e}");
            Vec::new()
        });

        let mut names = vec![DEFAULT_SESSION.to_string()];
        names.extend(
            keys.iter()
                .filter_map(|key| key.strip_prefix(SESSION_PREFIX))
                .filter(|name| *name != DEFAULT_SESSION)
                .map(str::to_string),
        );
        if !names.iter().any(|name| *name == self.active) {
            names.push(self.active.clone());
        }
        names
    }

    pub fn append(&mut self, record: AttemptRecord) {
        self.records.push(record);
        self.persist();
    }

    /// Returns false for an out-of-range index or an annotation that
    /// changed nothing.
    pub fn annotate(&mut self, index: usize, annotation: Annotation) -> bool {
        if index >= self.records.len() {
            debug!(
                "Ignoring {:?} on record {} of {} in {}",
                annotation,
                index,
                self.records.len(),
                self.active
            );
            return false;
        }

        let changed = match annotation {
            Annotation::Delete => {
                self.records.remove(index);
                true
            }
            other => self.records[index].annotate(other, self.penalty_policy),
        };

        if changed {
            self.persist();
        }
        changed
    }

    /// Creates an empty session. Empty names and existing names are rejected.
    pub fn create(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            debug!("Ignoring empty session name");
            return false;
        }
        if self.exists(name) {
            debug!("Session {name} already exists");
            return false;
        }

        match self.store.set(&session_key(name), "[]") {
            Ok(()) => {
                info!("Created session {name}");
                true
            }
            Err(e) => {
                warn!("Could not create session {name}: {e}");
                false
            }
        }
    }

    /// Points the registry at `name` without checking that it exists.
    /// Names are trimmed the same way `create` trims them.
    pub fn switch_active(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        self.load_active(name);
        self.persist_active();
        info!("Switched to session {name}");
        true
    }

    /// Removes a session. Returns true when it was the active one, in which
    /// case "Default" becomes active.
    pub fn delete(&mut self, name: &str) -> bool {
        if let Err(e) = self.store.remove(&session_key(name)) {
            warn!("Could not delete session {name}: {e}");
        }
        info!("Deleted session {name}");

        if name != self.active {
            return false;
        }

        self.load_active(DEFAULT_SESSION);
        self.persist_active();
        true
    }

    fn persist(&mut self) {
        if !self.writable {
            warn!(
                "Not saving session {}: its stored value was not read in full",
                self.active
            );
            return;
        }
        if let Err(e) = self.write_records() {
            warn!("Could not save session {}: {e}", self.active);
        }
    }

    fn write_records(&mut self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.records).context(SerializeSnafu {
            session: self.active.clone(),
        })?;
        self.store.set(&session_key(&self.active), &json)
    }

    fn persist_active(&mut self) {
        if let Err(e) = self.store.set(ACTIVE_KEY, &self.active) {
            warn!("Could not save active session pointer: {e}");
        }
    }
}
