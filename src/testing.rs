//! In-process doubles for the authorization core: an in-memory role store,
//! a scripted credential verifier, and a deterministic picker. Available in
//! test builds only.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::auth::invariant::Picker;
use crate::auth::verifier::CredentialVerifier;
use crate::database::manager::StoreError;
use crate::database::models::role::Role;
use crate::database::roles::RoleStore;

#[derive(Default)]
struct State {
    users: Vec<(i64, String)>,
    roles: Vec<Role>,
    assignments: HashSet<(i64, i64)>,
}

/// In-memory `RoleStore` with a call counter, so tests can assert that a
/// denied request never touched the store.
#[derive(Default)]
pub struct MemoryRoleStore {
    state: Mutex<State>,
    calls: AtomicUsize,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roles(self, roles: &[(i64, &str)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for (role_id, role_name) in roles {
                state.roles.push(Role {
                    role_id: *role_id,
                    role_name: role_name.to_string(),
                });
            }
            state.roles.sort_by_key(|r| r.role_id);
        }
        self
    }

    pub fn with_users(self, users: &[(i64, &str)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for (user_id, email) in users {
                state.users.push((*user_id, email.to_string()));
            }
            state.users.sort_by_key(|(id, _)| *id);
        }
        self
    }

    pub fn with_assignment(self, user_id: i64, role_id: i64) -> Self {
        self.state
            .lock()
            .unwrap()
            .assignments
            .insert((user_id, role_id));
        self
    }

    pub fn assignment_count(&self) -> usize {
        self.state.lock().unwrap().assignments.len()
    }

    pub fn has_assignment(&self, user_id: i64, role_id: i64) -> bool {
        self.state
            .lock()
            .unwrap()
            .assignments
            .contains(&(user_id, role_id))
    }

    /// Current assignment set, sorted for comparison
    pub fn assignments(&self) -> Vec<(i64, i64)> {
        let mut pairs: Vec<_> = self
            .state
            .lock()
            .unwrap()
            .assignments
            .iter()
            .copied()
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Total store operations observed, reads and writes alike
    pub fn total_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn roles_for_user(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        self.touch();
        let state = self.state.lock().unwrap();
        let mut names: Vec<String> = state
            .assignments
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, rid)| {
                state
                    .roles
                    .iter()
                    .find(|r| r.role_id == *rid)
                    .map(|r| r.role_name.clone())
            })
            .collect();
        names.sort();
        Ok(names)
    }

    async fn role_catalog(&self) -> Result<Vec<Role>, StoreError> {
        self.touch();
        Ok(self.state.lock().unwrap().roles.clone())
    }

    async fn role_id_by_name(&self, role_name: &str) -> Result<Option<i64>, StoreError> {
        self.touch();
        Ok(self
            .state
            .lock()
            .unwrap()
            .roles
            .iter()
            .find(|r| r.role_name == role_name)
            .map(|r| r.role_id))
    }

    async fn has_assignment_for_role(&self, role_name: &str) -> Result<bool, StoreError> {
        self.touch();
        let state = self.state.lock().unwrap();
        let role_id = state
            .roles
            .iter()
            .find(|r| r.role_name == role_name)
            .map(|r| r.role_id);
        Ok(match role_id {
            Some(rid) => state.assignments.iter().any(|(_, r)| *r == rid),
            None => false,
        })
    }

    async fn user_ids(&self) -> Result<Vec<i64>, StoreError> {
        self.touch();
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .map(|(id, _)| *id)
            .collect())
    }

    async fn user_id_by_email(&self, email: &str) -> Result<Option<i64>, StoreError> {
        self.touch();
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|(_, e)| e == email)
            .map(|(id, _)| *id))
    }

    async fn user_exists(&self, user_id: i64) -> Result<bool, StoreError> {
        self.touch();
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .any(|(id, _)| *id == user_id))
    }

    async fn assign_role(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        self.touch();
        self.state
            .lock()
            .unwrap()
            .assignments
            .insert((user_id, role_id));
        Ok(())
    }
}

/// Verifier double with a fixed answer and a call counter.
pub struct ScriptedVerifier {
    accept: bool,
    calls: AtomicUsize,
}

impl ScriptedVerifier {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialVerifier for ScriptedVerifier {
    async fn verify(&self, _email: &str, _password: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.accept
    }
}

/// Picker that replays a scripted index sequence, falling back to 0, and
/// always clamped into bounds.
pub struct SeqPicker {
    picks: Vec<usize>,
    pos: AtomicUsize,
}

impl SeqPicker {
    pub fn new(picks: &[usize]) -> Self {
        Self {
            picks: picks.to_vec(),
            pos: AtomicUsize::new(0),
        }
    }
}

impl Picker for SeqPicker {
    fn pick(&self, len: usize) -> usize {
        let i = self.pos.fetch_add(1, Ordering::SeqCst);
        let choice = self.picks.get(i).copied().unwrap_or(0);
        choice.min(len.saturating_sub(1))
    }
}
