//! Team state and the merge reducer.
//!
//! Each client holds its own `TeamState`. After any meaningful local change
//! the client broadcasts a `TeamUpdate` carrying its own contribution and the
//! phase (`role_update`); receivers apply it with `merge`. A full `snapshot`
//! is a valid update too.
//!
//! ## Merge Precedence
//!
//! - A role present in the update replaces the local contribution for that
//!   role wholesale (shallow merge).
//! - A role absent from the update keeps its local contribution.
//! - `phase` is replaced only when the update carries one.
//!
//! Applying the same update twice is the same as applying it once. Updates
//! are not ordered: a stale update can overwrite a newer contribution (last
//! merge wins), so completion is always re-derived from contributions rather
//! than trusted from `phase`.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use crate::core::Role;
use crate::error::SyncError;

/// One crew member's share of a team puzzle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contribution {
    /// Position on a shared map, if the puzzle tracks one.
    pub position: Option<(i32, i32)>,

    /// Readiness flag.
    pub ready: bool,

    /// Key fragment this role has shared.
    pub key: Option<String>,

    /// Dial value this role has entered.
    pub dial: Option<u32>,

    /// Actions taken, oldest first.
    pub actions: Vector<String>,
}

impl Contribution {
    /// Mark ready (builder pattern).
    #[must_use]
    pub fn with_ready(mut self, ready: bool) -> Self {
        self.ready = ready;
        self
    }

    /// Set the shared key (builder pattern).
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the entered dial value (builder pattern).
    #[must_use]
    pub fn with_dial(mut self, value: u32) -> Self {
        self.dial = Some(value);
        self
    }

    /// Set the map position (builder pattern).
    #[must_use]
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = Some((x, y));
        self
    }

    /// Record an action.
    pub fn record(&mut self, action: impl Into<String>) {
        self.actions.push_back(action.into());
    }
}

/// Global progress summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamPhase {
    #[default]
    Assembling,
    Complete,
}

/// A broadcast team state: the whole object or a compatible subset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUpdate {
    /// The crew member who sent it, if known.
    pub sender: Option<Role>,

    /// Contributions to replace, keyed by role.
    pub contributions: OrdMap<Role, Contribution>,

    /// Phase to replace, if any.
    pub phase: Option<TeamPhase>,
}

impl TeamUpdate {
    /// An update carrying a single role's contribution.
    #[must_use]
    pub fn for_role(role: Role, contribution: Contribution) -> Self {
        Self {
            sender: Some(role),
            contributions: OrdMap::unit(role, contribution),
            phase: None,
        }
    }

    /// Set the phase (builder pattern).
    #[must_use]
    pub fn with_phase(mut self, phase: TeamPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Set the sender (builder pattern).
    #[must_use]
    pub fn with_sender(mut self, sender: Role) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Encode as a relay payload.
    pub fn encode(&self) -> Result<Vec<u8>, SyncError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a relay payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, SyncError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// One client's copy of the shared team state.
///
/// Backed by `im::OrdMap`, so taking a full snapshot for broadcast is O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamState {
    contributions: OrdMap<Role, Contribution>,
    phase: TeamPhase,
}

impl Default for TeamState {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamState {
    /// Default per-role values for every crew role.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contributions: Role::all().map(|r| (r, Contribution::default())).collect(),
            phase: TeamPhase::Assembling,
        }
    }

    /// A role's contribution.
    #[must_use]
    pub fn contribution(&self, role: Role) -> &Contribution {
        static EMPTY: std::sync::OnceLock<Contribution> = std::sync::OnceLock::new();
        self.contributions
            .get(&role)
            .unwrap_or_else(|| EMPTY.get_or_init(Contribution::default))
    }

    /// Replace a role's contribution.
    pub fn set_contribution(&mut self, role: Role, contribution: Contribution) {
        self.contributions.insert(role, contribution);
    }

    /// Edit a role's contribution in place.
    pub fn update_contribution(&mut self, role: Role, edit: impl FnOnce(&mut Contribution)) {
        let mut contribution = self.contribution(role).clone();
        edit(&mut contribution);
        self.contributions.insert(role, contribution);
    }

    /// Global progress summary.
    #[must_use]
    pub fn phase(&self) -> TeamPhase {
        self.phase
    }

    /// Set the global progress summary.
    pub fn set_phase(&mut self, phase: TeamPhase) {
        self.phase = phase;
    }

    /// The full object as a broadcastable update.
    #[must_use]
    pub fn snapshot(&self, sender: Role) -> TeamUpdate {
        TeamUpdate {
            sender: Some(sender),
            contributions: self.contributions.clone(),
            phase: Some(self.phase),
        }
    }

    /// One role's contribution and the phase, as a broadcastable update.
    ///
    /// Clients broadcast this after local changes rather than a full
    /// snapshot: a full snapshot carries the sender's possibly stale view of
    /// every other role, which would overwrite newer local progress.
    #[must_use]
    pub fn role_update(&self, role: Role) -> TeamUpdate {
        TeamUpdate::for_role(role, self.contribution(role).clone()).with_phase(self.phase)
    }

    /// Shallow-merge an incoming update into this state.
    pub fn merge(&mut self, update: &TeamUpdate) {
        for (role, contribution) in &update.contributions {
            self.contributions.insert(*role, contribution.clone());
        }
        if let Some(phase) = update.phase {
            self.phase = phase;
        }
    }

    /// True when `predicate` holds for every crew role.
    pub fn all_roles(&self, predicate: impl Fn(Role, &Contribution) -> bool) -> bool {
        Role::all().all(|role| predicate(role, self.contribution(role)))
    }

    /// True when `predicate` holds for every role in `roles`.
    ///
    /// An empty `roles` is never satisfied.
    pub fn roles_all(&self, roles: &[Role], predicate: impl Fn(Role, &Contribution) -> bool) -> bool {
        !roles.is_empty() && roles.iter().all(|&role| predicate(role, self.contribution(role)))
    }

    /// Number of crew roles for which `predicate` holds.
    pub fn count_roles(&self, predicate: impl Fn(Role, &Contribution) -> bool) -> usize {
        Role::all().filter(|&role| predicate(role, self.contribution(role))).count()
    }
}

/// The merge reducer: `local` with `incoming` applied.
///
/// ```
/// use heist_puzzles::core::Role;
/// use heist_puzzles::team::{merge, Contribution, TeamState, TeamUpdate};
///
/// let local = TeamState::new();
/// let update = TeamUpdate::for_role(Role::Lookout, Contribution::default().with_ready(true));
///
/// let once = merge(&local, &update);
/// let twice = merge(&once, &update);
/// assert_eq!(once, twice);
/// assert!(once.contribution(Role::Lookout).ready);
/// ```
#[must_use]
pub fn merge(local: &TeamState, incoming: &TeamUpdate) -> TeamState {
    let mut next = local.clone();
    next.merge(incoming);
    next
}
