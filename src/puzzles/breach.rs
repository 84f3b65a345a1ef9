//! Team breach.
//!
//! Each crew member holds a key fragment. The door opens when every required
//! role has shared its fragment and flagged ready. Progress lives in the
//! replicated `TeamState`; completion is the AND over the required roles
//! (the whole crew unless the config names a subset), re-derived after every
//! local change and every merge.
//!
//! Fragments are generated from the shared RNG seed, so every client derives
//! the same set without exchanging it.

use log::debug;

use super::{AttemptPolicy, InputOutcome, Lifecycle, Puzzle, PuzzleInput, SeedData, Submission};
use crate::core::{MessageKind, PuzzleConfig, PuzzleKind, PuzzleRng, Role, RoleMap};
use crate::error::ConfigError;
use crate::host::Host;
use crate::team::{TeamPhase, TeamState, TeamUpdate};
use crate::view::{BreachView, PuzzleView};

/// Characters a key fragment is drawn from. No `I`, `O`, `0` or `1`.
pub const FRAGMENT_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Characters per generated fragment.
pub const FRAGMENT_LENGTH: usize = 3;

/// One fragment per role.
pub fn generate_fragments(rng: &mut PuzzleRng) -> RoleMap<String> {
    let alphabet: Vec<char> = FRAGMENT_ALPHABET.chars().collect();
    let mut fragments = RoleMap::with_default();
    for role in Role::ALL {
        fragments[role] = (0..FRAGMENT_LENGTH)
            .map(|_| rng.choose(&alphabet).copied().unwrap_or('A'))
            .collect();
    }
    fragments
}

pub fn validate_fragments(fragments: &RoleMap<String>) -> Result<(), ConfigError> {
    for (role, fragment) in fragments.iter() {
        if fragment.is_empty() || !fragment.chars().all(|c| FRAGMENT_ALPHABET.contains(c)) {
            return Err(ConfigError::InvalidSeed(format!(
                "key fragment for {role} must be non-empty and use {FRAGMENT_ALPHABET}"
            )));
        }
    }
    Ok(())
}

/// Whether every role in `crew` has shared its own fragment and is ready.
#[must_use]
pub fn breach_complete(fragments: &RoleMap<String>, crew: &[Role], team: &TeamState) -> bool {
    team.roles_all(crew, |role, c| c.ready && c.key.as_deref() == Some(fragments[role].as_str()))
}

/// Team breach puzzle.
#[derive(Clone, Debug)]
pub struct BreachPuzzle {
    lifecycle: Lifecycle,
    role: Role,
    crew: Vec<Role>,
    rng: PuzzleRng,
    seed: Option<RoleMap<String>>,
    fragments: Option<RoleMap<String>>,
    team: TeamState,
}

impl BreachPuzzle {
    #[must_use]
    pub fn new(config: &PuzzleConfig, policy: AttemptPolicy) -> Self {
        let seed = match &config.seed_data {
            Some(SeedData::Breach { fragments }) => Some(fragments.clone()),
            _ => None,
        };
        Self {
            lifecycle: Lifecycle::new(
                PuzzleKind::Breach,
                policy,
                "The breach failed. Lockdown initiated.",
            ),
            role: config.role_or_default(),
            crew: config.crew(),
            rng: PuzzleRng::new(config.rng_seed).for_context("breach"),
            seed,
            fragments: None,
            team: TeamState::new(),
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// The local crew member's fragment.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragments.as_ref().map(|f| f[self.role].as_str())
    }

    /// Roles the door waits on.
    #[must_use]
    pub fn crew(&self) -> &[Role] {
        &self.crew
    }

    /// Required roles that have shared a fragment and are ready.
    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.team
            .count_roles(|r, c| self.crew.contains(&r) && c.ready && c.key.is_some())
    }

    fn share_key(&mut self) -> InputOutcome {
        let Some(fragment) = self.fragment().map(str::to_string) else {
            return InputOutcome::Ignored;
        };
        if self.team.contribution(self.role).key.as_deref() == Some(fragment.as_str()) {
            return InputOutcome::Rejected;
        }
        self.team.update_contribution(self.role, |c| {
            c.key = Some(fragment);
            c.record("share");
        });
        InputOutcome::Accepted
    }

    fn toggle_ready(&mut self, host: &mut dyn Host) -> InputOutcome {
        if self.team.contribution(self.role).key.is_none() {
            host.show_message("Share your key fragment first.", MessageKind::Warning);
            return InputOutcome::Rejected;
        }
        self.team.update_contribution(self.role, |c| {
            c.ready = !c.ready;
            c.record(if c.ready { "ready" } else { "unready" });
        });
        InputOutcome::Accepted
    }

    /// Recompute the phase from contributions. Returns whether complete.
    fn derive_phase(&mut self) -> bool {
        let complete = self
            .fragments
            .as_ref()
            .is_some_and(|f| breach_complete(f, &self.crew, &self.team));
        self.team.set_phase(if complete {
            TeamPhase::Complete
        } else {
            TeamPhase::Assembling
        });
        complete
    }
}

impl Puzzle for BreachPuzzle {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn initialize(&mut self, host: &mut dyn Host) {
        self.fragments = Some(match self.seed.take() {
            Some(fragments) => fragments,
            None => generate_fragments(&mut self.rng),
        });
        self.lifecycle.activate(host);
    }

    fn handle_input(&mut self, input: &PuzzleInput, host: &mut dyn Host) -> InputOutcome {
        if !matches!(input, PuzzleInput::ShareKey | PuzzleInput::ToggleReady) {
            return InputOutcome::Ignored;
        }
        if let Err(outcome) = self.lifecycle.admit(host) {
            return outcome;
        }

        let outcome = match input {
            PuzzleInput::ShareKey => self.share_key(),
            _ => self.toggle_ready(host),
        };
        if outcome != InputOutcome::Accepted {
            return outcome;
        }

        let complete = self.derive_phase();
        host.send_team_update(self.team.role_update(self.role));
        if complete {
            return self.lifecycle.succeed(host);
        }
        host.show_message(
            &format!("{}/{} crew ready.", self.ready_count(), self.crew.len()),
            MessageKind::Info,
        );
        InputOutcome::Accepted
    }

    fn submission_data(&self) -> Submission {
        Submission::Breach {
            shared: Role::all()
                .filter_map(|r| self.team.contribution(r).key.clone().map(|k| (r, k)))
                .collect(),
            ready: Role::all().filter(|&r| self.team.contribution(r).ready).collect(),
        }
    }

    fn solution(&self) -> Option<SeedData> {
        self.fragments
            .clone()
            .map(|fragments| SeedData::Breach { fragments })
    }

    fn view(&self) -> PuzzleView {
        let header = self.lifecycle.header();
        PuzzleView::Breach(BreachView {
            role: self.role,
            fragment: self
                .fragment()
                .filter(|_| !header.hints_obscured)
                .map(str::to_string),
            shared: RoleMap::new(|r| self.team.contribution(r).key.is_some()),
            ready: RoleMap::new(|r| self.team.contribution(r).ready),
            phase: self.team.phase(),
            header,
        })
    }

    fn handle_team_update(&mut self, update: &TeamUpdate, host: &mut dyn Host) {
        if !self.lifecycle.is_active() {
            debug!("breach ignoring team update while {:?}", self.lifecycle.status());
            return;
        }
        self.team.merge(update);
        if self.derive_phase() {
            self.lifecycle.succeed(host);
        }
    }

    fn team_state(&self) -> Option<&TeamState> {
        Some(&self.team)
    }
}
