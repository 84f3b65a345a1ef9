//! Team vault lock.
//!
//! The vault opens when every required crew member enters their dial value,
//! in a fixed turn order. The required roles default to the whole crew. Each client runs its own instance; progress is carried
//! by the replicated `TeamState` (one dial value per role), and the current
//! step is re-derived from it after every local change or merge.
//!
//! Confirming out of turn is rejected with a "not your turn" warning and no
//! state change. A wrong value in turn costs an attempt and time.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{AttemptPolicy, InputOutcome, Lifecycle, Puzzle, PuzzleInput, SeedData, Submission};
use crate::core::{MessageKind, PuzzleConfig, PuzzleKind, PuzzleRng, Role};
use crate::error::ConfigError;
use crate::host::Host;
use crate::team::{TeamPhase, TeamState, TeamUpdate};
use crate::view::{PuzzleView, VaultLockView};

/// Positions on a vault dial.
pub const VAULT_DIAL_SIZE: u32 = 10;

/// One entry in the turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VaultStep {
    pub role: Role,
    pub value: u32,
}

/// Every role in `crew` once, in a shuffled turn order, each with a random
/// value.
pub fn generate_steps(rng: &mut PuzzleRng, crew: &[Role]) -> Vec<VaultStep> {
    let mut roles = crew.to_vec();
    rng.shuffle(&mut roles);
    roles
        .into_iter()
        .map(|role| VaultStep {
            role,
            value: rng.gen_range(0..VAULT_DIAL_SIZE),
        })
        .collect()
}

/// A turn order must be non-empty and name no role twice.
pub fn validate_steps(steps: &[VaultStep]) -> Result<(), ConfigError> {
    let repeated = steps
        .iter()
        .enumerate()
        .any(|(i, s)| steps[..i].iter().any(|earlier| earlier.role == s.role));
    if steps.is_empty() || repeated {
        return Err(ConfigError::InvalidSeed(
            "vault turn order must name each role at most once".into(),
        ));
    }
    if steps.iter().any(|s| s.value >= VAULT_DIAL_SIZE) {
        return Err(ConfigError::InvalidSeed(format!(
            "vault values must be below {VAULT_DIAL_SIZE}"
        )));
    }
    Ok(())
}

/// Steps completed, counted from the front of the turn order.
#[must_use]
pub fn steps_done(steps: &[VaultStep], team: &TeamState) -> usize {
    steps
        .iter()
        .take_while(|s| team.contribution(s.role).dial == Some(s.value))
        .count()
}

/// Team vault lock puzzle.
#[derive(Clone, Debug)]
pub struct VaultLockPuzzle {
    lifecycle: Lifecycle,
    role: Role,
    crew: Vec<Role>,
    rng: PuzzleRng,
    seed: Option<Vec<VaultStep>>,
    steps: Vec<VaultStep>,
    team: TeamState,
    dial: u32,
}

impl VaultLockPuzzle {
    #[must_use]
    pub fn new(config: &PuzzleConfig, policy: AttemptPolicy) -> Self {
        let seed = match &config.seed_data {
            Some(SeedData::VaultLock { steps }) => Some(steps.clone()),
            _ => None,
        };
        Self {
            lifecycle: Lifecycle::new(
                PuzzleKind::VaultLock,
                policy,
                "The vault sealed itself. Time lock engaged.",
            ),
            role: config.role_or_default(),
            crew: config.crew(),
            rng: PuzzleRng::new(config.rng_seed).for_context("vault_lock"),
            seed,
            steps: Vec::new(),
            team: TeamState::new(),
            dial: 0,
        }
    }

    /// The local crew member.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Steps completed across the crew.
    #[must_use]
    pub fn current_step(&self) -> usize {
        steps_done(&self.steps, &self.team)
    }

    /// Whose turn it is, if any step remains.
    #[must_use]
    pub fn turn(&self) -> Option<Role> {
        self.steps.get(self.current_step()).map(|s| s.role)
    }

    fn confirm(&mut self, host: &mut dyn Host) -> InputOutcome {
        let step = self.current_step();
        let Some(&expected) = self.steps.get(step) else {
            return InputOutcome::Ignored;
        };
        if expected.role != self.role {
            host.show_message(
                &format!("Not your turn. Waiting for the {}.", expected.role),
                MessageKind::Warning,
            );
            return InputOutcome::Rejected;
        }
        if self.dial != expected.value {
            return self
                .lifecycle
                .wrong_answer("The vault rejects that value.", host);
        }

        let value = self.dial;
        self.team.update_contribution(self.role, |c| {
            c.dial = Some(value);
            c.record(format!("dial {value}"));
        });
        let complete = self.derive_phase();
        host.send_team_update(self.team.role_update(self.role));

        if complete {
            return self.lifecycle.succeed(host);
        }
        if let Some(next) = self.turn() {
            host.show_message(&format!("Value locked. Over to the {next}."), MessageKind::Info);
        }
        InputOutcome::Accepted
    }

    /// Recompute the phase from contributions. Returns whether complete.
    fn derive_phase(&mut self) -> bool {
        let complete = !self.steps.is_empty() && self.current_step() == self.steps.len();
        self.team.set_phase(if complete {
            TeamPhase::Complete
        } else {
            TeamPhase::Assembling
        });
        complete
    }
}

impl Puzzle for VaultLockPuzzle {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn initialize(&mut self, host: &mut dyn Host) {
        self.steps = match self.seed.take() {
            Some(steps) => steps,
            None => generate_steps(&mut self.rng, &self.crew),
        };
        self.lifecycle.activate(host);
    }

    fn handle_input(&mut self, input: &PuzzleInput, host: &mut dyn Host) -> InputOutcome {
        if !matches!(input, PuzzleInput::TurnDial(_) | PuzzleInput::ConfirmDial) {
            return InputOutcome::Ignored;
        }
        if let Err(outcome) = self.lifecycle.admit(host) {
            return outcome;
        }
        match *input {
            PuzzleInput::TurnDial(clicks) => {
                let size = i64::from(VAULT_DIAL_SIZE);
                self.dial = (i64::from(self.dial) + i64::from(clicks)).rem_euclid(size) as u32;
                InputOutcome::Accepted
            }
            _ => self.confirm(host),
        }
    }

    fn submission_data(&self) -> Submission {
        Submission::VaultLock {
            entered: self
                .steps
                .iter()
                .filter_map(|s| {
                    self.team
                        .contribution(s.role)
                        .dial
                        .map(|value| VaultStep { role: s.role, value })
                })
                .collect(),
        }
    }

    fn solution(&self) -> Option<SeedData> {
        (!self.steps.is_empty()).then(|| SeedData::VaultLock {
            steps: self.steps.clone(),
        })
    }

    fn view(&self) -> PuzzleView {
        PuzzleView::VaultLock(VaultLockView {
            header: self.lifecycle.header(),
            role: self.role,
            dial: self.dial,
            steps_total: self.steps.len(),
            steps_done: self.current_step(),
            turn: self.turn(),
            phase: self.team.phase(),
        })
    }

    fn handle_team_update(&mut self, update: &TeamUpdate, host: &mut dyn Host) {
        if !self.lifecycle.is_active() {
            debug!("vault lock ignoring team update while {:?}", self.lifecycle.status());
            return;
        }
        let before = self.current_step();
        self.team.merge(update);
        let complete = self.derive_phase();

        if complete {
            self.lifecycle.succeed(host);
        } else if self.current_step() > before && self.turn() == Some(self.role) {
            host.show_message("Your turn on the dial.", MessageKind::Info);
        }
    }

    fn team_state(&self) -> Option<&TeamState> {
        Some(&self.team)
    }
}
