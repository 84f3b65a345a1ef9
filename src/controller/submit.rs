//! Solution checking.
//!
//! The controller hands a `Submission` to a `SolutionChecker` and routes the
//! verdict back into the puzzle. `validate_submission` is the reference
//! check against known seed data, the same comparison a game server runs.

use crate::core::{PuzzleKind, Role};
use crate::error::TransportError;
use crate::puzzles::{SeedData, Submission, VaultStep};

/// External solution check.
///
/// `Ok(true)` accepts, `Ok(false)` rejects, `Err` is a transport failure the
/// player may retry.
pub trait SolutionChecker {
    fn check(&mut self, kind: PuzzleKind, submission: &Submission) -> Result<bool, TransportError>;
}

impl<F> SolutionChecker for F
where
    F: FnMut(PuzzleKind, &Submission) -> Result<bool, TransportError>,
{
    fn check(&mut self, kind: PuzzleKind, submission: &Submission) -> Result<bool, TransportError> {
        self(kind, submission)
    }
}

/// Whether `submission` solves the puzzle described by `seed`.
#[must_use]
pub fn validate_submission(seed: &SeedData, submission: &Submission) -> bool {
    match (seed, submission) {
        (SeedData::Wires(layout), Submission::Wires { cut }) => {
            let mut cut = cut.clone();
            cut.sort_unstable();
            cut.dedup();
            cut.as_slice() == layout.correct.as_slice()
        }
        (SeedData::Keypad { code }, Submission::Keypad { entry }) => entry == code,
        (SeedData::Circuit(layout), Submission::Circuit { path }) => *path == layout.solution,
        (SeedData::SafeDial(combination), Submission::SafeDial { confirmed }) => {
            confirmed.len() == combination.targets.len()
                && confirmed
                    .iter()
                    .enumerate()
                    .all(|(step, &value)| combination.accepts(step, value))
        }
        (SeedData::Detonator { order }, Submission::Detonator { placed }) => placed == order,
        (SeedData::VaultLock { steps }, Submission::VaultLock { entered }) => {
            entered.as_slice() == steps.as_slice()
        }
        (SeedData::Breach { fragments }, Submission::Breach { shared, ready }) => {
            Role::all().all(|role| {
                ready.contains(&role)
                    && shared
                        .iter()
                        .any(|(r, key)| *r == role && *key == fragments[role])
            })
        }
        _ => false,
    }
}

/// Checks submissions against known seed data.
#[derive(Clone, Debug)]
pub struct SeedChecker {
    seed: SeedData,
}

impl SeedChecker {
    #[must_use]
    pub fn new(seed: SeedData) -> Self {
        Self { seed }
    }

    #[must_use]
    pub fn seed(&self) -> &SeedData {
        &self.seed
    }
}

impl SolutionChecker for SeedChecker {
    fn check(&mut self, kind: PuzzleKind, submission: &Submission) -> Result<bool, TransportError> {
        Ok(kind == self.seed.kind() && validate_submission(&self.seed, submission))
    }
}

/// Collects vault entries in turn order, for building submissions by hand.
#[must_use]
pub fn vault_entries(steps: &[(Role, u32)]) -> Vec<VaultStep> {
    steps.iter().map(|&(role, value)| VaultStep { role, value }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RoleMap;
    use crate::puzzles::{ChargeId, CircuitLayout, DialCombination, WireColor};

    #[test]
    fn test_wires_is_set_equality() {
        let seed = SeedData::wires(vec![WireColor::Red; 5], &[1, 3]);
        assert!(validate_submission(&seed, &Submission::Wires { cut: vec![3, 1] }));
        assert!(!validate_submission(&seed, &Submission::Wires { cut: vec![1] }));
        assert!(!validate_submission(&seed, &Submission::Wires { cut: vec![1, 3, 0] }));
    }

    #[test]
    fn test_keypad_and_circuit() {
        assert!(validate_submission(
            &SeedData::keypad("4821"),
            &Submission::Keypad { entry: "4821".into() }
        ));
        assert!(!validate_submission(
            &SeedData::keypad("4821"),
            &Submission::Keypad { entry: "482".into() }
        ));

        let layout = CircuitLayout::classic();
        let path = layout.solution.clone();
        assert!(validate_submission(&SeedData::Circuit(layout), &Submission::Circuit { path }));
    }

    #[test]
    fn test_safe_dial_tolerance() {
        let seed = SeedData::SafeDial(DialCombination {
            targets: vec![10, 99],
            tolerance: 2,
        });
        assert!(validate_submission(&seed, &Submission::SafeDial { confirmed: vec![12, 1] }));
        assert!(!validate_submission(&seed, &Submission::SafeDial { confirmed: vec![13, 99] }));
        assert!(!validate_submission(&seed, &Submission::SafeDial { confirmed: vec![10] }));
    }

    #[test]
    fn test_detonator_and_vault_are_sequences() {
        let order = vec![ChargeId(1), ChargeId(0)];
        let seed = SeedData::Detonator { order: order.clone() };
        assert!(validate_submission(&seed, &Submission::Detonator { placed: order }));
        assert!(!validate_submission(
            &seed,
            &Submission::Detonator {
                placed: vec![ChargeId(0), ChargeId(1)]
            }
        ));

        let steps = [
            (Role::Hacker, 7),
            (Role::Lookout, 2),
            (Role::SafeCracker, 0),
            (Role::Demolitions, 9),
        ];
        let seed = SeedData::vault(&steps);
        assert!(validate_submission(
            &seed,
            &Submission::VaultLock { entered: vault_entries(&steps) }
        ));
        assert!(!validate_submission(
            &seed,
            &Submission::VaultLock { entered: vault_entries(&steps[..3]) }
        ));
    }

    #[test]
    fn test_breach_needs_every_role() {
        let fragments = RoleMap::new(|r| format!("K{}", r.index()));
        let seed = SeedData::Breach { fragments: fragments.clone() };

        let shared: Vec<(Role, String)> = Role::all().map(|r| (r, fragments[r].clone())).collect();
        let all_ready: Vec<Role> = Role::all().collect();
        assert!(validate_submission(
            &seed,
            &Submission::Breach { shared: shared.clone(), ready: all_ready }
        ));
        assert!(!validate_submission(
            &seed,
            &Submission::Breach { shared, ready: vec![Role::Hacker] }
        ));
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let mut checker = SeedChecker::new(SeedData::keypad("12"));
        let submission = Submission::Keypad { entry: "12".into() };
        assert_eq!(checker.check(PuzzleKind::Keypad, &submission), Ok(true));
        assert_eq!(checker.check(PuzzleKind::Wires, &submission), Ok(false));
        assert!(!validate_submission(&SeedData::keypad("12"), &Submission::Wires { cut: vec![] }));
    }

    #[test]
    fn test_closure_checker() {
        let mut calls = 0;
        let mut checker = |_: PuzzleKind, _: &Submission| -> Result<bool, TransportError> {
            calls += 1;
            Err(TransportError::Timeout)
        };
        let result = checker.check(PuzzleKind::Keypad, &Submission::Keypad { entry: String::new() });
        assert_eq!(result, Err(TransportError::Timeout));
        drop(checker);
        assert_eq!(calls, 1);
    }
}
