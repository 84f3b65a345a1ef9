//! Disarm code keypad.
//!
//! The player types a numeric code and presses Enter. A wrong code costs an
//! attempt and time; the feedback says how many digits were in the right
//! place.

use super::{AttemptPolicy, InputOutcome, Lifecycle, Puzzle, PuzzleInput, SeedData, Submission};
use crate::core::{MessageKind, PuzzleConfig, PuzzleKind, PuzzleRng};
use crate::error::ConfigError;
use crate::host::Host;
use crate::view::{KeypadView, PuzzleView};

/// Longest code the keypad accepts.
pub const MAX_CODE_LENGTH: usize = 8;

/// Parse a disarm code into digits.
pub fn parse_code(code: &str) -> Result<Vec<u8>, ConfigError> {
    if code.is_empty() || code.len() > MAX_CODE_LENGTH {
        return Err(ConfigError::InvalidSeed(format!(
            "disarm code must have 1 to {MAX_CODE_LENGTH} digits"
        )));
    }
    code.chars()
        .map(|c| {
            c.to_digit(10)
                .map(|d| d as u8)
                .ok_or_else(|| ConfigError::InvalidSeed(format!("'{c}' is not a digit")))
        })
        .collect()
}

/// Generate a code of `3 + difficulty` digits, at most `MAX_CODE_LENGTH`.
pub fn generate_code(rng: &mut PuzzleRng, difficulty: u32) -> String {
    let length = (3 + difficulty as usize).min(MAX_CODE_LENGTH);
    (0..length).map(|_| char::from(b'0' + rng.gen_digit())).collect()
}

/// Keypad puzzle.
#[derive(Clone, Debug)]
pub struct KeypadPuzzle {
    lifecycle: Lifecycle,
    difficulty: u32,
    rng: PuzzleRng,
    seed: Option<String>,
    code: Option<String>,
    entry: String,
    last_match: Option<usize>,
    last_submitted: String,
}

impl KeypadPuzzle {
    #[must_use]
    pub fn new(config: &PuzzleConfig, policy: AttemptPolicy) -> Self {
        let seed = match &config.seed_data {
            Some(SeedData::Keypad { code }) => Some(code.clone()),
            _ => None,
        };
        Self {
            lifecycle: Lifecycle::new(
                PuzzleKind::Keypad,
                policy,
                "Keypad locked out. The alarm is sounding.",
            ),
            difficulty: config.difficulty,
            rng: PuzzleRng::new(config.rng_seed).for_context("keypad"),
            seed,
            code: None,
            entry: String::new(),
            last_match: None,
            last_submitted: String::new(),
        }
    }

    /// The digits typed so far.
    #[must_use]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    fn code_length(&self) -> usize {
        self.code.as_ref().map_or(0, String::len)
    }

    fn enter(&mut self, host: &mut dyn Host) -> InputOutcome {
        let Some(code) = self.code.clone() else {
            return InputOutcome::Ignored;
        };
        if self.entry.len() < code.len() {
            host.show_message(
                &format!("The code has {} digits.", code.len()),
                MessageKind::Warning,
            );
            return InputOutcome::Rejected;
        }

        self.last_submitted = std::mem::take(&mut self.entry);
        if self.last_submitted == code {
            return self.lifecycle.succeed(host);
        }

        let in_place = self
            .last_submitted
            .chars()
            .zip(code.chars())
            .filter(|(a, b)| a == b)
            .count();
        self.last_match = Some(in_place);
        let text = if self.lifecycle.hints_obscured() {
            "Access denied.".to_string()
        } else {
            format!("Access denied. {in_place} digit(s) in the right place.")
        };
        self.lifecycle.wrong_answer(&text, host)
    }
}

impl Puzzle for KeypadPuzzle {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn initialize(&mut self, host: &mut dyn Host) {
        let code = match self.seed.take() {
            Some(code) => code,
            None => generate_code(&mut self.rng, self.difficulty),
        };
        self.code = Some(code);
        self.lifecycle.activate(host);
    }

    fn handle_input(&mut self, input: &PuzzleInput, host: &mut dyn Host) -> InputOutcome {
        if !matches!(
            input,
            PuzzleInput::PressDigit(_)
                | PuzzleInput::Backspace
                | PuzzleInput::ClearEntry
                | PuzzleInput::Enter
        ) {
            return InputOutcome::Ignored;
        }
        if let Err(outcome) = self.lifecycle.admit(host) {
            return outcome;
        }

        match *input {
            PuzzleInput::PressDigit(digit) => {
                if digit > 9 || self.entry.len() >= self.code_length() {
                    return InputOutcome::Rejected;
                }
                self.entry.push(char::from(b'0' + digit));
                InputOutcome::Accepted
            }
            PuzzleInput::Backspace => match self.entry.pop() {
                Some(_) => InputOutcome::Accepted,
                None => InputOutcome::Rejected,
            },
            PuzzleInput::ClearEntry => {
                self.entry.clear();
                InputOutcome::Accepted
            }
            _ => self.enter(host),
        }
    }

    fn submission_data(&self) -> Submission {
        let entry = if self.entry.is_empty() {
            self.last_submitted.clone()
        } else {
            self.entry.clone()
        };
        Submission::Keypad { entry }
    }

    fn solution(&self) -> Option<SeedData> {
        self.code.clone().map(SeedData::keypad)
    }

    fn view(&self) -> PuzzleView {
        let header = self.lifecycle.header();
        PuzzleView::Keypad(KeypadView {
            code_length: self.code_length(),
            entry: self.entry.clone(),
            last_match: self.last_match.filter(|_| !header.hints_obscured),
            header,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PuzzleStatus;
    use crate::host::HostContext;

    fn seeded(code: &str) -> (KeypadPuzzle, HostContext) {
        let config = PuzzleConfig::new(PuzzleKind::Keypad).with_seed_data(SeedData::keypad(code));
        let mut puzzle = KeypadPuzzle::new(&config, AttemptPolicy::new(3, 15));
        let mut host = HostContext::new(90, 5);
        puzzle.initialize(&mut host);
        (puzzle, host)
    }

    fn type_code(puzzle: &mut KeypadPuzzle, host: &mut HostContext, code: &str) -> InputOutcome {
        for c in code.chars() {
            let digit = c.to_digit(10).unwrap() as u8;
            puzzle.handle_input(&PuzzleInput::PressDigit(digit), host);
        }
        puzzle.handle_input(&PuzzleInput::Enter, host)
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("4821").unwrap(), vec![4, 8, 2, 1]);
        assert!(parse_code("").is_err());
        assert!(parse_code("12a").is_err());
        assert!(parse_code("123456789").is_err());
    }

    #[test]
    fn test_generated_length() {
        let mut rng = PuzzleRng::new(3);
        assert_eq!(generate_code(&mut rng, 1).len(), 4);
        assert_eq!(generate_code(&mut rng, 30).len(), MAX_CODE_LENGTH);
        assert!(parse_code(&generate_code(&mut rng, 2)).is_ok());
    }

    #[test]
    fn test_wrong_then_right() {
        let (mut puzzle, mut host) = seeded("4821");

        assert_eq!(type_code(&mut puzzle, &mut host, "1234"), InputOutcome::Penalized);
        assert_eq!(puzzle.attempts(), 1);
        assert_eq!(puzzle.status(), PuzzleStatus::Active);
        assert_eq!(host.reduce_time_calls(), 1);
        assert!(puzzle.entry().is_empty());

        assert_eq!(type_code(&mut puzzle, &mut host, "4821"), InputOutcome::Solved);
        assert_eq!(puzzle.status(), PuzzleStatus::Succeeded);
    }

    #[test]
    fn test_hint_counts_digits_in_place() {
        let (mut puzzle, mut host) = seeded("4821");
        type_code(&mut puzzle, &mut host, "4801");

        assert_eq!(
            host.banner().unwrap().text,
            "Access denied. 3 digit(s) in the right place."
        );
        let PuzzleView::Keypad(view) = puzzle.view() else {
            panic!("wrong view");
        };
        assert_eq!(view.last_match, Some(3));
    }

    #[test]
    fn test_short_entry_rejected_without_penalty() {
        let (mut puzzle, mut host) = seeded("4821");
        puzzle.handle_input(&PuzzleInput::PressDigit(4), &mut host);

        assert_eq!(puzzle.handle_input(&PuzzleInput::Enter, &mut host), InputOutcome::Rejected);
        assert_eq!(puzzle.attempts(), 0);
        assert_eq!(puzzle.entry(), "4");
    }

    #[test]
    fn test_entry_editing() {
        let (mut puzzle, mut host) = seeded("48");
        puzzle.handle_input(&PuzzleInput::PressDigit(4), &mut host);
        puzzle.handle_input(&PuzzleInput::PressDigit(8), &mut host);
        assert_eq!(puzzle.handle_input(&PuzzleInput::PressDigit(1), &mut host), InputOutcome::Rejected);

        puzzle.handle_input(&PuzzleInput::Backspace, &mut host);
        assert_eq!(puzzle.entry(), "4");
        puzzle.handle_input(&PuzzleInput::ClearEntry, &mut host);
        assert_eq!(puzzle.handle_input(&PuzzleInput::Backspace, &mut host), InputOutcome::Rejected);
        assert_eq!(puzzle.handle_input(&PuzzleInput::PressDigit(12), &mut host), InputOutcome::Rejected);
    }

    #[test]
    fn test_submission_is_partial_before_enter() {
        let (mut puzzle, mut host) = seeded("4821");
        assert_eq!(puzzle.submission_data(), Submission::Keypad { entry: String::new() });

        puzzle.handle_input(&PuzzleInput::PressDigit(4), &mut host);
        assert_eq!(puzzle.submission_data(), Submission::Keypad { entry: "4".into() });
    }

    #[test]
    fn test_lockout() {
        let (mut puzzle, mut host) = seeded("4821");
        for _ in 0..3 {
            type_code(&mut puzzle, &mut host, "0000");
        }
        assert_eq!(puzzle.status(), PuzzleStatus::Failed);
        assert!(!host.submit_enabled());
        assert_eq!(type_code(&mut puzzle, &mut host, "4821"), InputOutcome::Ignored);
    }
}
