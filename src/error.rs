//! Error types.
//!
//! Gameplay mistakes are never errors: they are state transitions plus a
//! banner message. The types here cover the boundaries only.

use crate::core::PuzzleKind;

/// A puzzle config that cannot be mounted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("difficulty must be at least 1")]
    ZeroDifficulty,

    #[error("{0} puzzles need a local crew role")]
    MissingRole(PuzzleKind),

    #[error("seed data for {seed} cannot configure a {kind} puzzle")]
    SeedKindMismatch { kind: PuzzleKind, seed: PuzzleKind },

    #[error("a team puzzle needs at least one required role")]
    EmptyCrew,

    #[error("invalid seed data: {0}")]
    InvalidSeed(String),

    #[error("no puzzle registered for {0} and no registered default to fall back to")]
    Unregistered(PuzzleKind),
}

/// A team update payload that could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("malformed team update: {0}")]
    Codec(#[from] bincode::Error),
}

/// The solution-check transport failed. Always retryable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("solution check unreachable: {0}")]
    Unreachable(String),

    #[error("solution check timed out")]
    Timeout,
}

/// A submit call made while the controller cannot take one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("no puzzle is mounted")]
    NotMounted,

    #[error("the puzzle is no longer active")]
    NotActive,

    #[error("a submission is already in flight")]
    InFlight,

    #[error("the submit control is disabled")]
    Disabled,

    #[error("no submission is in flight")]
    NothingPending,
}
