//! Crew roles and per-role data storage.
//!
//! ## Role
//!
//! The four crew roles of a heist. Team puzzles evaluate completion as an
//! AND over every role.
//!
//! ## RoleMap
//!
//! Per-role storage backed by a fixed array for O(1) access, indexable by
//! `Role`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A crew role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Hacker,
    SafeCracker,
    Demolitions,
    Lookout,
}

impl Role {
    /// Number of crew roles.
    pub const COUNT: usize = 4;

    /// Every role, in canonical order.
    pub const ALL: [Role; Role::COUNT] = [
        Role::Hacker,
        Role::SafeCracker,
        Role::Demolitions,
        Role::Lookout,
    ];

    /// Canonical index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Role::Hacker => 0,
            Role::SafeCracker => 1,
            Role::Demolitions => 2,
            Role::Lookout => 3,
        }
    }

    /// Iterate over all roles in canonical order.
    pub fn all() -> impl Iterator<Item = Role> {
        Self::ALL.into_iter()
    }

    /// Display name as shown to players.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Role::Hacker => "Hacker",
            Role::SafeCracker => "Safe Cracker",
            Role::Demolitions => "Demolitions",
            Role::Lookout => "Lookout",
        }
    }

    /// Parse a role from its display name or a snake/kebab-case variant.
    ///
    /// ```
    /// use heist_puzzles::core::Role;
    ///
    /// assert_eq!(Role::parse("Safe Cracker"), Some(Role::SafeCracker));
    /// assert_eq!(Role::parse("safe_cracker"), Some(Role::SafeCracker));
    /// assert_eq!(Role::parse("driver"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Role> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "hacker" => Some(Role::Hacker),
            "safecracker" => Some(Role::SafeCracker),
            "demolitions" => Some(Role::Demolitions),
            "lookout" => Some(Role::Lookout),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-role data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use heist_puzzles::core::{Role, RoleMap};
///
/// let mut ready: RoleMap<bool> = RoleMap::with_value(false);
/// ready[Role::Lookout] = true;
///
/// assert!(ready[Role::Lookout]);
/// assert!(!ready.all(|_, r| *r));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleMap<T> {
    data: [T; Role::COUNT],
}

impl<T> RoleMap<T> {
    /// Create a RoleMap with values from a factory function.
    pub fn new(factory: impl Fn(Role) -> T) -> Self {
        Self {
            data: Role::ALL.map(factory),
        }
    }

    /// Create a RoleMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a RoleMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a role's data.
    #[must_use]
    pub fn get(&self, role: Role) -> &T {
        &self.data[role.index()]
    }

    /// Get a mutable reference to a role's data.
    pub fn get_mut(&mut self, role: Role) -> &mut T {
        &mut self.data[role.index()]
    }

    /// Iterate over (Role, &T) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
        Role::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Role, &mut T) pairs in canonical order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Role, &mut T)> {
        Role::ALL.into_iter().zip(self.data.iter_mut())
    }

    /// True when `predicate` holds for every role.
    pub fn all(&self, predicate: impl Fn(Role, &T) -> bool) -> bool {
        self.iter().all(|(role, value)| predicate(role, value))
    }
}

impl<T> Index<Role> for RoleMap<T> {
    type Output = T;

    fn index(&self, role: Role) -> &Self::Output {
        self.get(role)
    }
}

impl<T> IndexMut<Role> for RoleMap<T> {
    fn index_mut(&mut self, role: Role) -> &mut Self::Output {
        self.get_mut(role)
    }
}
