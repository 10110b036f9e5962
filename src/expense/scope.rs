//! Ties every store operation to the records of the authenticated user.
//!
//! The types in this module are the only way to address expenses in an
//! [ExpenseStore](super::ExpenseStore), and their fields can only be set
//! through the `scope_*` functions below, so a store call cannot be made
//! without an owner constraint.

use crate::{database_id::ExpenseId, expense::query::ExpenseFilter, user::UserID};

/// The owner that new or selected expenses must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    owner: UserID,
}

impl OwnerScope {
    /// The user the operation is restricted to.
    pub fn owner(&self) -> UserID {
        self.owner
    }
}

/// An [ExpenseFilter] combined with an owner constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedFilter {
    owner: UserID,
    filter: ExpenseFilter,
}

impl ScopedFilter {
    /// The user the query is restricted to.
    pub fn owner(&self) -> UserID {
        self.owner
    }

    /// The constraints supplied by the caller.
    pub fn filter(&self) -> &ExpenseFilter {
        &self.filter
    }
}

/// A lookup of one expense by ID that only matches if the owner matches too.
///
/// A store cannot tell "no such ID" apart from "someone else's ID" with this
/// type, and reports both as [Error::NotFound](crate::Error::NotFound).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopedId {
    owner: UserID,
    id: ExpenseId,
}

impl ScopedId {
    /// The user the lookup is restricted to.
    pub fn owner(&self) -> UserID {
        self.owner
    }

    /// The expense ID to look up.
    pub fn id(&self) -> ExpenseId {
        self.id
    }
}

/// Restrict writes of new expenses to `principal`.
pub fn scope_owner(principal: UserID) -> OwnerScope {
    OwnerScope { owner: principal }
}

/// Restrict `filter` to the expenses owned by `principal`.
pub fn scope_filter(principal: UserID, filter: ExpenseFilter) -> ScopedFilter {
    ScopedFilter {
        owner: principal,
        filter,
    }
}

/// Restrict a lookup of `id` to the expenses owned by `principal`.
pub fn scope_id(principal: UserID, id: ExpenseId) -> ScopedId {
    ScopedId {
        owner: principal,
        id,
    }
}
