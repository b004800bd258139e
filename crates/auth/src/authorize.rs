//! Screen-level capability checks (the client-side auth gate).
//!
//! These checks decide which affordances the client offers. They are not a
//! security boundary: the server must independently re-authorize every
//! mutating call, since the privilege flag is derived client-side from an
//! unverified token.

use thiserror::Error;

use gearbook_core::{GateScope, ResourceKind};

use crate::Session;

/// What the caller wants to do with a resource screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Capability {
    /// See the list.
    View,
    /// Create, edit or delete records.
    Mutate,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("You are not authorized to manage {plural}.")]
    Forbidden {
        plural: &'static str,
        capability: Capability,
    },
}

/// True iff the session carries the privileged flag.
pub fn can_mutate(session: &Session) -> bool {
    session.is_privileged
}

/// Whether `kind`'s list may be shown for `session`.
pub fn can_view(session: &Session, kind: &ResourceKind) -> bool {
    match kind.gate {
        GateScope::MutationsOnly => true,
        GateScope::EntireScreen => can_mutate(session),
    }
}

/// Check `capability` on `kind` for `session`.
///
/// - No IO
/// - No panics
pub fn authorize(session: &Session, kind: &ResourceKind, capability: Capability) -> Result<(), AuthzError> {
    let allowed = match capability {
        Capability::View => can_view(session, kind),
        Capability::Mutate => can_mutate(session),
    };

    if allowed {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            plural: kind.plural,
            capability,
        })
    }
}
