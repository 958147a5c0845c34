//! Access control entries (RFC 3744 §5.5).

use super::Privilege;

/// The principal an ACE applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// A specific principal URI.
    Href(String),
    /// `DAV:all`
    All,
    /// `DAV:authenticated`
    Authenticated,
    /// `DAV:unauthenticated`
    Unauthenticated,
}

impl Principal {
    /// Returns the principal URI for `Href` principals.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Href(href) => Some(href),
            _ => None,
        }
    }
}

/// A granting access control entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ace {
    pub principal: Principal,
    pub privilege: Privilege,
    /// Protected entries cannot be changed through `DAV:acl`.
    pub protected: bool,
}

impl Ace {
    /// Creates a protected ACE granting `privilege` to the principal URI.
    #[must_use]
    pub fn protected(principal: impl Into<String>, privilege: Privilege) -> Self {
        Self {
            principal: Principal::Href(principal.into()),
            privilege,
            protected: true,
        }
    }

    /// Creates an unprotected ACE.
    #[must_use]
    pub const fn new(principal: Principal, privilege: Privilege) -> Self {
        Self {
            principal,
            privilege,
            protected: false,
        }
    }
}
