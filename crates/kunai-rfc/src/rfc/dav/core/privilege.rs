//! `WebDAV` privileges and the supported-privilege tree (RFC 3744 §3, §5.3).

use std::collections::BTreeMap;

use super::QName;

/// A privilege known to the node implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Privilege {
    /// `DAV:all`
    All,
    /// `DAV:read`
    Read,
    /// `DAV:read-acl`
    ReadAcl,
    /// `DAV:read-current-user-privilege-set`
    ReadCurrentUserPrivilegeSet,
    /// `DAV:write`
    Write,
    /// `DAV:write-acl`
    WriteAcl,
    /// `DAV:write-properties`
    WriteProperties,
    /// `DAV:write-content`
    WriteContent,
    /// `DAV:bind`
    Bind,
    /// `DAV:unbind`
    Unbind,
    /// `DAV:unlock`
    Unlock,
    /// `CALDAV:schedule-query-freebusy` (RFC 6638 §6.1.1)
    ScheduleQueryFreebusy,
}

impl Privilege {
    /// Returns the qualified XML name of this privilege.
    #[must_use]
    pub fn qname(self) -> QName {
        match self {
            Self::ScheduleQueryFreebusy => QName::caldav(self.local_name()),
            _ => QName::dav(self.local_name()),
        }
    }

    /// Returns the local element name.
    #[must_use]
    pub const fn local_name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Read => "read",
            Self::ReadAcl => "read-acl",
            Self::ReadCurrentUserPrivilegeSet => "read-current-user-privilege-set",
            Self::Write => "write",
            Self::WriteAcl => "write-acl",
            Self::WriteProperties => "write-properties",
            Self::WriteContent => "write-content",
            Self::Bind => "bind",
            Self::Unbind => "unbind",
            Self::Unlock => "unlock",
            Self::ScheduleQueryFreebusy => "schedule-query-freebusy",
        }
    }
}

impl std::fmt::Display for Privilege {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.qname().fmt(f)
    }
}

/// A node of the `DAV:supported-privilege-set` tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedPrivilege {
    pub privilege: Privilege,
    /// Abstract privileges cannot be granted or denied on their own.
    pub is_abstract: bool,
    pub aggregates: Vec<SupportedPrivilege>,
}

/// One entry of the flattened privilege tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatPrivilege {
    pub is_abstract: bool,
    /// Direct children in the tree.
    pub aggregates: Vec<Privilege>,
    /// The privilege itself when concrete, otherwise the nearest concrete
    /// ancestor. `None` for an abstract root.
    pub concrete: Option<Privilege>,
}

impl SupportedPrivilege {
    /// Creates a concrete privilege without aggregates.
    #[must_use]
    pub const fn concrete(privilege: Privilege) -> Self {
        Self {
            privilege,
            is_abstract: false,
            aggregates: Vec::new(),
        }
    }

    /// Creates an abstract privilege without aggregates.
    #[must_use]
    pub const fn abstract_(privilege: Privilege) -> Self {
        Self {
            privilege,
            is_abstract: true,
            aggregates: Vec::new(),
        }
    }

    /// Adds an aggregated privilege, returning the node.
    #[must_use]
    pub fn with(mut self, child: Self) -> Self {
        self.aggregates.push(child);
        self
    }

    /// ## Summary
    /// Returns the default tree: abstract `DAV:all` aggregating `DAV:read`
    /// and `DAV:write`, whose own sub-privileges are all abstract.
    #[must_use]
    pub fn default_set() -> Self {
        let read = Self::concrete(Privilege::Read)
            .with(Self::abstract_(Privilege::ReadAcl))
            .with(Self::abstract_(Privilege::ReadCurrentUserPrivilegeSet));

        let write = [
            Privilege::WriteAcl,
            Privilege::WriteProperties,
            Privilege::WriteContent,
            Privilege::Bind,
            Privilege::Unbind,
            Privilege::Unlock,
        ]
        .into_iter()
        .fold(Self::concrete(Privilege::Write), |node, p| {
            node.with(Self::abstract_(p))
        });

        Self::abstract_(Privilege::All).with(read).with(write)
    }

    /// Finds a node anywhere in the tree.
    #[must_use]
    pub fn find(&self, privilege: Privilege) -> Option<&Self> {
        if self.privilege == privilege {
            return Some(self);
        }
        self.aggregates.iter().find_map(|child| child.find(privilege))
    }

    /// Returns true if `privilege` appears anywhere in the tree.
    #[must_use]
    pub fn contains(&self, privilege: Privilege) -> bool {
        self.find(privilege).is_some()
    }

    /// ## Summary
    /// Flattens the tree into a map keyed by privilege.
    ///
    /// Each entry records whether the privilege is abstract, its direct
    /// aggregates and the concrete privilege an ACE for it resolves to.
    #[must_use]
    pub fn flatten(&self) -> BTreeMap<Privilege, FlatPrivilege> {
        let mut flat = BTreeMap::new();
        self.flatten_into(None, &mut flat);
        flat
    }

    fn flatten_into(
        &self,
        parent_concrete: Option<Privilege>,
        flat: &mut BTreeMap<Privilege, FlatPrivilege>,
    ) {
        let concrete = if self.is_abstract {
            parent_concrete
        } else {
            Some(self.privilege)
        };

        flat.insert(
            self.privilege,
            FlatPrivilege {
                is_abstract: self.is_abstract,
                aggregates: self.aggregates.iter().map(|a| a.privilege).collect(),
                concrete,
            },
        );

        for child in &self.aggregates {
            child.flatten_into(concrete, flat);
        }
    }
}
