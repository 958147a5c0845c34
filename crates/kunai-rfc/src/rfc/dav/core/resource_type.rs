//! `DAV:resourcetype` values (RFC 4918 §15.9, RFC 6352 §5.2).

use std::collections::BTreeSet;

use super::QName;

/// A set of resource-type element names, compared without regard to order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceType(BTreeSet<QName>);

impl ResourceType {
    /// `DAV:collection`
    #[must_use]
    pub fn collection() -> Self {
        [QName::dav("collection")].into_iter().collect()
    }

    /// `DAV:collection` + `CARDDAV:addressbook`
    #[must_use]
    pub fn addressbook() -> Self {
        [QName::dav("collection"), QName::carddav("addressbook")]
            .into_iter()
            .collect()
    }

    /// `DAV:collection` + `CALDAV:schedule-outbox`
    #[must_use]
    pub fn schedule_outbox() -> Self {
        [QName::dav("collection"), QName::caldav("schedule-outbox")]
            .into_iter()
            .collect()
    }

    #[must_use]
    pub fn contains(&self, name: &QName) -> bool {
        self.0.contains(name)
    }

    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.contains(&QName::dav("collection"))
    }

    pub fn iter(&self) -> impl Iterator<Item = &QName> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<QName> for ResourceType {
    fn from_iter<T: IntoIterator<Item = QName>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
