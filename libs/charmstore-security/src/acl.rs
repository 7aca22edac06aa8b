use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::authorization::Authorization;

/// Well-known principal names.
///
/// Shared by the entity store (which writes them into ACLs) and the ACL
/// evaluator (which gives them meaning).
pub mod principals {
    /// Matches every caller, authenticated or not.
    pub const EVERYONE: &str = "everyone";

    /// Name reserved for the administrator. Admin authorizations bypass
    /// ACL evaluation entirely, so in an ACL this is an ordinary principal.
    pub const ADMIN: &str = "admin";

    /// Group allowed to promulgate entities.
    pub const PROMULGATORS: &str = "promulgators";
}

/// Why an identity was refused by an ACL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MembershipError {
    /// A non-admin identity without a username reached ACL evaluation.
    /// This is a resolver bug or misconfiguration, not a normal denial.
    #[error("no username declared")]
    InvalidIdentity,

    /// None of the identity's principals appear in the ACL.
    #[error("access denied for user {username:?}")]
    AccessDenied { username: String },
}

/// An access-control list: the principal names permitted one operation.
///
/// Order and duplicates carry no meaning.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Acl(Vec<String>);

impl Acl {
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// ACL that admits every caller.
    #[must_use]
    pub fn open() -> Self {
        Self::new([principals::EVERYONE])
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Whether the ACL contains [`principals::EVERYONE`]. Open ACLs need no
    /// authentication at all.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.contains(principals::EVERYONE)
    }

    /// Check that `auth` is a member of this ACL.
    ///
    /// Admins are always members. Otherwise the identity's principals are
    /// `{"everyone", username} ∪ groups`, and membership holds iff that set
    /// intersects the ACL.
    ///
    /// # Errors
    ///
    /// - [`MembershipError::InvalidIdentity`] for a non-admin without username
    /// - [`MembershipError::AccessDenied`] when the sets are disjoint
    pub fn check_membership(&self, auth: &Authorization) -> Result<(), MembershipError> {
        if auth.is_admin() {
            return Ok(());
        }
        if auth.username().is_empty() {
            return Err(MembershipError::InvalidIdentity);
        }

        let mut members: HashSet<&str> = HashSet::with_capacity(auth.groups().len() + 2);
        members.insert(principals::EVERYONE);
        members.insert(auth.username());
        members.extend(auth.groups().iter().map(String::as_str));

        if self.0.iter().any(|name| members.contains(name.as_str())) {
            Ok(())
        } else {
            Err(MembershipError::AccessDenied {
                username: auth.username().to_owned(),
            })
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Acl {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<String>> for Acl {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.0).finish()
    }
}

/// Read and write ACLs attached to a base entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityAcls {
    pub read: Acl,
    pub write: Acl,
}

impl EntityAcls {
    #[must_use]
    pub fn new(read: Acl, write: Acl) -> Self {
        Self { read, write }
    }
}
