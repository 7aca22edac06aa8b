use std::collections::BTreeSet;

/// `Authorization` holds the identity resolved from a single request.
///
/// Built by the authentication resolver for one authorization decision and
/// dropped afterwards. The zero value (see [`Authorization::anonymous`])
/// carries no privileges and is never treated as authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authorization {
    /// Set only when the request carried the configured administrator
    /// credentials. Admin authorizations bypass ACL evaluation.
    admin: bool,
    /// Username declared by the identity service. Empty for admins.
    username: String,
    /// Groups the user belongs to, as declared by the identity service.
    groups: BTreeSet<String>,
}

impl Authorization {
    /// Create a new `Authorization` builder for a non-admin identity
    #[must_use]
    pub fn builder() -> AuthorizationBuilder {
        AuthorizationBuilder::default()
    }

    /// Authorization granted by the static administrator credentials.
    #[must_use]
    pub fn admin() -> Self {
        Self {
            admin: true,
            ..Self::default()
        }
    }

    /// The zero value: no admin flag, no username, no groups.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }
}

#[derive(Default)]
pub struct AuthorizationBuilder {
    username: String,
    groups: BTreeSet<String>,
}

impl AuthorizationBuilder {
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    #[must_use]
    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn build(self) -> Authorization {
        Authorization {
            admin: false,
            username: self.username,
            groups: self.groups,
        }
    }
}
