use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Role claimed by an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Team,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Team => "team",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "team" => Ok(Self::Team),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Identity handed over by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: Option<String>,
}

impl Principal {
    pub fn new(id: Uuid) -> Self {
        Self { id, email: None }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// The acting principal, tagged by capability.
///
/// Workflows match on the variant they accept instead of comparing role strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    RegularUser(Principal),
    TeamProxy(Principal),
    Admin(Principal),
}

impl Actor {
    pub fn from_role(role: Role, principal: Principal) -> Self {
        match role {
            Role::User => Self::RegularUser(principal),
            Role::Team => Self::TeamProxy(principal),
            Role::Admin => Self::Admin(principal),
        }
    }

    pub fn principal(&self) -> &Principal {
        match self {
            Self::RegularUser(p) | Self::TeamProxy(p) | Self::Admin(p) => p,
        }
    }

    pub fn id(&self) -> Uuid {
        self.principal().id
    }

    pub fn email(&self) -> Option<&str> {
        self.principal().email.as_deref()
    }

    pub fn role(&self) -> Role {
        match self {
            Self::RegularUser(_) => Role::User,
            Self::TeamProxy(_) => Role::Team,
            Self::Admin(_) => Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }
}
