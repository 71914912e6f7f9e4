use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of caller roles. Every operation entry point matches on this
/// exhaustively; there is no free-form role string anywhere past the token
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Clinician,
    Secretary,
    Cashier,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Clinician => write!(f, "clinician"),
            Role::Secretary => write!(f, "secretary"),
            Role::Cashier => write!(f, "cashier"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
}

/// The authenticated caller as seen by every cell: an identity fact plus a
/// role fact, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_serde() {
        let role: Role = serde_json::from_str("\"secretary\"").unwrap();
        assert_eq!(role, Role::Secretary);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"secretary\"");
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }
}
