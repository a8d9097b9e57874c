use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::EnumIter;
use uuid::Uuid;

/// Closed set of roles a caller can hold. Raw role strings from the
/// authentication layer are parsed exactly once, at the boundary; everything
/// past that point works with this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Instructor,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Instructor => "instructor",
            Self::Student => "student",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Custom error type for parsing roles
#[derive(Debug, Clone, PartialEq)]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "administrator" | "admin" => Ok(Self::Administrator),
            "instructor" => Ok(Self::Instructor),
            "student" => Ok(Self::Student),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// An authenticated caller: identity plus an already-validated role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("administrator".parse::<Role>(), Ok(Role::Administrator));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Administrator));
        assert_eq!("Instructor".parse::<Role>(), Ok(Role::Instructor));
        assert_eq!("STUDENT".parse::<Role>(), Ok(Role::Student));
        assert!("registrar".parse::<Role>().is_err());
    }

    #[test]
    fn test_admin_capability() {
        let admin = Caller::new(Uuid::new_v4(), Role::Administrator);
        let instructor = Caller::new(Uuid::new_v4(), Role::Instructor);

        assert!(admin.is_admin());
        assert!(!instructor.is_admin());
    }
}
