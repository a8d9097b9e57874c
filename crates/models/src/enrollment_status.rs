use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::EnumIter;

#[cfg(feature = "database")]
use sea_orm::Value;

/// Lifecycle status of a student's registration in one course offering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    /// Initial state, set by the registration workflow
    Registered,
    Passed,
    Failed,
    Withdrawn,
}

impl EnrollmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Terminal states are only ever undone by reopening the offering,
    /// which resets them to [`EnrollmentStatus::Registered`] in bulk
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Registered)
    }
}

impl Display for EnrollmentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Custom error type for parsing enrollment statuses
#[derive(Debug, Clone, PartialEq)]
pub struct ParseStatusError(pub String);

impl FromStr for EnrollmentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(Self::Registered),
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            "withdrawn" => Ok(Self::Withdrawn),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for EnrollmentStatus {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "EnrollmentStatus".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::String(sea_orm::sea_query::StringLen::None)
    }
}

#[cfg(feature = "database")]
impl From<EnrollmentStatus> for Value {
    fn from(status: EnrollmentStatus) -> Self {
        Value::String(Some(Box::new(status.as_str().to_string())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for EnrollmentStatus {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        val.parse().map_err(|e: ParseStatusError| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Unknown enrollment status: {}",
                e.0
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for EnrollmentStatus {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_round_trip() {
        for status in EnrollmentStatus::iter() {
            assert_eq!(status.as_str().parse::<EnrollmentStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("graduated".parse::<EnrollmentStatus>().is_err());
        assert!("Passed".parse::<EnrollmentStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!EnrollmentStatus::Registered.is_terminal());
        assert!(EnrollmentStatus::Passed.is_terminal());
        assert!(EnrollmentStatus::Failed.is_terminal());
        assert!(EnrollmentStatus::Withdrawn.is_terminal());
    }
}
