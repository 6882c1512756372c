//! Dashboard query parameters.

use serde::{Deserialize, Serialize};

use crate::errors::errors::AppError;

/// Reporting window for the tutor dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(AppError::ValidationError(
                "Period must be one of week, month or year".to_string(),
            )),
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    /// Defaults to a month when the query string omits the period.
    pub fn period(&self) -> Result<Period, AppError> {
        match self.period.as_deref() {
            Some(value) => Period::parse(value),
            None => Ok(Period::Month),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_periods() {
        assert_eq!(Period::parse("week").unwrap().days(), 7);
        assert_eq!(Period::parse("month").unwrap().days(), 30);
        assert_eq!(Period::parse("year").unwrap().days(), 365);
    }

    #[test]
    fn rejects_unknown_period() {
        assert!(Period::parse("decade").is_err());
    }
}
