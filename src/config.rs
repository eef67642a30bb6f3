use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::interest::DayCountConvention;

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// single ledger currency, display only
    pub currency: String,
    /// year basis for interest accrual
    pub day_count_convention: DayCountConvention,
    /// precision accrued interest is booked at
    pub interest_decimal_places: u32,
    /// automatic re-runs of a check-and-write after a storage conflict
    pub max_conflict_retries: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency: "SAR".to_string(),
            day_count_convention: DayCountConvention::Actual365,
            interest_decimal_places: 2,
            max_conflict_retries: 1,
        }
    }
}

impl LedgerConfig {
    /// parse and validate a json configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json).map_err(|e| {
            LedgerError::InvalidConfiguration {
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interest_decimal_places > 8 {
            return Err(LedgerError::InvalidConfiguration {
                message: format!(
                    "interest_decimal_places must be at most 8, got {}",
                    self.interest_decimal_places
                ),
            });
        }
        if self.currency.trim().is_empty() {
            return Err(LedgerError::InvalidConfiguration {
                message: "currency must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.currency, "SAR");
        assert_eq!(config.day_count_convention, DayCountConvention::Actual365);
        assert_eq!(config.interest_decimal_places, 2);
        assert_eq!(config.max_conflict_retries, 1);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = LedgerConfig::from_json(r#"{ "interest_decimal_places": 4 }"#).unwrap();
        assert_eq!(
            config,
            LedgerConfig {
                interest_decimal_places: 4,
                ..LedgerConfig::default()
            }
        );
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            LedgerConfig::from_json(r#"{ "interest_decimal_places": 12 }"#),
            Err(LedgerError::InvalidConfiguration { .. })
        ));
        assert!(LedgerConfig::from_json(r#"{ "day_count_convention": "Thirty360" }"#).is_err());
    }
}
