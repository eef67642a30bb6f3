use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::decimal::Rate;
use crate::errors::LedgerError;

/// tenant partition key carried by every row
pub type OrganizationId = Uuid;
pub type BankId = Uuid;
pub type FacilityId = Uuid;
pub type CreditLineId = Uuid;
pub type LoanId = Uuid;
pub type PaymentId = Uuid;
pub type TransactionId = Uuid;

/// bank facility products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    Revolving,
    Term,
    Bullet,
    Bridge,
    WorkingCapital,
    NonCashGuarantee,
}

impl FacilityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityType::Revolving => "revolving",
            FacilityType::Term => "term",
            FacilityType::Bullet => "bullet",
            FacilityType::Bridge => "bridge",
            FacilityType::WorkingCapital => "working_capital",
            FacilityType::NonCashGuarantee => "non_cash_guarantee",
        }
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revolving" => Ok(FacilityType::Revolving),
            "term" => Ok(FacilityType::Term),
            "bullet" => Ok(FacilityType::Bullet),
            "bridge" => Ok(FacilityType::Bridge),
            "working_capital" => Ok(FacilityType::WorkingCapital),
            "non_cash_guarantee" => Ok(FacilityType::NonCashGuarantee),
            other => Err(LedgerError::validation(format!("unknown facility type '{other}'"))),
        }
    }
}

/// loan status; settlement is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Settled,
}

/// history ledger entry kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Draw,
    Repayment,
    Fee,
    Interest,
    LimitChange,
    Other,
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draw" => Ok(TransactionType::Draw),
            "repayment" => Ok(TransactionType::Repayment),
            "fee" => Ok(TransactionType::Fee),
            "interest" => Ok(TransactionType::Interest),
            "limit_change" => Ok(TransactionType::LimitChange),
            "other" => Ok(TransactionType::Other),
            other => Err(LedgerError::validation(format!("unknown transaction type '{other}'"))),
        }
    }
}

/// utilization bands for dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtilizationState {
    Unused,    // 0%
    Low,       // < 30%
    Moderate,  // 30-70%
    High,      // 70-90%
    Maxed,     // 90-100%
    Overlimit, // > 100%
}

impl UtilizationState {
    pub fn from_rate(rate: Rate) -> Self {
        if rate == Rate::ZERO {
            UtilizationState::Unused
        } else if rate < Rate::from_percentage(30) {
            UtilizationState::Low
        } else if rate < Rate::from_percentage(70) {
            UtilizationState::Moderate
        } else if rate < Rate::from_percentage(90) {
            UtilizationState::High
        } else if rate <= Rate::from_percentage(100) {
            UtilizationState::Maxed
        } else {
            UtilizationState::Overlimit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_facility_type_parsing() {
        assert_eq!("working_capital".parse::<FacilityType>().unwrap(), FacilityType::WorkingCapital);
        assert_eq!(" Revolving ".parse::<FacilityType>().unwrap(), FacilityType::Revolving);
        assert!("overdraft".parse::<FacilityType>().is_err());

        let json = serde_json::to_string(&FacilityType::NonCashGuarantee).unwrap();
        assert_eq!(json, "\"non_cash_guarantee\"");
        assert!(serde_json::from_str::<FacilityType>("\"mortgage\"").is_err());
    }

    #[test]
    fn test_transaction_type_parsing() {
        assert_eq!("limit_change".parse::<TransactionType>().unwrap(), TransactionType::LimitChange);
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_utilization_bands() {
        assert_eq!(UtilizationState::from_rate(Rate::ZERO), UtilizationState::Unused);
        assert_eq!(UtilizationState::from_rate(Rate::from_percentage(20)), UtilizationState::Low);
        assert_eq!(UtilizationState::from_rate(Rate::from_percentage(60)), UtilizationState::Moderate);
        assert_eq!(UtilizationState::from_rate(Rate::from_percentage(75)), UtilizationState::High);
        assert_eq!(UtilizationState::from_rate(Rate::from_percentage(100)), UtilizationState::Maxed);
        assert_eq!(
            UtilizationState::from_rate(Rate::from_percent(dec!(100.01))),
            UtilizationState::Overlimit
        );
    }
}
