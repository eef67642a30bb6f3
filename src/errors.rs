use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;
use crate::types::LoanId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("invalid request: {message}")]
    Validation {
        message: String,
    },

    #[error("reference number {reference} already used in this organization")]
    DuplicateReference {
        reference: String,
    },

    #[error("{entity} not found")]
    NotFound {
        entity: &'static str,
    },

    /// cross-tenant access; rendered exactly like a missing row
    #[error("{entity} not found")]
    TenantMismatch {
        entity: &'static str,
    },

    #[error("insufficient facility credit: available {available}, requested {requested}, exceeds by {shortfall}")]
    InsufficientFacilityCredit {
        available: Money,
        requested: Money,
        shortfall: Money,
    },

    #[error("insufficient credit line credit: available {available}, requested {requested}, exceeds by {shortfall}")]
    InsufficientCreditLineCredit {
        available: Money,
        requested: Money,
        shortfall: Money,
    },

    #[error("revolving period exceeded: {remaining_days} days remaining, {requested_days} requested, exceeds by {excess_days}")]
    RevolvingPeriodExceeded {
        remaining_days: i64,
        requested_days: i64,
        excess_days: i64,
    },

    #[error("loan due date {due_date} is after facility expiry {expiry_date}")]
    LoanExceedsFacilityExpiry {
        due_date: NaiveDate,
        expiry_date: NaiveDate,
    },

    #[error("limit {new_limit} is below current usage {used}, short by {shortfall}")]
    DecreaseBelowUsage {
        new_limit: Money,
        used: Money,
        shortfall: Money,
    },

    #[error("credit line limit {requested} exceeds facility capacity {available}, exceeds by {shortfall}")]
    CreditLineExceedsFacility {
        available: Money,
        requested: Money,
        shortfall: Money,
    },

    #[error("payment split mismatch: amount {amount}, principal {principal} + interest {interest}")]
    AmountSplitMismatch {
        amount: Money,
        principal: Money,
        interest: Money,
    },

    #[error("overpayment of {component}: outstanding {outstanding}, provided {provided}, exceeds by {excess}")]
    OverpaymentError {
        component: &'static str,
        outstanding: Money,
        provided: Money,
        excess: Money,
    },

    #[error("loan {loan_id} is already settled")]
    LoanSettled {
        loan_id: LoanId,
    },

    #[error("{count} active loans still reference this {entity}")]
    ActiveLoansOutstanding {
        entity: &'static str,
        count: usize,
    },

    #[error("concurrent update conflict, try again")]
    ConsistencyFailure,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

/// error taxonomy the calling layer maps onto responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// malformed request, rejected before touching the ledger
    Validation,
    /// a credit rule refused the request; terminal, never retried
    BusinessRule,
    /// cross-tenant access, reported to callers as not found
    TenantIsolation,
    NotFound,
    /// storage conflict that survived the automatic retry
    Consistency,
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Validation { .. }
            | LedgerError::DuplicateReference { .. }
            | LedgerError::InvalidConfiguration { .. } => ErrorKind::Validation,
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::TenantMismatch { .. } => ErrorKind::TenantIsolation,
            LedgerError::ConsistencyFailure => ErrorKind::Consistency,
            LedgerError::InsufficientFacilityCredit { .. }
            | LedgerError::InsufficientCreditLineCredit { .. }
            | LedgerError::RevolvingPeriodExceeded { .. }
            | LedgerError::LoanExceedsFacilityExpiry { .. }
            | LedgerError::DecreaseBelowUsage { .. }
            | LedgerError::CreditLineExceedsFacility { .. }
            | LedgerError::AmountSplitMismatch { .. }
            | LedgerError::OverpaymentError { .. }
            | LedgerError::LoanSettled { .. }
            | LedgerError::ActiveLoansOutstanding { .. } => ErrorKind::BusinessRule,
        }
    }

    /// monetary overshoot carried by the violation, if any
    pub fn shortfall(&self) -> Option<Money> {
        match self {
            LedgerError::InsufficientFacilityCredit { shortfall, .. }
            | LedgerError::InsufficientCreditLineCredit { shortfall, .. }
            | LedgerError::DecreaseBelowUsage { shortfall, .. }
            | LedgerError::CreditLineExceedsFacility { shortfall, .. } => Some(*shortfall),
            LedgerError::OverpaymentError { excess, .. } => Some(*excess),
            LedgerError::AmountSplitMismatch {
                amount,
                principal,
                interest,
            } => Some((*amount - (*principal + *interest)).abs()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
