//! inbound request shapes, validated before the ledger is touched

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::{BankId, CreditLineId, FacilityId, FacilityType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBank {
    pub name: String,
    pub code: String,
}

impl NewBank {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("bank name is required"));
        }
        if self.code.trim().is_empty() {
            return Err(LedgerError::validation("bank code is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFacility {
    pub bank_id: BankId,
    pub facility_type: FacilityType,
    pub credit_limit: Money,
    pub cost_of_funding: Rate,
    pub start_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub max_revolving_period_days: Option<u32>,
    pub initial_drawdown_date: Option<NaiveDate>,
}

impl NewFacility {
    pub fn validate(&self) -> Result<()> {
        if self.credit_limit.is_negative() {
            return Err(LedgerError::validation(format!(
                "credit limit must not be negative, got {}",
                self.credit_limit
            )));
        }
        if self.cost_of_funding.is_negative() {
            return Err(LedgerError::validation(format!(
                "cost of funding must not be negative, got {}",
                self.cost_of_funding
            )));
        }
        if let Some(expiry) = self.expiry_date {
            if expiry <= self.start_date {
                return Err(LedgerError::validation(format!(
                    "expiry date {expiry} must be after start date {}",
                    self.start_date
                )));
            }
        }
        if self.max_revolving_period_days == Some(0) {
            return Err(LedgerError::validation("max revolving period must be at least one day"));
        }
        if let Some(drawdown) = self.initial_drawdown_date {
            if drawdown < self.start_date {
                return Err(LedgerError::validation(format!(
                    "initial drawdown date {drawdown} precedes start date {}",
                    self.start_date
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCreditLine {
    pub facility_id: FacilityId,
    pub name: String,
    pub credit_limit: Money,
}

impl NewCreditLine {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("credit line name is required"));
        }
        if self.credit_limit.is_negative() {
            return Err(LedgerError::validation(format!(
                "credit limit must not be negative, got {}",
                self.credit_limit
            )));
        }
        Ok(())
    }
}

/// loan draw request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub facility_id: FacilityId,
    pub credit_line_id: Option<CreditLineId>,
    pub reference_number: String,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub charges_due_date: Option<NaiveDate>,
    /// reference rate quoted on the draw date
    pub sibor_rate: Rate,
}

impl LoanRequest {
    pub fn validate(&self) -> Result<()> {
        if self.reference_number.trim().is_empty() {
            return Err(LedgerError::validation("reference number is required"));
        }
        if !self.amount.is_positive() {
            return Err(LedgerError::validation(format!(
                "loan amount must be positive, got {}",
                self.amount
            )));
        }
        if self.due_date <= self.start_date {
            return Err(LedgerError::validation(format!(
                "due date {} must be after start date {}",
                self.due_date, self.start_date
            )));
        }
        if let Some(charges_due) = self.charges_due_date {
            if charges_due < self.start_date {
                return Err(LedgerError::validation(format!(
                    "charges due date {charges_due} precedes start date {}",
                    self.start_date
                )));
            }
        }
        if self.sibor_rate.is_negative() {
            return Err(LedgerError::validation(format!(
                "sibor rate must not be negative, got {}",
                self.sibor_rate
            )));
        }
        Ok(())
    }
}

/// repayment request with its principal/interest split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub payment_date: NaiveDate,
    pub amount: Money,
    pub principal_amount: Money,
    pub interest_amount: Money,
}

impl PaymentRequest {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(LedgerError::validation(format!(
                "payment amount must be positive, got {}",
                self.amount
            )));
        }
        if self.principal_amount.is_negative() || self.interest_amount.is_negative() {
            return Err(LedgerError::validation("payment components must not be negative"));
        }
        if self.principal_amount + self.interest_amount != self.amount {
            return Err(LedgerError::AmountSplitMismatch {
                amount: self.amount,
                principal: self.principal_amount,
                interest: self.interest_amount,
            });
        }
        Ok(())
    }
}
