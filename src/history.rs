use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{BankId, FacilityId, LoanId, OrganizationId, TransactionId, TransactionType};

/// append-only audit row; never updated or removed once committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub organization_id: OrganizationId,
    pub bank_id: BankId,
    pub facility_id: FacilityId,
    pub loan_id: Option<LoanId>,
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub date: NaiveDate,
    pub description: String,
    pub recorded_at: DateTime<Utc>,
}

/// collects the audit rows an operation produces before they are committed
#[derive(Debug)]
pub struct TransactionJournal {
    organization_id: OrganizationId,
    bank_id: BankId,
    facility_id: FacilityId,
    recorded_at: DateTime<Utc>,
    entries: Vec<Transaction>,
}

impl TransactionJournal {
    pub fn new(
        organization_id: OrganizationId,
        bank_id: BankId,
        facility_id: FacilityId,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            organization_id,
            bank_id,
            facility_id,
            recorded_at,
            entries: Vec::new(),
        }
    }

    pub fn record(
        &mut self,
        transaction_type: TransactionType,
        amount: Money,
        date: NaiveDate,
        loan_id: Option<LoanId>,
        description: impl Into<String>,
    ) {
        self.entries.push(Transaction {
            id: Uuid::new_v4(),
            organization_id: self.organization_id,
            bank_id: self.bank_id,
            facility_id: self.facility_id,
            loan_id,
            transaction_type,
            amount,
            date,
            description: description.into(),
            recorded_at: self.recorded_at,
        });
    }

    /// record only when the amount is non-zero
    pub fn record_nonzero(
        &mut self,
        transaction_type: TransactionType,
        amount: Money,
        date: NaiveDate,
        loan_id: Option<LoanId>,
        description: impl Into<String>,
    ) {
        if !amount.is_zero() {
            self.record(transaction_type, amount, date, loan_id, description);
        }
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Transaction> {
        self.entries
    }
}

/// net drawn minus repaid principal over a slice of history
pub fn net_principal_flow(transactions: &[Transaction]) -> Money {
    transactions
        .iter()
        .map(|t| match t.transaction_type {
            TransactionType::Draw => t.amount,
            TransactionType::Repayment => -t.amount,
            _ => Money::ZERO,
        })
        .sum()
}
