//! storage collaborator seam
//!
//! the ledger reads one organization's rows as a [`Partition`] copy, decides,
//! and writes back a [`ChangeSet`]. commits are rejected when a facility the
//! caller read has been written in the meantime.

pub mod memory;

use std::collections::{BTreeMap, HashMap, HashSet};

use uuid::Uuid;

use crate::entities::{Bank, CreditLine, Facility, Loan, Payment};
use crate::errors::Result;
use crate::history::Transaction;
use crate::types::{BankId, CreditLineId, FacilityId, LoanId, OrganizationId, PaymentId};

pub use memory::MemoryStore;

/// transactional access to the ledger tables
pub trait LedgerStore: Send + Sync {
    /// consistent point-in-time copy of one organization's rows
    fn load(&self, organization_id: OrganizationId) -> Result<Partition>;

    /// apply the change set atomically, or fail with `ConsistencyFailure`;
    /// loan reference numbers are unique per organization
    fn commit(&self, organization_id: OrganizationId, changes: ChangeSet) -> Result<()>;

    /// organization owning an entity id, across all tenants
    fn owner_of(&self, id: Uuid) -> Option<OrganizationId>;
}

/// one organization's tables
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub organization_id: OrganizationId,
    pub banks: BTreeMap<BankId, Bank>,
    pub facilities: BTreeMap<FacilityId, Facility>,
    pub credit_lines: BTreeMap<CreditLineId, CreditLine>,
    pub loans: BTreeMap<LoanId, Loan>,
    pub payments: BTreeMap<PaymentId, Payment>,
    pub transactions: Vec<Transaction>,
    pub versions: HashMap<FacilityId, u64>,
}

impl Partition {
    pub fn new(organization_id: OrganizationId) -> Self {
        Self {
            organization_id,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty() && self.facilities.is_empty()
    }

    /// write version of a facility subtree, zero before its first commit
    pub fn version_of(&self, facility_id: FacilityId) -> u64 {
        self.versions.get(&facility_id).copied().unwrap_or(0)
    }

    /// live (not deleted) facility
    pub fn facility(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities.get(&id).filter(|f| !f.is_deleted())
    }

    /// live (not deleted) credit line
    pub fn credit_line(&self, id: CreditLineId) -> Option<&CreditLine> {
        self.credit_lines.get(&id).filter(|c| !c.is_deleted())
    }

    /// every loan ever drawn under a facility, settled ones included
    pub fn loans_for_facility(&self, facility_id: FacilityId) -> impl Iterator<Item = &Loan> {
        self.loans.values().filter(move |l| l.facility_id == facility_id)
    }

    pub fn payments_for_loan(&self, loan_id: LoanId) -> Vec<&Payment> {
        let mut payments: Vec<&Payment> =
            self.payments.values().filter(|p| p.loan_id == loan_id).collect();
        payments.sort_by_key(|p| (p.payment_date, p.created_at));
        payments
    }

    pub fn has_reference(&self, reference_number: &str) -> bool {
        self.loans.values().any(|l| l.reference_number == reference_number)
    }
}

/// writes produced by one ledger operation
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// facility versions the decision was based on
    pub guards: Vec<(FacilityId, u64)>,
    pub banks: Vec<Bank>,
    pub facilities: Vec<Facility>,
    pub credit_lines: Vec<CreditLine>,
    pub loans: Vec<Loan>,
    pub payments: Vec<Payment>,
    pub transactions: Vec<Transaction>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// fail the commit if the facility moved past `version`
    pub fn guard(mut self, facility_id: FacilityId, version: u64) -> Self {
        self.guards.push((facility_id, version));
        self
    }

    pub fn put_bank(mut self, bank: Bank) -> Self {
        self.banks.push(bank);
        self
    }

    pub fn put_facility(mut self, facility: Facility) -> Self {
        self.facilities.push(facility);
        self
    }

    pub fn put_credit_line(mut self, credit_line: CreditLine) -> Self {
        self.credit_lines.push(credit_line);
        self
    }

    pub fn put_loan(mut self, loan: Loan) -> Self {
        self.loans.push(loan);
        self
    }

    pub fn insert_payment(mut self, payment: Payment) -> Self {
        self.payments.push(payment);
        self
    }

    pub fn append(mut self, transactions: impl IntoIterator<Item = Transaction>) -> Self {
        self.transactions.extend(transactions);
        self
    }

    /// facilities whose version the commit bumps
    pub fn touched_facilities(&self) -> HashSet<FacilityId> {
        self.facilities
            .iter()
            .map(|f| f.id)
            .chain(self.credit_lines.iter().map(|c| c.facility_id))
            .chain(self.loans.iter().map(|l| l.facility_id))
            .chain(self.transactions.iter().map(|t| t.facility_id))
            .collect()
    }

    /// every row must belong to the committing organization
    pub fn foreign_row(&self, organization_id: OrganizationId) -> Option<Uuid> {
        self.banks
            .iter()
            .filter(|b| b.organization_id != organization_id)
            .map(|b| b.id)
            .chain(
                self.facilities
                    .iter()
                    .filter(|f| f.organization_id != organization_id)
                    .map(|f| f.id),
            )
            .chain(
                self.credit_lines
                    .iter()
                    .filter(|c| c.organization_id != organization_id)
                    .map(|c| c.id),
            )
            .chain(
                self.loans
                    .iter()
                    .filter(|l| l.organization_id != organization_id)
                    .map(|l| l.id),
            )
            .chain(
                self.payments
                    .iter()
                    .filter(|p| p.organization_id != organization_id)
                    .map(|p| p.id),
            )
            .chain(
                self.transactions
                    .iter()
                    .filter(|t| t.organization_id != organization_id)
                    .map(|t| t.id),
            )
            .next()
    }
}
