use chrono::NaiveDate;
use hourglass_rs::{SafeTimeProvider, TimeSource};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::decimal::{Money, Rate};
use crate::entities::{Bank, CreditLine, Facility, FrozenRates, Loan, Payment};
use crate::errors::{ErrorKind, LedgerError, Result};
use crate::hierarchy::{HierarchyResolver, HierarchySnapshot};
use crate::history::{Transaction, TransactionJournal};
use crate::interest::{AccrualEngine, BalanceCalculator, LoanBalance};
use crate::limits::LimitEngine;
use crate::locks::FacilityLocks;
use crate::payments::{self, PaymentAllocator, PaymentWaterfall};
use crate::requests::{LoanRequest, NewBank, NewCreditLine, NewFacility, PaymentRequest};
use crate::revolving::{RevolvingPeriodStatus, RevolvingPeriodTracker};
use crate::store::{ChangeSet, LedgerStore, MemoryStore, Partition};
use crate::types::{CreditLineId, FacilityId, LoanId, LoanStatus, OrganizationId, TransactionType};

/// credit ledger service
///
/// every operation is scoped to one organization. writes against a facility
/// aggregate hold that facility's lock from load to commit and re-run once
/// (configurable) when the store reports a conflicting commit.
pub struct Ledger<S: LedgerStore = MemoryStore> {
    config: LedgerConfig,
    store: S,
    locks: FacilityLocks,
    balances: BalanceCalculator,
}

impl Ledger<MemoryStore> {
    /// ledger over a fresh in-process store
    pub fn in_memory(config: LedgerConfig) -> Result<Self> {
        Self::new(config, MemoryStore::new())
    }
}

impl<S: LedgerStore> Ledger<S> {
    pub fn new(config: LedgerConfig, store: S) -> Result<Self> {
        config.validate()?;
        let engine = AccrualEngine::new(config.day_count_convention, config.interest_decimal_places);
        Ok(Self {
            config,
            store,
            locks: FacilityLocks::new(),
            balances: BalanceCalculator::new(engine),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// register a bank for an organization
    #[instrument(skip(self, request, time), fields(code = %request.code))]
    pub fn create_bank(
        &self,
        organization_id: OrganizationId,
        request: NewBank,
        time: &SafeTimeProvider,
    ) -> Result<Bank> {
        request.validate()?;

        // bank codes are unique per organization, so bank creation serializes on the organization key
        let lock = self.locks.handle(organization_id);
        let _held = lock.lock();

        self.with_retry("create_bank", || {
            let partition = self.store.load(organization_id)?;
            let code = request.code.trim();
            if partition.banks.values().any(|b| b.code.eq_ignore_ascii_case(code)) {
                return Err(LedgerError::validation(format!(
                    "bank code {code} already registered"
                )));
            }

            let bank = Bank {
                id: Uuid::new_v4(),
                organization_id,
                name: request.name.trim().to_string(),
                code: code.to_string(),
                created_at: time.now(),
            };
            self.store
                .commit(organization_id, ChangeSet::new().put_bank(bank.clone()))?;

            info!(bank_id = %bank.id, "bank created");
            Ok(bank)
        })
    }

    /// open a facility under one of the organization's banks
    #[instrument(skip(self, request, time), fields(bank_id = %request.bank_id))]
    pub fn create_facility(
        &self,
        organization_id: OrganizationId,
        request: NewFacility,
        time: &SafeTimeProvider,
    ) -> Result<Facility> {
        request.validate()?;

        self.with_retry("create_facility", || {
            let partition = self.store.load(organization_id)?;
            let bank = partition
                .banks
                .get(&request.bank_id)
                .ok_or_else(|| self.missing(organization_id, request.bank_id, "bank"))?;

            let now = time.now();
            let facility = Facility {
                id: Uuid::new_v4(),
                organization_id,
                bank_id: bank.id,
                facility_type: request.facility_type,
                credit_limit: request.credit_limit,
                cost_of_funding: request.cost_of_funding,
                start_date: request.start_date,
                expiry_date: request.expiry_date,
                max_revolving_period_days: request.max_revolving_period_days,
                initial_drawdown_date: request.initial_drawdown_date,
                created_at: now,
                deleted_at: None,
            };

            let mut journal = TransactionJournal::new(organization_id, bank.id, facility.id, now);
            journal.record(
                TransactionType::LimitChange,
                facility.credit_limit,
                facility.start_date,
                None,
                format!("{} facility opened with limit {}", facility.facility_type, facility.credit_limit),
            );

            let changes = ChangeSet::new()
                .guard(facility.id, 0)
                .put_facility(facility.clone())
                .append(journal.into_entries());
            self.store.commit(organization_id, changes)?;

            info!(
                facility_id = %facility.id,
                credit_limit = %facility.credit_limit,
                "facility created"
            );
            Ok(facility)
        })
    }

    /// carve a credit line out of a facility's remaining capacity
    #[instrument(skip(self, request, time), fields(facility_id = %request.facility_id))]
    pub fn create_credit_line(
        &self,
        organization_id: OrganizationId,
        request: NewCreditLine,
        time: &SafeTimeProvider,
    ) -> Result<CreditLine> {
        request.validate()?;

        let lock = self.locks.handle(request.facility_id);
        let _held = lock.lock();

        self.with_retry("create_credit_line", || {
            let partition = self.store.load(organization_id)?;
            let node = self.facility_node(organization_id, &partition, request.facility_id)?;
            LimitEngine::check_new_credit_line(&node, request.credit_limit)?;

            let now = time.now();
            let line = CreditLine {
                id: Uuid::new_v4(),
                organization_id,
                facility_id: node.facility.id,
                name: request.name.trim().to_string(),
                credit_limit: request.credit_limit,
                created_at: now,
                deleted_at: None,
            };

            let mut journal = self.journal(&node.facility, now);
            journal.record(
                TransactionType::LimitChange,
                line.credit_limit,
                now.date_naive(),
                None,
                format!("credit line '{}' opened with limit {}", line.name, line.credit_limit),
            );

            let changes = ChangeSet::new()
                .guard(node.facility.id, partition.version_of(node.facility.id))
                .put_credit_line(line.clone())
                .append(journal.into_entries());
            self.store.commit(organization_id, changes)?;

            info!(credit_line_id = %line.id, credit_limit = %line.credit_limit, "credit line created");
            Ok(line)
        })
    }

    /// consistent snapshot of the organization's credit hierarchy
    #[instrument(skip(self))]
    pub fn resolve_hierarchy(&self, organization_id: OrganizationId) -> Result<HierarchySnapshot> {
        let partition = self.store.load(organization_id)?;
        HierarchyResolver::resolve(&partition)
    }

    /// draw a loan against a facility and, optionally, one of its credit lines
    #[instrument(
        skip(self, request, time),
        fields(facility_id = %request.facility_id, reference = %request.reference_number)
    )]
    pub fn create_loan(
        &self,
        organization_id: OrganizationId,
        request: LoanRequest,
        time: &SafeTimeProvider,
    ) -> Result<Loan> {
        request.validate()?;

        let lock = self.locks.handle(request.facility_id);
        let _held = lock.lock();

        self.with_retry("create_loan", || {
            let partition = self.store.load(organization_id)?;
            let node = self.facility_node(organization_id, &partition, request.facility_id)?;
            if let Some(line_id) = request.credit_line_id {
                if !partition.credit_lines.contains_key(&line_id) {
                    return Err(self.missing(organization_id, line_id, "credit line"));
                }
            }

            let admission = LimitEngine::check_loan(&partition, &node, &request)?;

            let now = time.now();
            let facility = &node.facility;
            let loan = Loan {
                id: Uuid::new_v4(),
                organization_id,
                facility_id: facility.id,
                credit_line_id: request.credit_line_id,
                reference_number: request.reference_number.trim().to_string(),
                amount: request.amount,
                start_date: request.start_date,
                due_date: request.due_date,
                charges_due_date: request.charges_due_date,
                rates: FrozenRates::capture(request.sibor_rate, facility),
                status: LoanStatus::Active,
                settled_on: None,
                created_at: now,
            };

            let mut journal = self.journal(facility, now);
            journal.record(
                TransactionType::Draw,
                loan.amount,
                loan.start_date,
                Some(loan.id),
                format!("loan {} drawn", loan.reference_number),
            );

            let mut changes = ChangeSet::new()
                .guard(facility.id, partition.version_of(facility.id))
                .put_loan(loan.clone());
            if facility.initial_drawdown_date.is_none() {
                let mut first_draw = facility.clone();
                first_draw.initial_drawdown_date = Some(loan.start_date);
                changes = changes.put_facility(first_draw);
            }
            self.store
                .commit(organization_id, changes.append(journal.into_entries()))?;

            info!(
                loan_id = %loan.id,
                amount = %loan.amount,
                facility_available = %admission.facility_available_after,
                revolving_days_remaining = ?admission.revolving_days_remaining_after,
                "loan drawn"
            );
            Ok(loan)
        })
    }

    /// book a repayment; a loan whose balance reaches zero is settled
    #[instrument(skip(self, request, time), fields(amount = %request.amount))]
    pub fn record_payment(
        &self,
        organization_id: OrganizationId,
        loan_id: LoanId,
        request: PaymentRequest,
        time: &SafeTimeProvider,
    ) -> Result<Payment> {
        request.validate()?;

        // a loan never moves between facilities
        let facility_id = self.loan(organization_id, loan_id)?.facility_id;
        let lock = self.locks.handle(facility_id);
        let _held = lock.lock();

        self.with_retry("record_payment", || {
            let partition = self.store.load(organization_id)?;
            let loan = self.find_loan(organization_id, &partition, loan_id)?;

            let prior = partition.payments_for_loan(loan_id);
            let balance = self
                .balances
                .position(loan, prior.iter().copied(), request.payment_date)?;
            payments::check_payment(loan, &balance, &request)?;

            let now = time.now();
            let payment = Payment {
                id: Uuid::new_v4(),
                organization_id,
                loan_id,
                payment_date: request.payment_date,
                amount: request.amount,
                principal_amount: request.principal_amount,
                interest_amount: request.interest_amount,
                created_at: now,
            };

            // a backdated payment settles as of the latest payment on the loan
            let settle_date = prior
                .iter()
                .map(|p| p.payment_date)
                .fold(payment.payment_date, NaiveDate::max);
            let after = self.balances.position(
                loan,
                prior.iter().copied().chain(std::iter::once(&payment)),
                settle_date,
            )?;

            let facility = partition
                .facilities
                .get(&loan.facility_id)
                .ok_or(LedgerError::NotFound { entity: "facility" })?;
            let mut journal = self.journal(facility, now);
            journal.record_nonzero(
                TransactionType::Repayment,
                payment.principal_amount,
                payment.payment_date,
                Some(loan_id),
                format!("principal repaid on loan {}", loan.reference_number),
            );
            journal.record_nonzero(
                TransactionType::Interest,
                payment.interest_amount,
                payment.payment_date,
                Some(loan_id),
                format!("interest paid on loan {}", loan.reference_number),
            );

            let mut changes = ChangeSet::new()
                .guard(facility.id, partition.version_of(facility.id))
                .insert_payment(payment.clone());
            let settles = !after.outstanding_balance.is_positive();
            if settles {
                let mut settled = loan.clone();
                settled.settle(settle_date);
                changes = changes.put_loan(settled);
            }
            self.store
                .commit(organization_id, changes.append(journal.into_entries()))?;

            info!(
                payment_id = %payment.id,
                outstanding = %after.outstanding_balance,
                settled = settles,
                "payment recorded"
            );
            Ok(payment)
        })
    }

    /// interest-first split of a lump sum against the balance on `payment_date`
    #[instrument(skip(self))]
    pub fn allocate_payment(
        &self,
        organization_id: OrganizationId,
        loan_id: LoanId,
        amount: Money,
        payment_date: NaiveDate,
    ) -> Result<PaymentRequest> {
        let partition = self.store.load(organization_id)?;
        let loan = self.find_loan(organization_id, &partition, loan_id)?;
        if !loan.is_active() {
            return Err(LedgerError::LoanSettled { loan_id });
        }

        let balance = self
            .balances
            .balance(loan, partition.payments_for_loan(loan_id), payment_date)?;
        PaymentAllocator::new(PaymentWaterfall::interest_first()).allocate(&balance, amount, payment_date)
    }

    /// balance of a loan as of a business date
    #[instrument(skip(self))]
    pub fn get_loan_balance(
        &self,
        organization_id: OrganizationId,
        loan_id: LoanId,
        as_of: NaiveDate,
    ) -> Result<LoanBalance> {
        let partition = self.store.load(organization_id)?;
        let loan = self.find_loan(organization_id, &partition, loan_id)?;
        self.balances
            .balance(loan, partition.payments_for_loan(loan_id), as_of)
    }

    /// balance as of the provider's current date
    pub fn get_loan_balance_at(
        &self,
        organization_id: OrganizationId,
        loan_id: LoanId,
        time: &SafeTimeProvider,
    ) -> Result<LoanBalance> {
        self.get_loan_balance(organization_id, loan_id, time.now().date_naive())
    }

    /// balance as of today, by system time
    pub fn get_loan_balance_now(
        &self,
        organization_id: OrganizationId,
        loan_id: LoanId,
    ) -> Result<LoanBalance> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.get_loan_balance_at(organization_id, loan_id, &time)
    }

    /// resize a facility; never below what is currently drawn
    #[instrument(skip(self, time))]
    pub fn update_facility_limit(
        &self,
        organization_id: OrganizationId,
        facility_id: FacilityId,
        new_limit: Money,
        time: &SafeTimeProvider,
    ) -> Result<Facility> {
        let lock = self.locks.handle(facility_id);
        let _held = lock.lock();

        self.with_retry("update_facility_limit", || {
            let partition = self.store.load(organization_id)?;
            let node = self.facility_node(organization_id, &partition, facility_id)?;
            LimitEngine::check_facility_limit(&node, new_limit)?;

            let now = time.now();
            let previous = node.facility.credit_limit;
            let mut facility = node.facility.clone();
            facility.credit_limit = new_limit;

            let mut journal = self.journal(&facility, now);
            journal.record_nonzero(
                TransactionType::LimitChange,
                new_limit - previous,
                now.date_naive(),
                None,
                format!("facility limit changed from {previous} to {new_limit}"),
            );

            let changes = ChangeSet::new()
                .guard(facility_id, partition.version_of(facility_id))
                .put_facility(facility.clone())
                .append(journal.into_entries());
            self.store.commit(organization_id, changes)?;

            info!(%previous, "facility limit updated");
            Ok(facility)
        })
    }

    /// resize a credit line within its facility's capacity
    #[instrument(skip(self, time))]
    pub fn update_credit_line_limit(
        &self,
        organization_id: OrganizationId,
        credit_line_id: CreditLineId,
        new_limit: Money,
        time: &SafeTimeProvider,
    ) -> Result<CreditLine> {
        let facility_id = self.credit_line_facility(organization_id, credit_line_id)?;
        let lock = self.locks.handle(facility_id);
        let _held = lock.lock();

        self.with_retry("update_credit_line_limit", || {
            let partition = self.store.load(organization_id)?;
            let node = self.facility_node(organization_id, &partition, facility_id)?;
            let line_node = node
                .credit_lines
                .iter()
                .find(|c| c.credit_line.id == credit_line_id)
                .ok_or(LedgerError::NotFound { entity: "credit line" })?;
            LimitEngine::check_credit_line_limit(&node, line_node, new_limit)?;

            let now = time.now();
            let previous = line_node.credit_line.credit_limit;
            let mut line = line_node.credit_line.clone();
            line.credit_limit = new_limit;

            let mut journal = self.journal(&node.facility, now);
            journal.record_nonzero(
                TransactionType::LimitChange,
                new_limit - previous,
                now.date_naive(),
                None,
                format!("credit line '{}' limit changed from {previous} to {new_limit}", line.name),
            );

            let changes = ChangeSet::new()
                .guard(facility_id, partition.version_of(facility_id))
                .put_credit_line(line.clone())
                .append(journal.into_entries());
            self.store.commit(organization_id, changes)?;

            info!(%previous, "credit line limit updated");
            Ok(line)
        })
    }

    /// reprice future draws; existing loans keep their frozen bank rate
    #[instrument(skip(self, time))]
    pub fn update_facility_cost_of_funding(
        &self,
        organization_id: OrganizationId,
        facility_id: FacilityId,
        cost_of_funding: Rate,
        time: &SafeTimeProvider,
    ) -> Result<Facility> {
        if cost_of_funding.is_negative() {
            return Err(LedgerError::validation(format!(
                "cost of funding must not be negative, got {cost_of_funding}"
            )));
        }

        let lock = self.locks.handle(facility_id);
        let _held = lock.lock();

        self.with_retry("update_facility_cost_of_funding", || {
            let partition = self.store.load(organization_id)?;
            let current = partition
                .facility(facility_id)
                .ok_or_else(|| self.missing(organization_id, facility_id, "facility"))?;

            let now = time.now();
            let previous = current.cost_of_funding;
            let mut facility = current.clone();
            facility.cost_of_funding = cost_of_funding;

            let mut journal = self.journal(&facility, now);
            journal.record(
                TransactionType::Other,
                Money::ZERO,
                now.date_naive(),
                None,
                format!("cost of funding changed from {previous} to {cost_of_funding}"),
            );

            let changes = ChangeSet::new()
                .guard(facility_id, partition.version_of(facility_id))
                .put_facility(facility.clone())
                .append(journal.into_entries());
            self.store.commit(organization_id, changes)?;

            info!(%previous, "cost of funding updated");
            Ok(facility)
        })
    }

    /// soft-delete a facility and its credit lines
    #[instrument(skip(self, time))]
    pub fn delete_facility(
        &self,
        organization_id: OrganizationId,
        facility_id: FacilityId,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        let lock = self.locks.handle(facility_id);
        let _held = lock.lock();

        self.with_retry("delete_facility", || {
            let partition = self.store.load(organization_id)?;
            let node = self.facility_node(organization_id, &partition, facility_id)?;
            let count = node.active_loan_count();
            if count > 0 {
                return Err(LedgerError::ActiveLoansOutstanding {
                    entity: "facility",
                    count,
                });
            }

            let now = time.now();
            let mut facility = node.facility.clone();
            facility.deleted_at = Some(now);

            let mut changes = ChangeSet::new().guard(facility_id, partition.version_of(facility_id));
            for line_node in &node.credit_lines {
                let mut line = line_node.credit_line.clone();
                line.deleted_at = Some(now);
                changes = changes.put_credit_line(line);
            }

            let mut journal = self.journal(&facility, now);
            journal.record(
                TransactionType::Other,
                Money::ZERO,
                now.date_naive(),
                None,
                "facility closed",
            );
            self.store.commit(
                organization_id,
                changes.put_facility(facility).append(journal.into_entries()),
            )?;

            info!(credit_lines = node.credit_lines.len(), "facility deleted");
            Ok(())
        })
    }

    /// soft-delete a credit line
    #[instrument(skip(self, time))]
    pub fn delete_credit_line(
        &self,
        organization_id: OrganizationId,
        credit_line_id: CreditLineId,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        let facility_id = self.credit_line_facility(organization_id, credit_line_id)?;
        let lock = self.locks.handle(facility_id);
        let _held = lock.lock();

        self.with_retry("delete_credit_line", || {
            let partition = self.store.load(organization_id)?;
            let node = self.facility_node(organization_id, &partition, facility_id)?;
            let line_node = node
                .credit_lines
                .iter()
                .find(|c| c.credit_line.id == credit_line_id)
                .ok_or(LedgerError::NotFound { entity: "credit line" })?;
            if !line_node.loans.is_empty() {
                return Err(LedgerError::ActiveLoansOutstanding {
                    entity: "credit line",
                    count: line_node.loans.len(),
                });
            }

            let now = time.now();
            let mut line = line_node.credit_line.clone();
            line.deleted_at = Some(now);

            let mut journal = self.journal(&node.facility, now);
            journal.record(
                TransactionType::Other,
                Money::ZERO,
                now.date_naive(),
                None,
                format!("credit line '{}' closed", line.name),
            );

            let changes = ChangeSet::new()
                .guard(facility_id, partition.version_of(facility_id))
                .put_credit_line(line)
                .append(journal.into_entries());
            self.store.commit(organization_id, changes)?;

            info!("credit line deleted");
            Ok(())
        })
    }

    /// revolving budget of a facility, `None` when it has no cap
    #[instrument(skip(self))]
    pub fn revolving_status(
        &self,
        organization_id: OrganizationId,
        facility_id: FacilityId,
    ) -> Result<Option<RevolvingPeriodStatus>> {
        let partition = self.store.load(organization_id)?;
        let facility = partition
            .facility(facility_id)
            .ok_or_else(|| self.missing(organization_id, facility_id, "facility"))?;
        Ok(RevolvingPeriodTracker::status(
            facility,
            partition.loans_for_facility(facility_id),
        ))
    }

    /// audit trail in append order, optionally for one facility
    #[instrument(skip(self))]
    pub fn transactions(
        &self,
        organization_id: OrganizationId,
        facility_id: Option<FacilityId>,
    ) -> Result<Vec<Transaction>> {
        let partition = self.store.load(organization_id)?;
        match facility_id {
            Some(id) => {
                // closed facilities keep their history
                if !partition.facilities.contains_key(&id) {
                    return Err(self.missing(organization_id, id, "facility"));
                }
                Ok(partition
                    .transactions
                    .into_iter()
                    .filter(|t| t.facility_id == id)
                    .collect())
            }
            None => Ok(partition.transactions),
        }
    }

    pub fn loan(&self, organization_id: OrganizationId, loan_id: LoanId) -> Result<Loan> {
        let partition = self.store.load(organization_id)?;
        self.find_loan(organization_id, &partition, loan_id).cloned()
    }

    /// payments booked against a loan, oldest first
    pub fn payments(&self, organization_id: OrganizationId, loan_id: LoanId) -> Result<Vec<Payment>> {
        let partition = self.store.load(organization_id)?;
        self.find_loan(organization_id, &partition, loan_id)?;
        Ok(partition
            .payments_for_loan(loan_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// run a check-and-write, re-running it after a commit conflict
    fn with_retry<T>(&self, operation: &'static str, mut attempt: impl FnMut() -> Result<T>) -> Result<T> {
        let mut retries = 0;
        loop {
            match attempt() {
                Err(LedgerError::ConsistencyFailure) if retries < self.config.max_conflict_retries => {
                    retries += 1;
                    warn!(operation, retries, "commit conflicted, re-running");
                }
                Err(err) => {
                    match err.kind() {
                        ErrorKind::BusinessRule => warn!(operation, error = %err, "request rejected"),
                        ErrorKind::Consistency => warn!(operation, retries, "giving up after conflicts"),
                        _ => {}
                    }
                    return Err(err);
                }
                ok => return ok,
            }
        }
    }

    /// not found in this organization; distinguishes rows owned by another one
    fn missing(&self, organization_id: OrganizationId, id: Uuid, entity: &'static str) -> LedgerError {
        match self.store.owner_of(id) {
            Some(owner) if owner != organization_id => {
                error!(%organization_id, %owner, %id, entity, "cross-organization access rejected");
                LedgerError::TenantMismatch { entity }
            }
            _ => LedgerError::NotFound { entity },
        }
    }

    fn facility_node(
        &self,
        organization_id: OrganizationId,
        partition: &Partition,
        facility_id: FacilityId,
    ) -> Result<crate::hierarchy::FacilityNode> {
        if partition.facility(facility_id).is_none() {
            return Err(self.missing(organization_id, facility_id, "facility"));
        }
        HierarchyResolver::resolve_facility(partition, facility_id)
    }

    fn find_loan<'p>(
        &self,
        organization_id: OrganizationId,
        partition: &'p Partition,
        loan_id: LoanId,
    ) -> Result<&'p Loan> {
        partition
            .loans
            .get(&loan_id)
            .ok_or_else(|| self.missing(organization_id, loan_id, "loan"))
    }

    fn credit_line_facility(
        &self,
        organization_id: OrganizationId,
        credit_line_id: CreditLineId,
    ) -> Result<FacilityId> {
        let partition = self.store.load(organization_id)?;
        partition
            .credit_line(credit_line_id)
            .map(|line| line.facility_id)
            .ok_or_else(|| self.missing(organization_id, credit_line_id, "credit line"))
    }

    fn journal(&self, facility: &Facility, recorded_at: chrono::DateTime<chrono::Utc>) -> TransactionJournal {
        TransactionJournal::new(facility.organization_id, facility.bank_id, facility.id, recorded_at)
    }
}
