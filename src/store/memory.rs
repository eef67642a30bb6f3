use std::collections::{HashMap, HashSet};

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::error;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::store::{ChangeSet, LedgerStore, Partition};
use crate::types::OrganizationId;

/// in-process ledger store
///
/// loads clone a partition under a read lock, so every read sees one
/// committed state. commits validate guards and apply under the write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    partitions: RwLock<HashMap<OrganizationId, Partition>>,
    owners: DashMap<Uuid, OrganizationId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_ids(&self, organization_id: OrganizationId, changes: &ChangeSet) -> Result<Vec<Uuid>> {
        let ids: Vec<Uuid> = changes
            .banks
            .iter()
            .map(|b| b.id)
            .chain(changes.facilities.iter().map(|f| f.id))
            .chain(changes.credit_lines.iter().map(|c| c.id))
            .chain(changes.loans.iter().map(|l| l.id))
            .chain(changes.payments.iter().map(|p| p.id))
            .collect();

        for id in &ids {
            let owner = self.owners.get(id).map(|owner| *owner);
            if let Some(owner) = owner.filter(|owner| *owner != organization_id) {
                error!(%id, %owner, %organization_id, "commit touches a row owned by another organization");
                return Err(LedgerError::TenantMismatch { entity: "record" });
            }
        }
        Ok(ids)
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self, organization_id: OrganizationId) -> Result<Partition> {
        let partitions = self.partitions.read();
        Ok(partitions
            .get(&organization_id)
            .cloned()
            .unwrap_or_else(|| Partition::new(organization_id)))
    }

    fn commit(&self, organization_id: OrganizationId, changes: ChangeSet) -> Result<()> {
        if let Some(id) = changes.foreign_row(organization_id) {
            error!(%id, %organization_id, "change set carries a row for another organization");
            return Err(LedgerError::TenantMismatch { entity: "record" });
        }

        let mut partitions = self.partitions.write();
        let ids = self.claim_ids(organization_id, &changes)?;
        let partition = partitions
            .entry(organization_id)
            .or_insert_with(|| Partition::new(organization_id));

        for (facility_id, version) in &changes.guards {
            if partition.version_of(*facility_id) != *version {
                return Err(LedgerError::ConsistencyFailure);
            }
        }

        for (n, loan) in changes.loans.iter().enumerate() {
            let taken = partition
                .loans
                .values()
                .any(|l| l.id != loan.id && l.reference_number == loan.reference_number)
                || changes.loans[..n]
                    .iter()
                    .any(|l| l.reference_number == loan.reference_number);
            if taken {
                return Err(LedgerError::DuplicateReference {
                    reference: loan.reference_number.clone(),
                });
            }
        }

        if changes.payments.iter().any(|p| partition.payments.contains_key(&p.id)) {
            return Err(LedgerError::validation("payments are insert-only"));
        }
        if !changes.transactions.is_empty() {
            let existing: HashSet<Uuid> = partition.transactions.iter().map(|t| t.id).collect();
            if changes.transactions.iter().any(|t| existing.contains(&t.id)) {
                return Err(LedgerError::validation("transactions are append-only"));
            }
        }

        let touched = changes.touched_facilities();

        for bank in changes.banks {
            partition.banks.insert(bank.id, bank);
        }
        for facility in changes.facilities {
            partition.facilities.insert(facility.id, facility);
        }
        for credit_line in changes.credit_lines {
            partition.credit_lines.insert(credit_line.id, credit_line);
        }
        for loan in changes.loans {
            partition.loans.insert(loan.id, loan);
        }
        for payment in changes.payments {
            partition.payments.insert(payment.id, payment);
        }
        partition.transactions.extend(changes.transactions);

        for facility_id in touched {
            *partition.versions.entry(facility_id).or_insert(0) += 1;
        }
        for id in ids {
            self.owners.insert(id, organization_id);
        }

        Ok(())
    }

    fn owner_of(&self, id: Uuid) -> Option<OrganizationId> {
        self.owners.get(&id).map(|owner| *owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::entities::Bank;
    use crate::hierarchy::tests::{date, Fixture};
    use crate::history::Transaction;
    use crate::types::TransactionType;
    use chrono::{NaiveDate, Utc};

    fn bank(organization_id: OrganizationId) -> Bank {
        Bank {
            id: Uuid::new_v4(),
            organization_id,
            name: "Riyad Bank".to_string(),
            code: "RIBL".to_string(),
            created_at: Utc::now(),
        }
    }

    fn transaction(organization_id: OrganizationId, facility_id: Uuid) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            organization_id,
            bank_id: Uuid::new_v4(),
            facility_id,
            loan_id: None,
            transaction_type: TransactionType::Other,
            amount: Money::ZERO,
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            description: "note".to_string(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_partitions_are_isolated() {
        let store = MemoryStore::new();
        let org_a = Uuid::new_v4();
        let org_b = Uuid::new_v4();
        let a_bank = bank(org_a);

        store.commit(org_a, ChangeSet::new().put_bank(a_bank.clone())).unwrap();

        assert_eq!(store.load(org_a).unwrap().banks.len(), 1);
        assert!(store.load(org_b).unwrap().is_empty());
        assert_eq!(store.owner_of(a_bank.id), Some(org_a));
    }

    #[test]
    fn test_foreign_rows_rejected() {
        let store = MemoryStore::new();
        let org_a = Uuid::new_v4();
        let org_b = Uuid::new_v4();
        let a_bank = bank(org_a);
        store.commit(org_a, ChangeSet::new().put_bank(a_bank.clone())).unwrap();

        // row labelled for b but committed into a
        let result = store.commit(org_a, ChangeSet::new().put_bank(bank(org_b)));
        assert!(matches!(result, Err(LedgerError::TenantMismatch { .. })));

        // a's id re-used under b
        let mut stolen = a_bank;
        stolen.organization_id = org_b;
        let result = store.commit(org_b, ChangeSet::new().put_bank(stolen));
        assert!(matches!(result, Err(LedgerError::TenantMismatch { .. })));
    }

    #[test]
    fn test_stale_guard_conflicts() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let facility_id = Uuid::new_v4();

        let before = store.load(org).unwrap().version_of(facility_id);
        store
            .commit(org, ChangeSet::new().guard(facility_id, before).append([transaction(org, facility_id)]))
            .unwrap();

        let after = store.load(org).unwrap();
        assert_eq!(after.version_of(facility_id), before + 1);

        let stale = ChangeSet::new()
            .guard(facility_id, before)
            .append([transaction(org, facility_id)]);
        assert_eq!(store.commit(org, stale), Err(LedgerError::ConsistencyFailure));
        assert_eq!(store.load(org).unwrap().transactions.len(), 1);
    }

    #[test]
    fn test_transactions_append_only() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let row = transaction(org, Uuid::new_v4());

        store.commit(org, ChangeSet::new().append([row.clone()])).unwrap();

        let mut rewritten = row;
        rewritten.amount = Money::from_major(1);
        assert!(store.commit(org, ChangeSet::new().append([rewritten])).is_err());
        assert_eq!(store.load(org).unwrap().transactions[0].amount, Money::ZERO);
    }

    #[test]
    fn test_loan_references_are_unique_per_organization() {
        let mut fx = Fixture::new();
        let facility = fx.facility(1_000_000);
        let other = fx.facility(1_000_000);
        let store = MemoryStore::new();
        let org = fx.partition.organization_id;

        let first = fx.loan(facility.id, None, 100, date(2025, 1, 1), date(2025, 6, 1));
        let mut second = fx.loan(other.id, None, 100, date(2025, 1, 1), date(2025, 6, 1));
        second.reference_number = first.reference_number.clone();

        store.commit(org, ChangeSet::new().put_loan(first.clone())).unwrap();
        assert!(matches!(
            store.commit(org, ChangeSet::new().put_loan(second)),
            Err(LedgerError::DuplicateReference { .. })
        ));

        // rewriting the same loan keeps its reference
        let mut settled = first;
        settled.settle(date(2025, 6, 1));
        store.commit(org, ChangeSet::new().put_loan(settled)).unwrap();
        assert_eq!(store.load(org).unwrap().loans.len(), 1);
    }
}
