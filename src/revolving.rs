//! cumulative revolving-period budget
//!
//! every loan ever drawn under a capped facility consumes its full tenor from a
//! lifetime budget of days. settling a loan does not give its days back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::{Facility, Loan};
use crate::errors::{LedgerError, Result};
use crate::interest::day_count;
use crate::types::FacilityId;

/// budget position of one facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevolvingPeriodStatus {
    pub facility_id: FacilityId,
    pub max_days: u32,
    pub consumed_days: i64,
    /// may be negative if the cap was lowered after draws
    pub remaining_days: i64,
    pub loan_count: usize,
}

impl RevolvingPeriodStatus {
    pub fn is_exhausted(&self) -> bool {
        self.remaining_days <= 0
    }
}

pub struct RevolvingPeriodTracker;

impl RevolvingPeriodTracker {
    /// days consumed by the given loans, settled ones included
    pub fn consumed_days<'a>(loans: impl IntoIterator<Item = &'a Loan>) -> i64 {
        loans.into_iter().map(|l| l.tenor_days().max(0)).sum()
    }

    /// budget status, `None` when the facility does not track a revolving period
    pub fn status<'a>(
        facility: &Facility,
        loans: impl IntoIterator<Item = &'a Loan>,
    ) -> Option<RevolvingPeriodStatus> {
        let max_days = facility.max_revolving_period_days?;
        let mut loan_count = 0;
        let consumed_days = Self::consumed_days(
            loans
                .into_iter()
                .filter(|l| l.facility_id == facility.id)
                .inspect(|_| loan_count += 1),
        );

        Some(RevolvingPeriodStatus {
            facility_id: facility.id,
            max_days,
            consumed_days,
            remaining_days: i64::from(max_days) - consumed_days,
            loan_count,
        })
    }

    /// admit a candidate draw spanning `start..due`, returning the budget left after it
    ///
    /// reaching exactly zero remaining is allowed.
    pub fn check_candidate<'a>(
        facility: &Facility,
        loans: impl IntoIterator<Item = &'a Loan>,
        start: NaiveDate,
        due: NaiveDate,
    ) -> Result<Option<i64>> {
        let Some(status) = Self::status(facility, loans) else {
            return Ok(None);
        };

        let requested_days = day_count(start, due);
        let remaining_days = status.remaining_days;
        if requested_days > remaining_days {
            return Err(LedgerError::RevolvingPeriodExceeded {
                remaining_days,
                requested_days,
                excess_days: requested_days - remaining_days,
            });
        }

        Ok(Some(remaining_days - requested_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::tests::{date, Fixture};

    #[test]
    fn test_untracked_facility_has_no_budget() {
        let mut fx = Fixture::new();
        let facility = fx.facility(1_000_000);

        let status = RevolvingPeriodTracker::status(&facility, fx.partition.loans.values());
        assert!(status.is_none());

        let admitted = RevolvingPeriodTracker::check_candidate(
            &facility,
            fx.partition.loans.values(),
            date(2025, 1, 1),
            date(2030, 1, 1),
        );
        assert_eq!(admitted, Ok(None));
    }

    #[test]
    fn test_budget_scenario() {
        let mut fx = Fixture::new();
        let mut facility = fx.facility(10_000_000);
        facility.max_revolving_period_days = Some(360);

        fx.loan(facility.id, None, 100_000, date(2025, 1, 1), date(2025, 4, 1));

        let status = RevolvingPeriodTracker::status(&facility, fx.partition.loans.values()).unwrap();
        assert_eq!(status.consumed_days, 90);
        assert_eq!(status.remaining_days, 270);

        // 300 days requested against 270 remaining
        let rejected = RevolvingPeriodTracker::check_candidate(
            &facility,
            fx.partition.loans.values(),
            date(2025, 4, 1),
            date(2026, 1, 26),
        );
        assert_eq!(
            rejected,
            Err(LedgerError::RevolvingPeriodExceeded {
                remaining_days: 270,
                requested_days: 300,
                excess_days: 30,
            })
        );

        // exactly 270 fits and leaves nothing
        let admitted = RevolvingPeriodTracker::check_candidate(
            &facility,
            fx.partition.loans.values(),
            date(2025, 4, 1),
            date(2025, 12, 27),
        );
        assert_eq!(admitted, Ok(Some(0)));
    }

    #[test]
    fn test_settled_loans_keep_consuming() {
        let mut fx = Fixture::new();
        let mut facility = fx.facility(10_000_000);
        facility.max_revolving_period_days = Some(100);

        let loan = fx.loan(facility.id, None, 100_000, date(2025, 1, 1), date(2025, 3, 2));
        let before = RevolvingPeriodTracker::status(&facility, fx.partition.loans.values()).unwrap();
        fx.settle(loan.id);
        let after = RevolvingPeriodTracker::status(&facility, fx.partition.loans.values()).unwrap();

        assert_eq!(before.remaining_days, 40);
        assert_eq!(after, before);
    }

    #[test]
    fn test_other_facilities_do_not_count() {
        let mut fx = Fixture::new();
        let mut capped = fx.facility(1_000_000);
        capped.max_revolving_period_days = Some(30);
        let other = fx.facility(1_000_000);

        fx.loan(other.id, None, 1_000, date(2025, 1, 1), date(2025, 12, 1));

        let status = RevolvingPeriodTracker::status(&capped, fx.partition.loans.values()).unwrap();
        assert_eq!(status.loan_count, 0);
        assert_eq!(status.remaining_days, 30);
        assert!(!status.is_exhausted());
    }
}
