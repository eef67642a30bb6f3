//! admissibility checks for draws and limit edits

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::hierarchy::{CreditLineNode, FacilityNode};
use crate::requests::LoanRequest;
use crate::revolving::RevolvingPeriodTracker;
use crate::store::Partition;

/// headroom left once an admitted loan is booked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanAdmission {
    pub facility_available_after: Money,
    pub credit_line_available_after: Option<Money>,
    pub revolving_days_remaining_after: Option<i64>,
}

pub struct LimitEngine;

impl LimitEngine {
    /// run every ceiling a new loan must clear, in order:
    /// facility credit, credit-line credit, revolving period, facility expiry
    pub fn check_loan(
        partition: &Partition,
        node: &FacilityNode,
        request: &LoanRequest,
    ) -> Result<LoanAdmission> {
        let facility = &node.facility;

        if partition.has_reference(request.reference_number.trim()) {
            return Err(LedgerError::DuplicateReference {
                reference: request.reference_number.clone(),
            });
        }
        if request.start_date < facility.start_date {
            return Err(LedgerError::validation(format!(
                "loan start date {} precedes facility start date {}",
                request.start_date, facility.start_date
            )));
        }

        let facility_available = node.exposure.available;
        if request.amount > facility_available {
            return Err(LedgerError::InsufficientFacilityCredit {
                available: facility_available,
                requested: request.amount,
                shortfall: request.amount - facility_available,
            });
        }

        let credit_line_available_after = match request.credit_line_id {
            Some(line_id) => {
                let line = Self::credit_line_of(partition, node, line_id)?;
                let available = line.exposure.available;
                if request.amount > available {
                    return Err(LedgerError::InsufficientCreditLineCredit {
                        available,
                        requested: request.amount,
                        shortfall: request.amount - available,
                    });
                }
                Some(available - request.amount)
            }
            None => None,
        };

        let revolving_days_remaining_after = RevolvingPeriodTracker::check_candidate(
            facility,
            partition.loans_for_facility(facility.id),
            request.start_date,
            request.due_date,
        )?;

        if let Some(expiry_date) = facility.expiry_date {
            if request.due_date > expiry_date {
                return Err(LedgerError::LoanExceedsFacilityExpiry {
                    due_date: request.due_date,
                    expiry_date,
                });
            }
        }

        Ok(LoanAdmission {
            facility_available_after: facility_available - request.amount,
            credit_line_available_after,
            revolving_days_remaining_after,
        })
    }

    /// a facility limit may not drop below what is already drawn
    pub fn check_facility_limit(node: &FacilityNode, new_limit: Money) -> Result<()> {
        if new_limit.is_negative() {
            return Err(LedgerError::validation(format!(
                "credit limit must not be negative, got {new_limit}"
            )));
        }
        Self::not_below_usage(new_limit, node.exposure.used)
    }

    /// a new credit line must fit inside the facility's remaining capacity
    pub fn check_new_credit_line(node: &FacilityNode, limit: Money) -> Result<()> {
        Self::within_facility(limit, node.exposure.available)
    }

    /// resizing a credit line: never below its usage, never past the facility's capacity
    pub fn check_credit_line_limit(
        node: &FacilityNode,
        line: &CreditLineNode,
        new_limit: Money,
    ) -> Result<()> {
        if new_limit.is_negative() {
            return Err(LedgerError::validation(format!(
                "credit limit must not be negative, got {new_limit}"
            )));
        }
        Self::not_below_usage(new_limit, line.exposure.used)?;
        // the line's own draws already sit inside the facility's usage
        Self::within_facility(new_limit, node.exposure.available + line.exposure.used)
    }

    fn not_below_usage(new_limit: Money, used: Money) -> Result<()> {
        if new_limit < used {
            return Err(LedgerError::DecreaseBelowUsage {
                new_limit,
                used,
                shortfall: used - new_limit,
            });
        }
        Ok(())
    }

    fn within_facility(limit: Money, capacity: Money) -> Result<()> {
        if limit > capacity {
            return Err(LedgerError::CreditLineExceedsFacility {
                available: capacity,
                requested: limit,
                shortfall: limit - capacity,
            });
        }
        Ok(())
    }

    fn credit_line_of<'a>(
        partition: &Partition,
        node: &'a FacilityNode,
        line_id: crate::types::CreditLineId,
    ) -> Result<&'a CreditLineNode> {
        if let Some(line) = node.credit_lines.iter().find(|c| c.credit_line.id == line_id) {
            return Ok(line);
        }
        match partition.credit_line(line_id) {
            Some(_) => Err(LedgerError::validation(format!(
                "credit line {line_id} does not belong to facility {}",
                node.facility.id
            ))),
            None => Err(LedgerError::NotFound {
                entity: "credit line",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::errors::ErrorKind;
    use crate::hierarchy::tests::{date, Fixture};
    use crate::hierarchy::HierarchyResolver;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn request(facility_id: Uuid, amount: i64) -> LoanRequest {
        LoanRequest {
            facility_id,
            credit_line_id: None,
            reference_number: format!("REQ-{}", Uuid::new_v4()),
            amount: Money::from_major(amount),
            start_date: date(2025, 1, 1),
            due_date: date(2025, 4, 1),
            charges_due_date: None,
            sibor_rate: Rate::from_percent(dec!(5.75)),
        }
    }

    fn node(fx: &Fixture, facility_id: Uuid) -> FacilityNode {
        HierarchyResolver::resolve_facility(&fx.partition, facility_id).unwrap()
    }

    #[test]
    fn test_exactly_reaching_the_limit_is_allowed() {
        let mut fx = Fixture::new();
        let facility = fx.facility(10_000_000);
        fx.loan(facility.id, None, 6_000_000, date(2025, 1, 1), date(2025, 4, 1));

        let node = node(&fx, facility.id);
        let over = LimitEngine::check_loan(&fx.partition, &node, &request(facility.id, 5_000_000));
        assert_eq!(
            over,
            Err(LedgerError::InsufficientFacilityCredit {
                available: Money::from_major(4_000_000),
                requested: Money::from_major(5_000_000),
                shortfall: Money::from_major(1_000_000),
            })
        );

        let exact = LimitEngine::check_loan(&fx.partition, &node, &request(facility.id, 4_000_000)).unwrap();
        assert_eq!(exact.facility_available_after, Money::ZERO);
    }

    #[test]
    fn test_credit_line_checked_in_addition_to_facility() {
        let mut fx = Fixture::new();
        let facility = fx.facility(10_000_000);
        let line = fx.credit_line(facility.id, 2_000_000);
        fx.loan(facility.id, Some(line.id), 1_500_000, date(2025, 1, 1), date(2025, 4, 1));

        let node = node(&fx, facility.id);
        let mut req = request(facility.id, 600_000);
        req.credit_line_id = Some(line.id);

        let err = LimitEngine::check_loan(&fx.partition, &node, &req).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientCreditLineCredit { .. }));
        assert_eq!(err.shortfall(), Some(Money::from_major(100_000)));

        req.amount = Money::from_major(500_000);
        let admission = LimitEngine::check_loan(&fx.partition, &node, &req).unwrap();
        assert_eq!(admission.credit_line_available_after, Some(Money::ZERO));
        assert_eq!(admission.facility_available_after, Money::from_major(8_000_000));
    }

    #[test]
    fn test_facility_ceiling_binds_credit_line_draws() {
        let mut fx = Fixture::new();
        let facility = fx.facility(1_000_000);
        let line = fx.credit_line(facility.id, 1_000_000);
        fx.loan(facility.id, None, 800_000, date(2025, 1, 1), date(2025, 4, 1));

        let node = node(&fx, facility.id);
        let mut req = request(facility.id, 300_000);
        req.credit_line_id = Some(line.id);

        assert!(matches!(
            LimitEngine::check_loan(&fx.partition, &node, &req),
            Err(LedgerError::InsufficientFacilityCredit { .. })
        ));
    }

    #[test]
    fn test_credit_line_of_another_facility() {
        let mut fx = Fixture::new();
        let facility = fx.facility(1_000_000);
        let other = fx.facility(1_000_000);
        let foreign_line = fx.credit_line(other.id, 500_000);

        let node = node(&fx, facility.id);
        let mut req = request(facility.id, 100);
        req.credit_line_id = Some(foreign_line.id);
        let err = LimitEngine::check_loan(&fx.partition, &node, &req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        req.credit_line_id = Some(Uuid::new_v4());
        let err = LimitEngine::check_loan(&fx.partition, &node, &req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_expiry_and_start_date() {
        let mut fx = Fixture::new();
        let facility = fx.facility(1_000_000);
        fx.partition.facilities.get_mut(&facility.id).unwrap().expiry_date = Some(date(2025, 3, 31));

        let node = node(&fx, facility.id);
        let err = LimitEngine::check_loan(&fx.partition, &node, &request(facility.id, 100)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::LoanExceedsFacilityExpiry {
                due_date: date(2025, 4, 1),
                expiry_date: date(2025, 3, 31),
            }
        );

        let mut early = request(facility.id, 100);
        early.start_date = date(2024, 12, 1);
        early.due_date = date(2025, 1, 15);
        assert!(matches!(
            LimitEngine::check_loan(&fx.partition, &node, &early),
            Err(LedgerError::Validation { .. })
        ));
    }

    #[test]
    fn test_due_date_on_expiry_is_allowed() {
        let mut fx = Fixture::new();
        let facility = fx.facility(1_000_000);
        fx.partition.facilities.get_mut(&facility.id).unwrap().expiry_date = Some(date(2025, 4, 1));

        let node = node(&fx, facility.id);
        assert!(LimitEngine::check_loan(&fx.partition, &node, &request(facility.id, 100)).is_ok());
    }

    #[test]
    fn test_duplicate_reference() {
        let mut fx = Fixture::new();
        let facility = fx.facility(1_000_000);
        let existing = fx.loan(facility.id, None, 100, date(2025, 1, 1), date(2025, 2, 1));

        let node = node(&fx, facility.id);
        let mut req = request(facility.id, 100);
        req.reference_number = existing.reference_number.clone();
        assert!(matches!(
            LimitEngine::check_loan(&fx.partition, &node, &req),
            Err(LedgerError::DuplicateReference { .. })
        ));
    }

    #[test]
    fn test_limit_reductions() {
        let mut fx = Fixture::new();
        let facility = fx.facility(10_000_000);
        let line = fx.credit_line(facility.id, 3_000_000);
        fx.loan(facility.id, Some(line.id), 2_000_000, date(2025, 1, 1), date(2025, 4, 1));
        fx.loan(facility.id, None, 5_000_000, date(2025, 1, 1), date(2025, 4, 1));

        let node = node(&fx, facility.id);
        let line_node = &node.credit_lines[0];

        assert_eq!(
            LimitEngine::check_facility_limit(&node, Money::from_major(6_000_000)),
            Err(LedgerError::DecreaseBelowUsage {
                new_limit: Money::from_major(6_000_000),
                used: Money::from_major(7_000_000),
                shortfall: Money::from_major(1_000_000),
            })
        );
        assert!(LimitEngine::check_facility_limit(&node, Money::from_major(7_000_000)).is_ok());

        assert!(matches!(
            LimitEngine::check_credit_line_limit(&node, line_node, Money::from_major(1_999_999)),
            Err(LedgerError::DecreaseBelowUsage { .. })
        ));
        // facility has 3,000,000 free plus the line's own 2,000,000
        assert!(LimitEngine::check_credit_line_limit(&node, line_node, Money::from_major(5_000_000)).is_ok());
        assert!(matches!(
            LimitEngine::check_credit_line_limit(&node, line_node, Money::from_major(5_000_001)),
            Err(LedgerError::CreditLineExceedsFacility { .. })
        ));

        assert!(LimitEngine::check_new_credit_line(&node, Money::from_major(3_000_000)).is_ok());
        assert!(LimitEngine::check_new_credit_line(&node, Money::from_major(3_000_001)).is_err());
    }
}
