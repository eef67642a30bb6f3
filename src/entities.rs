use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{
    BankId, CreditLineId, FacilityId, FacilityType, LoanId, LoanStatus, OrganizationId, PaymentId,
};

/// lending bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    pub id: BankId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// bank-granted credit ceiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub organization_id: OrganizationId,
    pub bank_id: BankId,
    pub facility_type: FacilityType,
    pub credit_limit: Money,
    /// margin over the reference rate, copied onto each new loan
    pub cost_of_funding: Rate,
    pub start_date: NaiveDate,
    /// set only for fixed-duration facilities
    pub expiry_date: Option<NaiveDate>,
    /// lifetime cap on cumulative drawn days, when tracked
    pub max_revolving_period_days: Option<u32>,
    pub initial_drawdown_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Facility {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// sub-ceiling under a facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLine {
    pub id: CreditLineId,
    pub organization_id: OrganizationId,
    pub facility_id: FacilityId,
    pub name: String,
    pub credit_limit: Money,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CreditLine {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// pricing captured when a loan is drawn
///
/// fields are private so a loan's rates can only be set by [`FrozenRates::capture`];
/// later changes to the facility's cost of funding never reach existing loans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenRates {
    sibor_rate: Rate,
    bank_rate: Rate,
}

impl FrozenRates {
    /// snapshot the reference rate and the facility margin at draw time
    pub fn capture(sibor_rate: Rate, facility: &Facility) -> Self {
        Self {
            sibor_rate,
            bank_rate: facility.cost_of_funding,
        }
    }

    pub fn sibor_rate(&self) -> Rate {
        self.sibor_rate
    }

    pub fn bank_rate(&self) -> Rate {
        self.bank_rate
    }

    /// annual all-in rate
    pub fn total_rate(&self) -> Rate {
        self.sibor_rate + self.bank_rate
    }
}

/// drawn loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub organization_id: OrganizationId,
    pub facility_id: FacilityId,
    pub credit_line_id: Option<CreditLineId>,
    pub reference_number: String,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub charges_due_date: Option<NaiveDate>,
    pub rates: FrozenRates,
    pub status: LoanStatus,
    pub settled_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    /// days the loan spans, start to due
    pub fn tenor_days(&self) -> i64 {
        crate::interest::day_count(self.start_date, self.due_date)
    }

    /// mark settled; a settled loan stays settled
    pub fn settle(&mut self, on: NaiveDate) {
        if self.status == LoanStatus::Active {
            self.status = LoanStatus::Settled;
            self.settled_on = Some(on);
        }
    }
}

/// repayment booked against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub organization_id: OrganizationId,
    pub loan_id: LoanId,
    pub payment_date: NaiveDate,
    pub amount: Money,
    pub principal_amount: Money,
    pub interest_amount: Money,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn facility(cost_of_funding: Rate) -> Facility {
        Facility {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            bank_id: Uuid::new_v4(),
            facility_type: FacilityType::Revolving,
            credit_limit: Money::from_major(10_000_000),
            cost_of_funding,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            expiry_date: None,
            max_revolving_period_days: None,
            initial_drawdown_date: None,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_rates_frozen_at_capture() {
        let mut facility = facility(Rate::from_percent(dec!(2.5)));
        let rates = FrozenRates::capture(Rate::from_percent(dec!(5.75)), &facility);

        facility.cost_of_funding = Rate::from_percent(dec!(3.0));

        assert_eq!(rates.bank_rate(), Rate::from_percent(dec!(2.5)));
        assert_eq!(rates.total_rate().as_percentage(), dec!(8.25));
    }

    #[test]
    fn test_settlement_is_terminal() {
        let facility = facility(Rate::from_percent(dec!(2.5)));
        let mut loan = Loan {
            id: Uuid::new_v4(),
            organization_id: facility.organization_id,
            facility_id: facility.id,
            credit_line_id: None,
            reference_number: "LN-1".to_string(),
            amount: Money::from_major(1_000),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            charges_due_date: None,
            rates: FrozenRates::capture(Rate::from_percent(dec!(5.75)), &facility),
            status: LoanStatus::Active,
            settled_on: None,
            created_at: Utc::now(),
        };

        assert_eq!(loan.tenor_days(), 90);

        loan.settle(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        loan.settle(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());

        assert!(!loan.is_active());
        assert_eq!(loan.settled_on, NaiveDate::from_ymd_opt(2025, 3, 1));
    }
}
