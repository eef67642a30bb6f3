use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::interest::LoanBalance;
use crate::requests::PaymentRequest;

/// waterfall priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WaterfallPriority {
    First = 1,
    Second = 2,
}

/// order in which a lump sum is split across components
#[derive(Debug, Clone, Copy)]
pub struct PaymentWaterfall {
    pub interest_priority: WaterfallPriority,
    pub principal_priority: WaterfallPriority,
}

impl PaymentWaterfall {
    /// accrued interest first, remainder to principal
    pub fn interest_first() -> Self {
        Self {
            interest_priority: WaterfallPriority::First,
            principal_priority: WaterfallPriority::Second,
        }
    }

    /// principal first, remainder to interest
    pub fn principal_first() -> Self {
        Self {
            interest_priority: WaterfallPriority::Second,
            principal_priority: WaterfallPriority::First,
        }
    }
}

impl Default for PaymentWaterfall {
    fn default() -> Self {
        Self::interest_first()
    }
}

#[derive(Debug, Clone, Copy)]
enum PaymentComponent {
    Interest,
    Principal,
}

/// turns a lump sum into a split payment request
pub struct PaymentAllocator {
    waterfall: PaymentWaterfall,
}

impl PaymentAllocator {
    pub fn new(waterfall: PaymentWaterfall) -> Self {
        Self { waterfall }
    }

    /// split `amount` across the outstanding components of `balance`
    pub fn allocate(
        &self,
        balance: &LoanBalance,
        amount: Money,
        payment_date: NaiveDate,
    ) -> Result<PaymentRequest> {
        if !amount.is_positive() {
            return Err(LedgerError::validation(format!(
                "payment amount must be positive, got {amount}"
            )));
        }
        let outstanding = balance.outstanding_balance.max(Money::ZERO);
        if amount > outstanding {
            return Err(LedgerError::OverpaymentError {
                component: "balance",
                outstanding,
                provided: amount,
                excess: amount - outstanding,
            });
        }

        let mut priorities = [
            (self.waterfall.interest_priority, PaymentComponent::Interest),
            (self.waterfall.principal_priority, PaymentComponent::Principal),
        ];
        priorities.sort_by_key(|&(priority, _)| priority);

        let mut remaining = amount;
        let mut principal_amount = Money::ZERO;
        let mut interest_amount = Money::ZERO;
        for (_, component) in priorities {
            let (due, applied) = match component {
                PaymentComponent::Interest => (balance.outstanding_interest, &mut interest_amount),
                PaymentComponent::Principal => (balance.outstanding_principal, &mut principal_amount),
            };
            let take = remaining.min(due.max(Money::ZERO));
            *applied = take;
            remaining -= take;
        }

        Ok(PaymentRequest {
            payment_date,
            amount,
            principal_amount,
            interest_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::types::LoanStatus;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn balance(principal: i64, interest: i64) -> LoanBalance {
        LoanBalance {
            loan_id: Uuid::new_v4(),
            as_of: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            principal: Money::from_major(principal),
            total_rate: Rate::from_percentage(8),
            elapsed_days: 151,
            accrued_interest: Money::from_major(interest),
            principal_paid: Money::ZERO,
            interest_paid: Money::ZERO,
            outstanding_principal: Money::from_major(principal),
            outstanding_interest: Money::from_major(interest),
            outstanding_balance: Money::from_major(principal + interest),
            status: LoanStatus::Active,
        }
    }

    #[test]
    fn test_interest_first_split() {
        let allocator = PaymentAllocator::new(PaymentWaterfall::interest_first());
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let request = allocator.allocate(&balance(10_000, 300), Money::from_major(1_000), date).unwrap();
        assert_eq!(request.interest_amount, Money::from_major(300));
        assert_eq!(request.principal_amount, Money::from_major(700));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_principal_first_split() {
        let allocator = PaymentAllocator::new(PaymentWaterfall::principal_first());
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let request = allocator.allocate(&balance(500, 300), Money::from_major(600), date).unwrap();
        assert_eq!(request.principal_amount, Money::from_major(500));
        assert_eq!(request.interest_amount, Money::from_major(100));
    }

    #[test]
    fn test_lump_sum_above_balance() {
        let allocator = PaymentAllocator::new(PaymentWaterfall::default());
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let err = allocator.allocate(&balance(500, 300), Money::from_major(900), date).unwrap_err();
        assert_eq!(err.shortfall(), Some(Money::from_major(100)));
    }
}
