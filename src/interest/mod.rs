pub mod accrual;
pub mod balance;

use chrono::NaiveDate;

use crate::decimal::{Money, Rate};
use crate::errors::Result;

pub use accrual::{day_count, AccrualEngine, DayCountConvention};
pub use balance::{BalanceCalculator, LoanBalance};

/// interest calculation result
#[derive(Debug, Clone, PartialEq)]
pub struct InterestCalculation {
    pub interest_amount: Money,
    pub annual_rate: Rate,
    pub days: u32,
}

/// trait for interest calculations
pub trait InterestCalculator {
    fn calculate_interest(
        &self,
        principal: Money,
        rate: Rate,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<InterestCalculation>;
}
