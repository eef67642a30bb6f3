use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::interest::{InterestCalculation, InterestCalculator};

/// day count convention for interest calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DayCountConvention {
    /// actual days / 365
    Actual365,
    /// actual days / 360
    Actual360,
}

/// actual calendar days from `start` to `end`, negative when `end` precedes `start`
pub fn day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// simple-interest accrual engine
#[derive(Debug, Clone, Copy)]
pub struct AccrualEngine {
    pub convention: DayCountConvention,
    pub decimal_places: u32,
}

impl AccrualEngine {
    pub fn new(convention: DayCountConvention, decimal_places: u32) -> Self {
        Self {
            convention,
            decimal_places,
        }
    }

    /// elapsed days between dates, clamped at zero
    pub fn calculate_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        day_count(start, end).max(0) as u32
    }

    /// year basis for the convention
    pub fn year_basis(&self) -> u32 {
        match self.convention {
            DayCountConvention::Actual365 => 365,
            DayCountConvention::Actual360 => 360,
        }
    }

    /// principal x rate x days / basis, unrounded
    ///
    /// multiplies before dividing so whole-year periods stay exact.
    pub fn calculate_simple_interest(&self, principal: Money, annual_rate: Rate, days: u32) -> Money {
        let numerator = principal.as_decimal() * annual_rate.as_decimal() * Decimal::from(days);
        Money::from_decimal(numerator / Decimal::from(self.year_basis()))
    }
}

impl InterestCalculator for AccrualEngine {
    fn calculate_interest(
        &self,
        principal: Money,
        rate: Rate,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<InterestCalculation> {
        if principal.is_negative() {
            return Err(LedgerError::validation(format!(
                "interest principal must not be negative, got {principal}"
            )));
        }
        if rate.is_negative() {
            return Err(LedgerError::validation(format!(
                "interest rate must not be negative, got {rate}"
            )));
        }

        let days = self.calculate_days(start_date, end_date);
        let interest = self
            .calculate_simple_interest(principal, rate, days)
            .round_dp(self.decimal_places);

        Ok(InterestCalculation {
            interest_amount: interest,
            annual_rate: rate,
            days,
        })
    }
}
