use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::entities::{Loan, Payment};
use crate::errors::Result;
use crate::interest::{AccrualEngine, InterestCalculation, InterestCalculator};
use crate::types::{LoanId, LoanStatus};

/// loan position as of a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanBalance {
    pub loan_id: LoanId,
    pub as_of: NaiveDate,
    pub principal: Money,
    pub total_rate: Rate,
    pub elapsed_days: u32,
    pub accrued_interest: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub outstanding_principal: Money,
    pub outstanding_interest: Money,
    pub outstanding_balance: Money,
    pub status: LoanStatus,
}

impl LoanBalance {
    pub fn total_paid(&self) -> Money {
        self.principal_paid + self.interest_paid
    }

    pub fn is_settled(&self) -> bool {
        self.status == LoanStatus::Settled
    }
}

/// reconciles accrued interest against recorded payments
#[derive(Debug, Clone, Copy)]
pub struct BalanceCalculator {
    engine: AccrualEngine,
}

impl BalanceCalculator {
    pub fn new(engine: AccrualEngine) -> Self {
        Self { engine }
    }

    /// simple interest from start to `as_of`, stopping at the due date or at settlement
    pub fn accrued_interest(&self, loan: &Loan, as_of: NaiveDate) -> Result<InterestCalculation> {
        let mut accrual_end = as_of.min(loan.due_date);
        if let Some(settled_on) = loan.settled_on {
            accrual_end = accrual_end.min(settled_on);
        }
        self.engine
            .calculate_interest(loan.amount, loan.rates.total_rate(), loan.start_date, accrual_end)
    }

    /// balance as of `as_of`, counting only payments dated on or before it
    pub fn balance<'a>(
        &self,
        loan: &Loan,
        payments: impl IntoIterator<Item = &'a Payment>,
        as_of: NaiveDate,
    ) -> Result<LoanBalance> {
        self.reconcile(
            loan,
            payments.into_iter().filter(|p| p.payment_date <= as_of),
            as_of,
        )
    }

    /// interest accrued to `as_of` against every recorded payment, whatever its date
    ///
    /// a backdated payment must still fit beside payments booked after it.
    pub fn position<'a>(
        &self,
        loan: &Loan,
        payments: impl IntoIterator<Item = &'a Payment>,
        as_of: NaiveDate,
    ) -> Result<LoanBalance> {
        self.reconcile(loan, payments, as_of)
    }

    fn reconcile<'a>(
        &self,
        loan: &Loan,
        payments: impl IntoIterator<Item = &'a Payment>,
        as_of: NaiveDate,
    ) -> Result<LoanBalance> {
        let accrual = self.accrued_interest(loan, as_of)?;

        let (principal_paid, interest_paid) = payments
            .into_iter()
            .filter(|p| p.loan_id == loan.id)
            .fold((Money::ZERO, Money::ZERO), |(principal, interest), p| {
                (principal + p.principal_amount, interest + p.interest_amount)
            });

        let outstanding_principal = loan.amount - principal_paid;
        let outstanding_interest = accrual.interest_amount - interest_paid;
        let outstanding_balance = loan.amount + accrual.interest_amount - (principal_paid + interest_paid);

        let settled_by_then = loan.status == LoanStatus::Settled
            && loan.settled_on.map_or(true, |settled_on| settled_on <= as_of);
        let status = if settled_by_then || !outstanding_balance.is_positive() {
            LoanStatus::Settled
        } else {
            LoanStatus::Active
        };

        Ok(LoanBalance {
            loan_id: loan.id,
            as_of,
            principal: loan.amount,
            total_rate: loan.rates.total_rate(),
            elapsed_days: accrual.days,
            accrued_interest: accrual.interest_amount,
            principal_paid,
            interest_paid,
            outstanding_principal,
            outstanding_interest,
            outstanding_balance,
            status,
        })
    }
}
