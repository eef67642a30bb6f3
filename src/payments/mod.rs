pub mod allocation;

use crate::decimal::Money;
use crate::entities::Loan;
use crate::errors::{LedgerError, Result};
use crate::interest::LoanBalance;
use crate::requests::PaymentRequest;

pub use allocation::{PaymentAllocator, PaymentWaterfall, WaterfallPriority};

/// admissibility of a payment against the loan's position on the payment date
pub fn check_payment(loan: &Loan, balance: &LoanBalance, request: &PaymentRequest) -> Result<()> {
    request.validate()?;

    if !loan.is_active() {
        return Err(LedgerError::LoanSettled { loan_id: loan.id });
    }
    if request.payment_date < loan.start_date {
        return Err(LedgerError::validation(format!(
            "payment date {} precedes loan start {}",
            request.payment_date, loan.start_date
        )));
    }

    check_component("principal", balance.outstanding_principal, request.principal_amount)?;
    check_component("interest", balance.outstanding_interest, request.interest_amount)?;
    Ok(())
}

fn check_component(component: &'static str, outstanding: Money, provided: Money) -> Result<()> {
    let outstanding = outstanding.max(Money::ZERO);
    if provided > outstanding {
        return Err(LedgerError::OverpaymentError {
            component,
            outstanding,
            provided,
            excess: provided - outstanding,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::tests::{date, Fixture};
    use crate::interest::{AccrualEngine, BalanceCalculator, DayCountConvention};

    fn setup() -> (Loan, LoanBalance) {
        let mut fx = Fixture::new();
        let facility = fx.facility(10_000_000);
        let loan = fx.loan(facility.id, None, 1_000_000, date(2025, 1, 1), date(2026, 1, 1));
        let calculator = BalanceCalculator::new(AccrualEngine::new(DayCountConvention::Actual365, 2));
        let balance = calculator.balance(&loan, [], date(2026, 1, 1)).unwrap();
        (loan, balance)
    }

    fn request(principal: i64, interest: i64) -> PaymentRequest {
        PaymentRequest {
            payment_date: date(2026, 1, 1),
            amount: Money::from_major(principal + interest),
            principal_amount: Money::from_major(principal),
            interest_amount: Money::from_major(interest),
        }
    }

    #[test]
    fn test_payoff_accepted() {
        let (loan, balance) = setup();
        assert!(check_payment(&loan, &balance, &request(1_000_000, 82_500)).is_ok());
    }

    #[test]
    fn test_overpayment_by_component() {
        let (loan, balance) = setup();

        let err = check_payment(&loan, &balance, &request(1_000_001, 0)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::OverpaymentError {
                component: "principal",
                outstanding: Money::from_major(1_000_000),
                provided: Money::from_major(1_000_001),
                excess: Money::from_major(1),
            }
        );

        let err = check_payment(&loan, &balance, &request(0, 90_000)).unwrap_err();
        assert_eq!(err.shortfall(), Some(Money::from_major(7_500)));
    }

    #[test]
    fn test_settled_loans_take_no_payments() {
        let (mut loan, balance) = setup();
        loan.settle(date(2026, 1, 1));
        assert!(matches!(
            check_payment(&loan, &balance, &request(1, 0)),
            Err(LedgerError::LoanSettled { .. })
        ));
    }

    #[test]
    fn test_payment_before_start_rejected() {
        let (loan, balance) = setup();
        let mut early = request(100, 0);
        early.payment_date = date(2024, 12, 31);
        assert!(matches!(
            check_payment(&loan, &balance, &early),
            Err(LedgerError::Validation { .. })
        ));
    }
}
