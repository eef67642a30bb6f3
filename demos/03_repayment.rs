/// repayment - accrue interest, split a lump sum, settle the loan
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use credit_ledger_rs::{
    FacilityType, Ledger, LedgerConfig, LoanRequest, Money, NewBank, NewFacility, Rate,
    SafeTimeProvider, TimeSource, Uuid,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== repayment example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();
    let ledger = Ledger::in_memory(LedgerConfig::default())?;
    let org = Uuid::new_v4();

    let bank = ledger.create_bank(
        org,
        NewBank {
            name: "Alinma Bank".to_string(),
            code: "ALIN".to_string(),
        },
        &time,
    )?;
    let facility = ledger.create_facility(
        org,
        NewFacility {
            bank_id: bank.id,
            facility_type: FacilityType::Term,
            credit_limit: Money::from_major(10_000_000),
            cost_of_funding: Rate::from_percent(dec!(2.5)),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 1),
            max_revolving_period_days: None,
            initial_drawdown_date: None,
        },
        &time,
    )?;

    let loan = ledger.create_loan(
        org,
        LoanRequest {
            facility_id: facility.id,
            credit_line_id: None,
            reference_number: "TL-001".to_string(),
            amount: Money::from_major(1_000_000),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            charges_due_date: None,
            sibor_rate: Rate::from_percent(dec!(5.75)),
        },
        &time,
    )?;

    // half way through the tenor
    controller.advance(Duration::days(181));
    let balance = ledger.get_loan_balance_at(org, loan.id, &time)?;
    println!(
        "{}: accrued {} outstanding {}",
        balance.as_of, balance.accrued_interest, balance.outstanding_balance
    );

    // pay 300,000 interest first
    let split = ledger.allocate_payment(org, loan.id, Money::from_major(300_000), balance.as_of)?;
    println!("principal {} interest {}", split.principal_amount, split.interest_amount);
    ledger.record_payment(org, loan.id, split, &time)?;

    // settle at maturity
    controller.advance(Duration::days(184));
    let at_maturity = ledger.get_loan_balance_at(org, loan.id, &time)?;
    let payoff = ledger.allocate_payment(org, loan.id, at_maturity.outstanding_balance, at_maturity.as_of)?;
    ledger.record_payment(org, loan.id, payoff, &time)?;

    let settled = ledger.get_loan_balance_at(org, loan.id, &time)?;
    println!("status {:?}, outstanding {}", settled.status, settled.outstanding_balance);

    for transaction in ledger.transactions(org, Some(facility.id))? {
        println!("{:<12?} {:>14} {}", transaction.transaction_type, transaction.amount, transaction.description);
    }

    Ok(())
}
