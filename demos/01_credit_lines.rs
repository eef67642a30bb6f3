/// credit lines - sub-limits carved out of a facility
use chrono::{NaiveDate, TimeZone, Utc};
use credit_ledger_rs::{
    FacilityType, Ledger, LedgerConfig, LedgerError, LoanRequest, Money, NewBank, NewCreditLine,
    NewFacility, Rate, SafeTimeProvider, TimeSource, Uuid,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== credit lines example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    ));
    let ledger = Ledger::in_memory(LedgerConfig::default())?;
    let org = Uuid::new_v4();
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let bank = ledger.create_bank(
        org,
        NewBank {
            name: "Riyad Bank".to_string(),
            code: "RIBL".to_string(),
        },
        &time,
    )?;
    let facility = ledger.create_facility(
        org,
        NewFacility {
            bank_id: bank.id,
            facility_type: FacilityType::WorkingCapital,
            credit_limit: Money::from_major(5_000_000),
            cost_of_funding: Rate::from_percent(dec!(2.0)),
            start_date: start,
            expiry_date: NaiveDate::from_ymd_opt(2026, 12, 31),
            max_revolving_period_days: None,
            initial_drawdown_date: None,
        },
        &time,
    )?;

    let trade = ledger.create_credit_line(
        org,
        NewCreditLine {
            facility_id: facility.id,
            name: "trade finance".to_string(),
            credit_limit: Money::from_major(2_000_000),
        },
        &time,
    )?;
    println!("credit line '{}' limit {}", trade.name, trade.credit_limit);

    let request = |reference: &str, amount: i64| LoanRequest {
        facility_id: facility.id,
        credit_line_id: Some(trade.id),
        reference_number: reference.to_string(),
        amount: Money::from_major(amount),
        start_date: start,
        due_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        charges_due_date: None,
        sibor_rate: Rate::from_percent(dec!(5.5)),
    };

    ledger.create_loan(org, request("TF-001", 1_500_000), &time)?;

    // the line has 500,000 left even though the facility has 3,500,000
    match ledger.create_loan(org, request("TF-002", 800_000), &time) {
        Err(err @ LedgerError::InsufficientCreditLineCredit { .. }) => {
            println!("rejected: {err}");
        }
        other => println!("unexpected: {other:?}"),
    }

    let snapshot = ledger.resolve_hierarchy(org)?;
    if let Some(node) = snapshot.credit_line(trade.id) {
        println!(
            "line used {} available {} ({:?})",
            node.exposure.used,
            node.exposure.available,
            node.exposure.utilization_state()
        );
    }

    Ok(())
}
