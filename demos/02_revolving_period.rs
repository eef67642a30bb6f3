/// revolving period - a lifetime budget of drawn days
use chrono::{NaiveDate, TimeZone, Utc};
use credit_ledger_rs::{
    FacilityType, Ledger, LedgerConfig, LoanRequest, Money, NewBank, NewFacility, Rate,
    SafeTimeProvider, TimeSource, Uuid,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== revolving period example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    ));
    let ledger = Ledger::in_memory(LedgerConfig::default())?;
    let org = Uuid::new_v4();
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

    let bank = ledger.create_bank(
        org,
        NewBank {
            name: "Banque Saudi Fransi".to_string(),
            code: "BSFR".to_string(),
        },
        &time,
    )?;
    let facility = ledger.create_facility(
        org,
        NewFacility {
            bank_id: bank.id,
            facility_type: FacilityType::Revolving,
            credit_limit: Money::from_major(10_000_000),
            cost_of_funding: Rate::from_percent(dec!(2.5)),
            start_date: date(2025, 1, 1),
            expiry_date: None,
            max_revolving_period_days: Some(360),
            initial_drawdown_date: None,
        },
        &time,
    )?;

    let draw = |reference: &str, start: NaiveDate, due: NaiveDate| LoanRequest {
        facility_id: facility.id,
        credit_line_id: None,
        reference_number: reference.to_string(),
        amount: Money::from_major(100_000),
        start_date: start,
        due_date: due,
        charges_due_date: None,
        sibor_rate: Rate::from_percent(dec!(5.75)),
    };

    // 90 days
    ledger.create_loan(org, draw("RV-001", date(2025, 1, 1), date(2025, 4, 1)), &time)?;
    if let Some(status) = ledger.revolving_status(org, facility.id)? {
        println!("consumed {} of {} days", status.consumed_days, status.max_days);
    }

    // 300 days against 270 remaining
    if let Err(err) = ledger.create_loan(org, draw("RV-002", date(2025, 4, 1), date(2026, 1, 26)), &time) {
        println!("rejected: {err}");
    }

    // exactly 270 days
    ledger.create_loan(org, draw("RV-003", date(2025, 4, 1), date(2025, 12, 27)), &time)?;
    if let Some(status) = ledger.revolving_status(org, facility.id)? {
        println!("remaining {} days, exhausted: {}", status.remaining_days, status.is_exhausted());
    }

    Ok(())
}
