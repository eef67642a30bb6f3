/// quick start - one bank, one facility, one loan
use chrono::{NaiveDate, TimeZone, Utc};
use credit_ledger_rs::{
    FacilityType, Ledger, LedgerConfig, LoanRequest, Money, NewBank, NewFacility, Rate,
    SafeTimeProvider, TimeSource, Uuid,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    ));
    let ledger = Ledger::in_memory(LedgerConfig::default())?;
    let org = Uuid::new_v4();

    let bank = ledger.create_bank(
        org,
        NewBank {
            name: "Saudi National Bank".to_string(),
            code: "SNB".to_string(),
        },
        &time,
    )?;

    // 10m SAR revolving facility at 2.5% over sibor
    let facility = ledger.create_facility(
        org,
        NewFacility {
            bank_id: bank.id,
            facility_type: FacilityType::Revolving,
            credit_limit: Money::from_major(10_000_000),
            cost_of_funding: Rate::from_percent(dec!(2.5)),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            expiry_date: None,
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
            reference_number: "LN-2025-001".to_string(),
            amount: Money::from_major(6_000_000),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            charges_due_date: None,
            sibor_rate: Rate::from_percent(dec!(5.75)),
        },
        &time,
    )?;
    println!("drew {} at {}", loan.amount, loan.rates.total_rate());

    // print the hierarchy
    println!("{}", ledger.resolve_hierarchy(org)?.to_json_pretty()?);

    Ok(())
}
