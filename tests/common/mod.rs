#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use credit_ledger_rs::{
    Facility, FacilityType, Ledger, LedgerConfig, LedgerStore, LoanRequest, Money, NewBank,
    NewFacility, OrganizationId, Rate, SafeTimeProvider, TimeSource, Uuid,
};
use rust_decimal_macros::dec;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn clock() -> SafeTimeProvider {
    SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap()))
}

pub fn memory_ledger() -> Ledger {
    Ledger::in_memory(LedgerConfig::default()).unwrap()
}

/// one organization with a single bank
pub fn organization<S: LedgerStore>(ledger: &Ledger<S>, time: &SafeTimeProvider) -> (OrganizationId, Uuid) {
    let org = Uuid::new_v4();
    let bank = ledger
        .create_bank(
            org,
            NewBank {
                name: "Arab National Bank".to_string(),
                code: "ARNB".to_string(),
            },
            time,
        )
        .unwrap();
    (org, bank.id)
}

pub fn new_facility(bank_id: Uuid, limit: i64) -> NewFacility {
    NewFacility {
        bank_id,
        facility_type: FacilityType::Revolving,
        credit_limit: Money::from_major(limit),
        cost_of_funding: Rate::from_percent(dec!(2.5)),
        start_date: date(2025, 1, 1),
        expiry_date: None,
        max_revolving_period_days: None,
        initial_drawdown_date: None,
    }
}

pub fn facility<S: LedgerStore>(
    ledger: &Ledger<S>,
    org: OrganizationId,
    bank_id: Uuid,
    limit: i64,
    time: &SafeTimeProvider,
) -> Facility {
    ledger.create_facility(org, new_facility(bank_id, limit), time).unwrap()
}

pub fn loan_request(facility_id: Uuid, reference: &str, amount: i64) -> LoanRequest {
    LoanRequest {
        facility_id,
        credit_line_id: None,
        reference_number: reference.to_string(),
        amount: Money::from_major(amount),
        start_date: date(2025, 1, 1),
        due_date: date(2026, 1, 1),
        charges_due_date: None,
        sibor_rate: Rate::from_percent(dec!(5.75)),
    }
}
