pub mod config;
pub mod decimal;
pub mod entities;
pub mod errors;
pub mod hierarchy;
pub mod history;
pub mod interest;
pub mod ledger;
pub mod limits;
pub mod locks;
pub mod payments;
pub mod requests;
pub mod revolving;
pub mod store;
pub mod types;

// re-export key types
pub use config::LedgerConfig;
pub use decimal::{Money, Rate};
pub use entities::{Bank, CreditLine, Facility, FrozenRates, Loan, Payment};
pub use errors::{ErrorKind, LedgerError, Result};
pub use hierarchy::{
    BankNode, CreditLineNode, Exposure, FacilityNode, HierarchyResolver, HierarchySnapshot,
};
pub use history::{Transaction, TransactionJournal};
pub use interest::{
    AccrualEngine, BalanceCalculator, DayCountConvention, InterestCalculation, InterestCalculator,
    LoanBalance,
};
pub use ledger::Ledger;
pub use limits::{LimitEngine, LoanAdmission};
pub use payments::{PaymentAllocator, PaymentWaterfall};
pub use requests::{LoanRequest, NewBank, NewCreditLine, NewFacility, PaymentRequest};
pub use revolving::{RevolvingPeriodStatus, RevolvingPeriodTracker};
pub use store::{ChangeSet, LedgerStore, MemoryStore, Partition};
pub use types::{
    BankId, CreditLineId, FacilityId, FacilityType, LoanId, LoanStatus, OrganizationId, PaymentId,
    TransactionId, TransactionType, UtilizationState,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
