//! bank -> facility -> credit line -> loan tree with exposure aggregates

use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::entities::{Bank, CreditLine, Facility, Loan};
use crate::errors::{LedgerError, Result};
use crate::store::Partition;
use crate::types::{CreditLineId, FacilityId, OrganizationId, UtilizationState};

/// limit, usage and headroom of one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exposure {
    pub credit_limit: Money,
    pub used: Money,
    pub available: Money,
    /// used / limit
    pub utilization: Rate,
}

impl Exposure {
    pub fn new(credit_limit: Money, used: Money) -> Self {
        Self {
            credit_limit,
            used,
            available: credit_limit - used,
            utilization: used.ratio_of(credit_limit),
        }
    }

    pub fn utilization_state(&self) -> UtilizationState {
        UtilizationState::from_rate(self.utilization)
    }

    fn combine(self, other: Exposure) -> Exposure {
        Exposure::new(self.credit_limit + other.credit_limit, self.used + other.used)
    }
}

impl Default for Exposure {
    fn default() -> Self {
        Exposure::new(Money::ZERO, Money::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLineNode {
    pub credit_line: CreditLine,
    pub loans: Vec<Loan>,
    pub exposure: Exposure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityNode {
    pub facility: Facility,
    pub credit_lines: Vec<CreditLineNode>,
    /// active loans drawn directly against the facility
    pub direct_loans: Vec<Loan>,
    pub exposure: Exposure,
}

impl FacilityNode {
    /// sum of the credit-line sub-limits carved out of this facility
    pub fn allocated_to_credit_lines(&self) -> Money {
        self.credit_lines.iter().map(|c| c.credit_line.credit_limit).sum()
    }

    pub fn active_loan_count(&self) -> usize {
        self.direct_loans.len() + self.credit_lines.iter().map(|c| c.loans.len()).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankNode {
    pub bank: Bank,
    pub facilities: Vec<FacilityNode>,
    pub exposure: Exposure,
}

/// point-in-time view of an organization's credit hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchySnapshot {
    pub organization_id: OrganizationId,
    pub banks: Vec<BankNode>,
    pub totals: Exposure,
}

impl HierarchySnapshot {
    pub fn facility(&self, id: FacilityId) -> Option<&FacilityNode> {
        self.facilities().find(|f| f.facility.id == id)
    }

    pub fn credit_line(&self, id: CreditLineId) -> Option<&CreditLineNode> {
        self.facilities()
            .flat_map(|f| f.credit_lines.iter())
            .find(|c| c.credit_line.id == id)
    }

    /// bank codes compare case-insensitively
    pub fn bank_by_code(&self, code: &str) -> Option<&BankNode> {
        self.banks.iter().find(|b| b.bank.code.eq_ignore_ascii_case(code))
    }

    pub fn facilities(&self) -> impl Iterator<Item = &FacilityNode> {
        self.banks.iter().flat_map(|b| b.facilities.iter())
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// builds [`HierarchySnapshot`]s from a partition
pub struct HierarchyResolver;

impl HierarchyResolver {
    /// resolve the full tree; errors when the organization owns no banks or facilities
    pub fn resolve(partition: &Partition) -> Result<HierarchySnapshot> {
        if partition.is_empty() {
            return Err(LedgerError::NotFound {
                entity: "organization",
            });
        }

        let mut banks: Vec<&Bank> = partition.banks.values().collect();
        banks.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let mut bank_nodes = Vec::with_capacity(banks.len());
        for bank in banks {
            let mut facilities: Vec<&Facility> = partition
                .facilities
                .values()
                .filter(|f| f.bank_id == bank.id && !f.is_deleted())
                .collect();
            facilities.sort_by_key(|f| (f.start_date, f.created_at, f.id));

            let facility_nodes: Vec<FacilityNode> = facilities
                .into_iter()
                .map(|f| Self::facility_node(partition, f))
                .collect();
            let exposure = facility_nodes
                .iter()
                .fold(Exposure::default(), |acc, f| acc.combine(f.exposure));

            bank_nodes.push(BankNode {
                bank: bank.clone(),
                facilities: facility_nodes,
                exposure,
            });
        }

        let totals = bank_nodes
            .iter()
            .fold(Exposure::default(), |acc, b| acc.combine(b.exposure));

        Ok(HierarchySnapshot {
            organization_id: partition.organization_id,
            banks: bank_nodes,
            totals,
        })
    }

    /// resolve a single facility subtree
    pub fn resolve_facility(partition: &Partition, facility_id: FacilityId) -> Result<FacilityNode> {
        let facility = partition
            .facility(facility_id)
            .ok_or(LedgerError::NotFound { entity: "facility" })?;
        Ok(Self::facility_node(partition, facility))
    }

    fn facility_node(partition: &Partition, facility: &Facility) -> FacilityNode {
        let mut active: Vec<&Loan> = partition
            .loans_for_facility(facility.id)
            .filter(|l| l.is_active())
            .collect();
        active.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.reference_number.cmp(&b.reference_number))
        });

        let mut credit_lines: Vec<&CreditLine> = partition
            .credit_lines
            .values()
            .filter(|c| c.facility_id == facility.id && !c.is_deleted())
            .collect();
        credit_lines.sort_by_key(|c| (c.created_at, c.id));

        let credit_line_nodes: Vec<CreditLineNode> = credit_lines
            .into_iter()
            .map(|line| {
                let loans: Vec<Loan> = active
                    .iter()
                    .filter(|l| l.credit_line_id == Some(line.id))
                    .map(|l| (*l).clone())
                    .collect();
                let used: Money = loans.iter().map(|l| l.amount).sum();
                CreditLineNode {
                    credit_line: line.clone(),
                    exposure: Exposure::new(line.credit_limit, used),
                    loans,
                }
            })
            .collect();

        // loans pointing at a deleted line still count against the facility
        let direct_loans: Vec<Loan> = active
            .iter()
            .filter(|l| match l.credit_line_id {
                None => true,
                Some(id) => !credit_line_nodes.iter().any(|c| c.credit_line.id == id),
            })
            .map(|l| (*l).clone())
            .collect();

        let direct_used: Money = direct_loans.iter().map(|l| l.amount).sum();
        let lines_used: Money = credit_line_nodes.iter().map(|c| c.exposure.used).sum();

        FacilityNode {
            facility: facility.clone(),
            exposure: Exposure::new(facility.credit_limit, direct_used + lines_used),
            credit_lines: credit_line_nodes,
            direct_loans,
        }
    }
}
