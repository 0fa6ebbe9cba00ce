//! Leave management: applications, types, the balance ledger, adjustments,
//! monetization and reports.

pub mod adjustments;
pub mod applications;
pub mod balances;
pub mod monetization;
pub mod reports;
pub mod types;
