pub mod bond;
pub mod eligibility;
pub mod transfer;
