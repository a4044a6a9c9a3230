pub mod costs;
pub mod duty;
