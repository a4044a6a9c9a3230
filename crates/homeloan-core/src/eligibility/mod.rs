pub mod affordability;
pub mod evaluator;
pub mod policy;
pub mod profile;
pub mod rules;
