use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;

use homeloan_core::eligibility::affordability::AffordabilityInput;
use homeloan_core::eligibility::policy::EligibilityPolicy;
use homeloan_core::eligibility::profile::EligibilityProfile;
use homeloan_core::result::{self, AdditionalPaymentInput, BondInput};
use homeloan_core::schedule::amortization::{self, ScheduleFrequency};
use homeloan_core::transfer::costs::{TransferCostConfig, TransferCostInput};
use homeloan_core::LoanParameters;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional JSON config, falling back to defaults.
fn parse_config<T: DeserializeOwned + Default>(config_json: Option<String>) -> NapiResult<T> {
    match config_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(&json).map_err(to_napi_error)
        }
        _ => Ok(T::default()),
    }
}

// ---------------------------------------------------------------------------
// Bond
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_bond(input_json: String) -> NapiResult<String> {
    let input: BondInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = result::calculate_bond(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String, yearly: Option<bool>) -> NapiResult<String> {
    let loan: LoanParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let frequency = if yearly.unwrap_or(false) {
        ScheduleFrequency::Yearly
    } else {
        ScheduleFrequency::Monthly
    };
    let schedule = amortization::generate(&loan, frequency).map_err(to_napi_error)?;
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

#[napi]
pub fn calculate_additional_payment(input_json: String) -> NapiResult<String> {
    let input: AdditionalPaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = result::calculate_additional_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_transfer_costs(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let input: TransferCostInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config: TransferCostConfig = parse_config(config_json)?;
    let output = result::calculate_transfer_costs(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_eligibility(
    profile_json: String,
    policy_json: Option<String>,
) -> NapiResult<String> {
    let profile: EligibilityProfile =
        serde_json::from_str(&profile_json).map_err(to_napi_error)?;
    let policy: EligibilityPolicy = parse_config(policy_json)?;
    let output = result::calculate_eligibility(&profile, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_affordability(input_json: String) -> NapiResult<String> {
    let input: AffordabilityInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = result::calculate_affordability(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
