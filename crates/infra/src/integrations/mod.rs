//! Remote learning system integrations

pub mod degreed;
pub(crate) mod oauth;
pub mod sap_success_factors;

pub use degreed::DegreedClient;
pub use sap_success_factors::SapSuccessFactorsClient;
