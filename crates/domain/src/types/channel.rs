//! Channel configuration types
//!
//! A [`ChannelConfiguration`] binds one enterprise customer to one remote
//! learning system. Shared API paths live in the versioned
//! [`GlobalChannelConfiguration`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_PROVIDER_ID;
use crate::impl_domain_status_conversions;

/// Identifier of a supported integrated channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChannelCode {
    #[serde(rename = "sap")]
    SapSuccessFactors,
    #[serde(rename = "degreed")]
    Degreed,
}

impl_domain_status_conversions!(ChannelCode {
    SapSuccessFactors => "sap",
    Degreed => "degreed",
});

impl ChannelCode {
    /// Every channel known to this build.
    pub const ALL: [Self; 2] = [Self::SapSuccessFactors, Self::Degreed];
}

/// Enterprise customer that owns channel configurations and audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterpriseCustomer {
    pub uuid: Uuid,
    pub name: String,
}

/// SAP SuccessFactors OAuth client and tenant identifiers.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SapSuccessFactorsCredentials {
    pub key: String,
    pub secret: String,
    pub base_url: String,
    pub company_id: String,
    pub user_id: String,
    /// `user` or `admin`
    pub user_type: String,
}

impl fmt::Debug for SapSuccessFactorsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SapSuccessFactorsCredentials")
            .field("key", &self.key)
            .field("secret", &"***")
            .field("base_url", &self.base_url)
            .field("company_id", &self.company_id)
            .field("user_id", &self.user_id)
            .field("user_type", &self.user_type)
            .finish()
    }
}

/// Degreed OAuth client plus the service account used for the password grant.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreedCredentials {
    pub key: String,
    pub secret: String,
    pub base_url: String,
    pub company_id: String,
    pub user_id: String,
    pub user_password: String,
}

impl fmt::Debug for DegreedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DegreedCredentials")
            .field("key", &self.key)
            .field("secret", &"***")
            .field("base_url", &self.base_url)
            .field("company_id", &self.company_id)
            .field("user_id", &self.user_id)
            .field("user_password", &"***")
            .finish()
    }
}

/// Channel-specific credentials, tagged by channel code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel")]
pub enum ChannelCredentials {
    #[serde(rename = "sap")]
    SapSuccessFactors(SapSuccessFactorsCredentials),
    #[serde(rename = "degreed")]
    Degreed(DegreedCredentials),
}

impl ChannelCredentials {
    pub const fn channel_code(&self) -> ChannelCode {
        match self {
            Self::SapSuccessFactors(_) => ChannelCode::SapSuccessFactors,
            Self::Degreed(_) => ChannelCode::Degreed,
        }
    }
}

/// One customer's binding to one channel.
///
/// At most one configuration exists per (customer, channel). Configurations
/// are deactivated rather than deleted so their audit history stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfiguration {
    pub id: i64,
    pub customer: EnterpriseCustomer,
    pub active: bool,
    pub credentials: ChannelCredentials,
}

impl ChannelConfiguration {
    pub const fn channel_code(&self) -> ChannelCode {
        self.credentials.channel_code()
    }
}

impl fmt::Display for ChannelConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} configuration {} for enterprise {}>",
            self.channel_code(),
            self.id,
            self.customer.name
        )
    }
}

/// Versioned, channel-wide API settings.
///
/// Every save creates a new row; the newest `change_date` is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalChannelConfiguration {
    #[serde(default)]
    pub id: Option<i64>,
    pub channel_code: ChannelCode,
    pub completion_status_api_path: String,
    pub course_api_path: String,
    pub oauth_api_path: String,
    #[serde(default = "default_provider_id")]
    pub provider_id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "Utc::now")]
    pub change_date: DateTime<Utc>,
}

fn default_provider_id() -> String {
    DEFAULT_PROVIDER_ID.to_string()
}

const fn default_enabled() -> bool {
    true
}
