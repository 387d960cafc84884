//! Core domain identifiers shared across campaign services

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Outbound campaign identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub String);

impl CampaignId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CampaignId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Account identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_id_serializes_as_plain_string() {
        let id = CampaignId::new("camp-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"camp-42\"");
        assert_eq!(id.to_string(), "camp-42");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(CampaignId::generate(), CampaignId::generate());
    }
}
