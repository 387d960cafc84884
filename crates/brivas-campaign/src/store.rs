//! Campaign persistence seam

use async_trait::async_trait;
use brivas_core::{BrivasError, CampaignId, Result};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use crate::campaign::{Campaign, CampaignPatch};

/// Where campaign records live
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn get(&self, id: &CampaignId) -> Result<Campaign>;

    /// Create or replace a campaign
    async fn put(&self, campaign: Campaign) -> Result<Campaign>;

    /// Apply a partial update and return the stored record
    async fn patch(&self, id: &CampaignId, patch: &CampaignPatch) -> Result<Campaign>;
}

/// Process-local campaign store
#[derive(Clone, Default)]
pub struct InMemoryCampaignStore {
    campaigns: Arc<DashMap<CampaignId, Campaign>>,
}

impl InMemoryCampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }
}

#[async_trait]
impl CampaignStore for InMemoryCampaignStore {
    async fn get(&self, id: &CampaignId) -> Result<Campaign> {
        self.campaigns
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BrivasError::NotFound(format!("campaign {}", id)))
    }

    async fn put(&self, mut campaign: Campaign) -> Result<Campaign> {
        campaign.updated_at = Utc::now();
        self.campaigns.insert(campaign.id.clone(), campaign.clone());
        tracing::debug!(campaign_id = %campaign.id, "Campaign stored");
        Ok(campaign)
    }

    async fn patch(&self, id: &CampaignId, patch: &CampaignPatch) -> Result<Campaign> {
        let mut entry = self
            .campaigns
            .get_mut(id)
            .ok_or_else(|| BrivasError::NotFound(format!("campaign {}", id)))?;

        let mut updated = entry.merged(patch);
        updated.updated_at = Utc::now();
        *entry = updated.clone();

        tracing::debug!(campaign_id = %id, "Campaign patched");
        Ok(updated)
    }
}
