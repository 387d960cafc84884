//! Campaign records and pending-change overlays

use brivas_core::{AccountId, BrivasError, CampaignId, Result};
use brivas_sms::{compute_segmentation, SegmentationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::retry::{days_are_contiguous, Cooldown, RetryConfig, RetryPattern, RetryStrategy};
use crate::template::to_display_syntax;

pub(crate) const INCOMPLETE_RETRY: &str = "retry strategy requires at least one pattern or delay";

/// Outbound campaign as persisted by the campaign API.
/// SMS content is stored in delivery syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    pub name: String,
    #[serde(default)]
    pub sms_enabled: bool,
    /// Message type -> content
    #[serde(default)]
    pub sms_content: BTreeMap<String, String>,
    /// Message types that are sent
    #[serde(default)]
    pub sms_types: Vec<String>,
    #[serde(default)]
    pub sms_company_name: Option<String>,
    #[serde(default)]
    pub retry_strategy: RetryStrategy,
    #[serde(default)]
    pub retry_patterns: Vec<RetryPattern>,
    #[serde(default)]
    pub retry_delays: Vec<u32>,
    #[serde(default)]
    pub retry_settings: Option<Cooldown>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn new(id: CampaignId, name: impl Into<String>) -> Self {
        Self {
            id,
            account_id: None,
            name: name.into(),
            sms_enabled: false,
            sms_content: BTreeMap::new(),
            sms_types: Vec::new(),
            sms_company_name: None,
            retry_strategy: RetryStrategy::default(),
            retry_patterns: Vec::new(),
            retry_delays: Vec::new(),
            retry_settings: None,
            updated_at: Utc::now(),
        }
    }

    pub fn company_name(&self) -> &str {
        self.sms_company_name.as_deref().unwrap_or_default()
    }

    /// Retry fields gathered into an editable config
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            strategy: self.retry_strategy,
            patterns: self.retry_patterns.clone(),
            delays: self.retry_delays.clone(),
            delays_input: None,
            cooldown: self.retry_settings.unwrap_or_default(),
        }
    }

    /// Size feedback for one message type under this record's sender label
    pub fn sms_preview(&self, message_type: &str) -> SegmentationResult {
        let body = self
            .sms_content
            .get(message_type)
            .map(|text| to_display_syntax(text))
            .unwrap_or_default();
        compute_segmentation(&body, self.company_name())
    }

    /// Why this record cannot be stored, if it cannot
    pub fn check(&self) -> Result<()> {
        check_retry_bounds(&self.retry_patterns, self.retry_settings.as_ref())?;

        if !self.retry_config().can_save() {
            return Err(BrivasError::Validation(INCOMPLETE_RETRY.to_string()));
        }

        for message_type in &self.sms_types {
            let preview = self.sms_preview(message_type);
            if !preview.within_limit() {
                return Err(BrivasError::Validation(format!(
                    "sms content for {} is {} characters, limit is {}",
                    message_type,
                    preview.current_length,
                    preview.editable_limit()
                )));
            }
        }
        Ok(())
    }

    /// New record with `patch` laid over this one
    pub fn merged(&self, patch: &CampaignPatch) -> Campaign {
        let mut merged = self.clone();
        if let Some(name) = &patch.name {
            merged.name = name.clone();
        }
        if let Some(enabled) = patch.sms_enabled {
            merged.sms_enabled = enabled;
        }
        if let Some(content) = &patch.sms_content {
            merged.sms_content = content.clone();
        }
        if let Some(types) = &patch.sms_types {
            merged.sms_types = types.clone();
        }
        if let Some(company) = &patch.sms_company_name {
            merged.sms_company_name = Some(company.clone());
        }
        if let Some(strategy) = patch.retry_strategy {
            merged.retry_strategy = strategy;
        }
        if let Some(patterns) = &patch.retry_patterns {
            merged.retry_patterns = patterns.clone();
        }
        if let Some(delays) = &patch.retry_delays {
            merged.retry_delays = delays.clone();
        }
        if let Some(cooldown) = patch.retry_settings {
            merged.retry_settings = Some(cooldown);
        }
        merged
    }
}

/// Partial campaign: only modified fields are set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_content: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_strategy: Option<RetryStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_patterns: Option<Vec<RetryPattern>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delays: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_settings: Option<Cooldown>,
}

impl CampaignPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check numeric bounds and day numbering of the retry fields
    pub fn validate_bounds(&self) -> Result<()> {
        check_retry_bounds(
            self.retry_patterns.as_deref().unwrap_or_default(),
            self.retry_settings.as_ref(),
        )
    }
}

fn check_retry_bounds(patterns: &[RetryPattern], cooldown: Option<&Cooldown>) -> Result<()> {
    for pattern in patterns {
        pattern.validate().map_err(|e| {
            BrivasError::Validation(format!("retry pattern day {}: {}", pattern.day_index, e))
        })?;
    }
    if !days_are_contiguous(patterns) {
        return Err(BrivasError::Validation(
            "retry pattern days must run from 0 without gaps".to_string(),
        ));
    }
    if let Some(cooldown) = cooldown {
        cooldown
            .validate()
            .map_err(|e| BrivasError::Validation(format!("retry settings: {}", e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign() -> Campaign {
        let mut campaign = Campaign::new(CampaignId::new("camp-1"), "Spring recall");
        campaign.sms_company_name = Some("Acme Dental".to_string());
        campaign.retry_strategy = RetryStrategy::Delays;
        campaign.retry_delays = vec![30, 60];
        campaign
    }

    #[test]
    fn test_merged_leaves_base_untouched() {
        let base = campaign();
        let patch = CampaignPatch {
            sms_company_name: Some("Acme".to_string()),
            retry_strategy: Some(RetryStrategy::None),
            ..Default::default()
        };

        let merged = base.merged(&patch);
        assert_eq!(merged.company_name(), "Acme");
        assert_eq!(merged.retry_strategy, RetryStrategy::None);
        assert_eq!(merged.retry_delays, vec![30, 60]);

        assert_eq!(base.company_name(), "Acme Dental");
        assert_eq!(base.retry_strategy, RetryStrategy::Delays);
    }

    #[test]
    fn test_retry_config_uses_default_cooldown() {
        let config = campaign().retry_config();
        assert_eq!(config.cooldown, Cooldown::default());
        assert_eq!(config.delays_text(), "30, 60");
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = CampaignPatch {
            retry_delays: Some(vec![5]),
            sms_company_name: Some("Acme".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "smsCompanyName": "Acme", "retryDelays": [5] }));
        assert!(!patch.is_empty());
        assert!(CampaignPatch::default().is_empty());
    }

    #[test]
    fn test_validate_bounds() {
        let patch = CampaignPatch {
            retry_patterns: Some(vec![RetryPattern { day_index: 0, attempts: 0, interval_minutes: 5 }]),
            ..Default::default()
        };
        assert!(matches!(patch.validate_bounds(), Err(BrivasError::Validation(_))));

        let patch = CampaignPatch {
            retry_settings: Some(Cooldown { hours: 24, after_attempts: 3 }),
            ..Default::default()
        };
        assert!(patch.validate_bounds().is_ok());
    }

    #[test]
    fn test_validate_bounds_rejects_gapped_days() {
        let patch = CampaignPatch {
            retry_patterns: Some(vec![RetryPattern::for_day(5), RetryPattern::for_day(5)]),
            ..Default::default()
        };
        assert!(matches!(patch.validate_bounds(), Err(BrivasError::Validation(_))));

        let patch = CampaignPatch {
            retry_patterns: Some(vec![RetryPattern::for_day(0), RetryPattern::for_day(1)]),
            ..Default::default()
        };
        assert!(patch.validate_bounds().is_ok());
    }

    #[test]
    fn test_check_whole_record() {
        assert!(campaign().check().is_ok());

        let mut zero_attempts = campaign();
        zero_attempts.retry_strategy = RetryStrategy::Pattern;
        zero_attempts.retry_patterns =
            vec![RetryPattern { day_index: 0, attempts: 0, interval_minutes: 30 }];
        assert!(matches!(zero_attempts.check(), Err(BrivasError::Validation(_))));

        let mut zero_hours = campaign();
        zero_hours.retry_settings = Some(Cooldown { hours: 0, after_attempts: 3 });
        assert!(matches!(zero_hours.check(), Err(BrivasError::Validation(_))));

        let mut no_delays = campaign();
        no_delays.retry_delays.clear();
        assert!(matches!(no_delays.check(), Err(BrivasError::Validation(_))));

        let mut too_long = campaign();
        too_long.sms_types = vec!["reminder".to_string()];
        too_long.sms_content.insert("reminder".to_string(), "a".repeat(200));
        assert!(matches!(too_long.check(), Err(BrivasError::Validation(_))));
    }

    #[test]
    fn test_sms_preview_sizes_display_text() {
        let mut record = campaign();
        record
            .sms_content
            .insert("reminder".to_string(), "Hi {{clientCustomer.firstName}}".to_string());

        let preview = record.sms_preview("reminder");
        assert_eq!(preview.current_length, "Hi firstName".chars().count());
        assert_eq!(preview.max_content_chars, 160 - 13 - 22);
        assert_eq!(record.sms_preview("noShow").current_length, 0);
    }

    #[test]
    fn test_campaign_deserializes_with_defaults() {
        let campaign: Campaign =
            serde_json::from_str(r#"{"id":"camp-9","name":"Recall","smsCompanyName":"Acme"}"#).unwrap();
        assert_eq!(campaign.id, CampaignId::new("camp-9"));
        assert_eq!(campaign.retry_strategy, RetryStrategy::None);
        assert!(campaign.sms_content.is_empty());
        assert_eq!(campaign.company_name(), "Acme");
    }
}
