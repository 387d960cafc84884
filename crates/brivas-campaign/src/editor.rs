//! Campaign editing sessions
//!
//! An editor holds the campaign as last loaded and a [`CampaignPatch`] of
//! pending changes. The loaded record is never modified; reads go through the
//! merged view and writes only touch the patch. The patch is cleared when the
//! store confirms a save, and kept when it does not.

use brivas_core::{BrivasError, Result};
use brivas_sms::SegmentationResult;
use tracing::{debug, info, warn};

use crate::campaign::{Campaign, CampaignPatch, INCOMPLETE_RETRY};
use crate::retry::RetryConfig;
use crate::store::CampaignStore;
use crate::template::{to_delivery_syntax, to_display_syntax};

#[derive(Debug, Clone)]
pub struct CampaignEditor {
    base: Campaign,
    pending: CampaignPatch,
    delays_input: Option<String>,
}

impl CampaignEditor {
    pub fn new(base: Campaign) -> Self {
        Self {
            base,
            pending: CampaignPatch::default(),
            delays_input: None,
        }
    }

    /// Resume a session with changes that arrived as a patch
    pub fn with_pending(base: Campaign, pending: CampaignPatch) -> Self {
        Self {
            base,
            pending,
            delays_input: None,
        }
    }

    pub fn base(&self) -> &Campaign {
        &self.base
    }

    pub fn pending(&self) -> &CampaignPatch {
        &self.pending
    }

    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Loaded campaign with pending changes applied
    pub fn effective(&self) -> Campaign {
        self.base.merged(&self.pending)
    }

    pub fn company_name(&self) -> String {
        match &self.pending.sms_company_name {
            Some(name) => name.clone(),
            None => self.base.company_name().to_string(),
        }
    }

    pub fn set_company_name(&mut self, name: impl Into<String>) {
        self.pending.sms_company_name = Some(name.into());
    }

    pub fn set_sms_enabled(&mut self, enabled: bool) {
        self.pending.sms_enabled = Some(enabled);
    }

    /// Content of one message type, ready for the editor
    pub fn sms_content_for_display(&self, message_type: &str) -> String {
        let content = self
            .pending
            .sms_content
            .as_ref()
            .unwrap_or(&self.base.sms_content);
        content
            .get(message_type)
            .map(|text| to_display_syntax(text))
            .unwrap_or_default()
    }

    /// Store edited display-syntax content for one message type
    pub fn set_sms_content(&mut self, message_type: &str, display_text: &str) {
        let mut content = self
            .pending
            .sms_content
            .take()
            .unwrap_or_else(|| self.base.sms_content.clone());
        content.insert(message_type.to_string(), to_delivery_syntax(display_text));
        self.pending.sms_content = Some(content);
    }

    /// Enable or disable a message type; returns whether it is now enabled
    pub fn toggle_sms_type(&mut self, message_type: &str) -> bool {
        let mut types = self
            .pending
            .sms_types
            .take()
            .unwrap_or_else(|| self.base.sms_types.clone());

        let enabled = match types.iter().position(|t| t == message_type) {
            Some(index) => {
                types.remove(index);
                false
            }
            None => {
                types.push(message_type.to_string());
                true
            }
        };
        self.pending.sms_types = Some(types);
        enabled
    }

    /// Live size feedback for one message type
    pub fn sms_preview(&self, message_type: &str) -> SegmentationResult {
        self.effective().sms_preview(message_type)
    }

    /// Current retry configuration, including raw delay text typed this session
    pub fn retry_config(&self) -> RetryConfig {
        let mut config = self.effective().retry_config();
        config.delays_input = self.delays_input.clone();
        config
    }

    /// Apply retry edits; only fields that actually changed enter the patch
    pub fn update_retry<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut RetryConfig),
    {
        let before = self.retry_config();
        let mut after = before.clone();
        edit(&mut after);

        if after.strategy != before.strategy {
            self.pending.retry_strategy = Some(after.strategy);
        }
        if after.patterns != before.patterns {
            self.pending.retry_patterns = Some(after.patterns);
        }
        if after.delays != before.delays {
            self.pending.retry_delays = Some(after.delays);
        }
        if after.cooldown != before.cooldown {
            self.pending.retry_settings = Some(after.cooldown);
        }
        self.delays_input = after.delays_input;
    }

    /// Why the current state cannot be saved, if it cannot
    pub fn check(&self) -> Result<()> {
        self.pending.validate_bounds()?;

        // Delay text typed this session is not part of the record
        if !self.retry_config().can_save() {
            return Err(BrivasError::Validation(INCOMPLETE_RETRY.to_string()));
        }

        self.effective().check()
    }

    pub fn can_save(&self) -> bool {
        self.check().is_ok()
    }

    /// Drop every pending change
    pub fn discard(&mut self) {
        self.pending = CampaignPatch::default();
        self.delays_input = None;
    }

    /// Send pending changes to the store.
    /// The session only resets once the store has accepted the patch.
    pub async fn save<S>(&mut self, store: &S) -> Result<Campaign>
    where
        S: CampaignStore + ?Sized,
    {
        if !self.has_changes() {
            debug!(campaign_id = %self.base.id, "Nothing to save");
            return Ok(self.base.clone());
        }

        self.check()?;

        let result = store.patch(&self.base.id, &self.pending).await;
        match result {
            Ok(saved) => {
                info!(campaign_id = %saved.id, "Campaign saved");
                self.base = saved.clone();
                self.discard();
                Ok(saved)
            }
            Err(e) => {
                warn!(campaign_id = %self.base.id, error = %e, "Campaign save failed, keeping pending changes");
                Err(e)
            }
        }
    }
}
