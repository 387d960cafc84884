//! Brivas Campaign - outbound campaign messaging configuration
//!
//! - Template variables: display syntax (`{firstName}`) and delivery syntax
//!   (`{{clientCustomer.firstName}}`)
//! - Retry strategy, per-day retry patterns, delay lists and cooldown
//! - Campaign records, pending-change overlays and editing sessions
//! - Persistence seam for campaign records

pub mod campaign;
pub mod editor;
pub mod retry;
pub mod store;
pub mod template;

pub use campaign::{Campaign, CampaignPatch};
pub use editor::CampaignEditor;
pub use retry::{
    days_are_contiguous, parse_delays, Cooldown, CooldownField, PatternField, RetryConfig, RetryPattern, RetryPolicy,
    RetrySettings, RetryStrategy,
};
pub use store::{CampaignStore, InMemoryCampaignStore};
pub use template::{
    content_map_to_delivery, content_map_to_display, placeholders, to_delivery_syntax,
    to_display_syntax, TemplateVariable,
};
