//! Retry strategy and cooldown configuration for outbound call campaigns
//!
//! [`RetryConfig`] is what an editing session mutates: it keeps the pattern
//! list and the delay list side by side so switching strategy never loses
//! either. [`RetrySettings`] is what gets submitted: only the list that
//! belongs to the chosen strategy survives.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// How failed call attempts are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetryStrategy {
    None,
    Pattern,
    Delays,
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::None
    }
}

/// Attempts for one campaign day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RetryPattern {
    pub day_index: u32,

    #[validate(range(min = 1))]
    pub attempts: u32,

    #[validate(range(min = 1))]
    pub interval_minutes: u32,
}

impl RetryPattern {
    pub const DEFAULT_ATTEMPTS: u32 = 4;
    pub const DEFAULT_INTERVAL_MINUTES: u32 = 180;

    pub fn for_day(day_index: u32) -> Self {
        Self {
            day_index,
            attempts: Self::DEFAULT_ATTEMPTS,
            interval_minutes: Self::DEFAULT_INTERVAL_MINUTES,
        }
    }
}

/// True when day indices run 0, 1, 2, ... in list order
pub fn days_are_contiguous(patterns: &[RetryPattern]) -> bool {
    patterns
        .iter()
        .enumerate()
        .all(|(position, pattern)| pattern.day_index as usize == position)
}

/// Editable fields of a [`RetryPattern`].
/// The day index follows list position and is not editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternField {
    Attempts,
    IntervalMinutes,
}

/// Pause applied after a number of attempts, whatever the strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Cooldown {
    #[validate(range(min = 1))]
    pub hours: u32,

    #[validate(range(min = 1))]
    pub after_attempts: u32,
}

impl Cooldown {
    pub const DEFAULT_HOURS: u32 = 48;
    pub const DEFAULT_AFTER_ATTEMPTS: u32 = 20;
}

impl Default for Cooldown {
    fn default() -> Self {
        Self {
            hours: Self::DEFAULT_HOURS,
            after_attempts: Self::DEFAULT_AFTER_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CooldownField {
    Hours,
    AfterAttempts,
}

/// Strategy together with the only data that strategy uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "values", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetryPolicy {
    None,
    Pattern(Vec<RetryPattern>),
    Delays(Vec<u32>),
}

impl RetryPolicy {
    pub fn strategy(&self) -> RetryStrategy {
        match self {
            Self::None => RetryStrategy::None,
            Self::Pattern(_) => RetryStrategy::Pattern,
            Self::Delays(_) => RetryStrategy::Delays,
        }
    }
}

/// Submittable retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrySettings {
    pub policy: RetryPolicy,
    pub cooldown: Cooldown,
}

/// Split a comma-separated delay list, dropping blanks and non-numeric tokens
pub fn parse_delays(raw: &str) -> Vec<u32> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<u32>() {
            Ok(minutes) => Some(minutes),
            Err(_) => {
                tracing::debug!(token, "Dropping non-numeric retry delay");
                None
            }
        })
        .collect()
}

/// Retry configuration being edited
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryConfig {
    pub strategy: RetryStrategy,
    pub patterns: Vec<RetryPattern>,
    pub delays: Vec<u32>,
    /// Delay list exactly as typed, kept for redisplay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delays_input: Option<String>,
    pub cooldown: Cooldown,
}

impl RetryConfig {
    pub fn set_strategy(&mut self, strategy: RetryStrategy) {
        self.strategy = strategy;
    }

    /// Append a default entry for the next day; returns its index
    pub fn add_pattern(&mut self) -> usize {
        let index = self.patterns.len();
        self.patterns.push(RetryPattern::for_day(index as u32));
        index
    }

    /// Returns false when `index` is out of range
    pub fn update_pattern(&mut self, index: usize, field: PatternField, value: u32) -> bool {
        let Some(pattern) = self.patterns.get_mut(index) else {
            tracing::debug!(index, "Ignoring update of missing retry pattern");
            return false;
        };

        match field {
            PatternField::Attempts => pattern.attempts = value.max(1),
            PatternField::IntervalMinutes => pattern.interval_minutes = value.max(1),
        }
        true
    }

    /// Remove an entry and renumber the rest from day 0
    pub fn remove_pattern(&mut self, index: usize) -> Option<RetryPattern> {
        if index >= self.patterns.len() {
            tracing::debug!(index, "Ignoring removal of missing retry pattern");
            return None;
        }

        let removed = self.patterns.remove(index);
        for (day, pattern) in self.patterns.iter_mut().enumerate() {
            pattern.day_index = day as u32;
        }
        Some(removed)
    }

    pub fn set_delays_from_text(&mut self, raw: &str) {
        self.delays = parse_delays(raw);
        self.delays_input = Some(raw.to_string());
    }

    /// Text for the delay input: what was typed, or the stored list
    pub fn delays_text(&self) -> String {
        match &self.delays_input {
            Some(raw) => raw.clone(),
            None => self
                .delays
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn set_cooldown(&mut self, field: CooldownField, value: u32) {
        match field {
            CooldownField::Hours => self.cooldown.hours = value.max(1),
            CooldownField::AfterAttempts => self.cooldown.after_attempts = value.max(1),
        }
    }

    pub fn can_save(&self) -> bool {
        match self.strategy {
            RetryStrategy::None => true,
            RetryStrategy::Pattern => {
                !self.patterns.is_empty() && days_are_contiguous(&self.patterns)
            }
            RetryStrategy::Delays => {
                !self.delays.is_empty() && !self.delays_text().trim().is_empty()
            }
        }
    }

    /// Collapse to the submitted shape, `None` while [`Self::can_save`] is false
    pub fn to_settings(&self) -> Option<RetrySettings> {
        if !self.can_save() {
            return None;
        }

        let policy = match self.strategy {
            RetryStrategy::None => RetryPolicy::None,
            RetryStrategy::Pattern => RetryPolicy::Pattern(self.patterns.clone()),
            RetryStrategy::Delays => RetryPolicy::Delays(self.delays.clone()),
        };

        Some(RetrySettings {
            policy,
            cooldown: self.cooldown,
        })
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        let mut config = Self {
            strategy: settings.policy.strategy(),
            cooldown: settings.cooldown,
            ..Default::default()
        };
        match &settings.policy {
            RetryPolicy::None => {}
            RetryPolicy::Pattern(patterns) => config.patterns = patterns.clone(),
            RetryPolicy::Delays(delays) => config.delays = delays.clone(),
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_patterns(n: usize) -> RetryConfig {
        let mut config = RetryConfig::default();
        for _ in 0..n {
            config.add_pattern();
        }
        config
    }

    #[test]
    fn test_add_pattern_defaults() {
        let config = with_patterns(2);
        assert_eq!(
            config.patterns,
            vec![
                RetryPattern { day_index: 0, attempts: 4, interval_minutes: 180 },
                RetryPattern { day_index: 1, attempts: 4, interval_minutes: 180 },
            ]
        );
    }

    #[test]
    fn test_remove_pattern_renumbers() {
        for removed in 0..3 {
            let mut config = with_patterns(3);
            assert!(config.remove_pattern(removed).is_some());
            let days: Vec<u32> = config.patterns.iter().map(|p| p.day_index).collect();
            assert_eq!(days, vec![0, 1]);
        }
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut config = with_patterns(1);
        assert!(config.remove_pattern(5).is_none());
        assert_eq!(config.patterns.len(), 1);
    }

    #[test]
    fn test_update_pattern() {
        let mut config = with_patterns(2);
        assert!(config.update_pattern(1, PatternField::Attempts, 6));
        assert!(config.update_pattern(1, PatternField::IntervalMinutes, 0));
        assert!(!config.update_pattern(9, PatternField::Attempts, 2));

        assert_eq!(config.patterns[1].attempts, 6);
        assert_eq!(config.patterns[1].interval_minutes, 1);
        let days: Vec<u32> = config.patterns.iter().map(|p| p.day_index).collect();
        assert_eq!(days, vec![0, 1]);
    }

    #[test]
    fn test_pattern_days_must_be_contiguous() {
        let mut config = with_patterns(2);
        config.set_strategy(RetryStrategy::Pattern);
        assert!(days_are_contiguous(&config.patterns));
        assert!(config.can_save());

        config.patterns[1].day_index = 7;
        assert!(!days_are_contiguous(&config.patterns));
        assert!(!config.can_save());
        assert!(config.to_settings().is_none());

        config.patterns = vec![RetryPattern::for_day(5), RetryPattern::for_day(5)];
        assert!(!config.can_save());

        config.remove_pattern(0);
        assert!(config.can_save());
    }

    #[test]
    fn test_set_delays_from_text() {
        let mut config = RetryConfig::default();
        config.set_delays_from_text("5, 5, abc, 10");
        assert_eq!(config.delays, vec![5, 5, 10]);
        assert_eq!(config.delays_text(), "5, 5, abc, 10");
    }

    #[test]
    fn test_parse_delays_edge_cases() {
        assert!(parse_delays(",,,").is_empty());
        assert!(parse_delays("").is_empty());
        assert_eq!(parse_delays(" 0 ,15,,-3, 2.5 ,30"), vec![0, 15, 30]);
    }

    #[test]
    fn test_can_save_rules() {
        let mut config = RetryConfig::default();
        config.patterns = vec![];
        config.set_delays_from_text(",,,");
        assert!(config.can_save());

        config.set_strategy(RetryStrategy::Delays);
        assert!(!config.can_save());
        config.set_delays_from_text("10, 20");
        assert!(config.can_save());

        config.set_strategy(RetryStrategy::Pattern);
        assert!(!config.can_save());
        config.add_pattern();
        assert!(config.can_save());
    }

    #[test]
    fn test_can_save_delays_requires_text() {
        let config = RetryConfig {
            strategy: RetryStrategy::Delays,
            delays: vec![10],
            delays_input: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!config.can_save());

        let stored = RetryConfig {
            strategy: RetryStrategy::Delays,
            delays: vec![10, 20],
            ..Default::default()
        };
        assert_eq!(stored.delays_text(), "10, 20");
        assert!(stored.can_save());
    }

    #[test]
    fn test_strategy_switch_keeps_lists() {
        let mut config = with_patterns(2);
        config.set_delays_from_text("15");
        config.set_strategy(RetryStrategy::Delays);
        config.set_strategy(RetryStrategy::Pattern);
        assert_eq!(config.patterns.len(), 2);
        assert_eq!(config.delays, vec![15]);
    }

    #[test]
    fn test_cooldown_defaults_and_updates() {
        let mut config = RetryConfig::default();
        assert_eq!(config.cooldown, Cooldown { hours: 48, after_attempts: 20 });

        config.set_cooldown(CooldownField::Hours, 12);
        assert_eq!(config.cooldown, Cooldown { hours: 12, after_attempts: 20 });

        config.set_cooldown(CooldownField::AfterAttempts, 0);
        assert_eq!(config.cooldown.after_attempts, 1);
    }

    #[test]
    fn test_to_settings() {
        let mut config = with_patterns(1);
        config.set_delays_from_text("5");
        config.set_strategy(RetryStrategy::Delays);

        let settings = config.to_settings().unwrap();
        assert_eq!(settings.policy, RetryPolicy::Delays(vec![5]));
        assert_eq!(settings.cooldown, Cooldown::default());

        let restored = RetryConfig::from(&settings);
        assert_eq!(restored.delays, vec![5]);
        assert!(restored.patterns.is_empty());

        config.set_delays_from_text(",");
        assert!(config.to_settings().is_none());
    }

    #[test]
    fn test_validation_bounds() {
        let bad = RetryPattern { day_index: 0, attempts: 0, interval_minutes: 10 };
        assert!(bad.validate().is_err());
        assert!(RetryPattern::for_day(0).validate().is_ok());

        let bad = Cooldown { hours: 0, after_attempts: 3 };
        assert!(bad.validate().is_err());
        assert!(Cooldown::default().validate().is_ok());
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(serde_json::to_string(&RetryStrategy::Delays).unwrap(), "\"DELAYS\"");

        let settings = RetrySettings {
            policy: RetryPolicy::Delays(vec![5, 10]),
            cooldown: Cooldown::default(),
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["policy"]["strategy"], "DELAYS");
        assert_eq!(json["policy"]["values"], serde_json::json!([5, 10]));
        assert_eq!(json["cooldown"]["afterAttempts"], 20);

        let config: RetryConfig =
            serde_json::from_str(r#"{"strategy":"PATTERN","patterns":[{"dayIndex":0,"attempts":2,"intervalMinutes":60}]}"#)
                .unwrap();
        assert_eq!(config.strategy, RetryStrategy::Pattern);
        assert_eq!(config.cooldown, Cooldown::default());
        assert!(config.can_save());
    }
}
