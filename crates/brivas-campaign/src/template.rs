//! Template variable syntax conversion
//!
//! Campaign content is edited with bare placeholders (`{firstName}`) and stored
//! with the delivery engine's syntax (`{{clientCustomer.firstName}}`). Only the
//! variables in [`TemplateVariable`] are rewritten; any other brace token is
//! left exactly as written in both directions.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Namespace of customer-scoped fields in delivery syntax
const CUSTOMER_NAMESPACE: &str = "clientCustomer.";

/// Variables recognized in campaign SMS content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateVariable {
    FirstName,
    LastName,
    AppointmentTime,
    AppointmentDate,
}

impl TemplateVariable {
    pub const ALL: [TemplateVariable; 4] = [
        Self::FirstName,
        Self::LastName,
        Self::AppointmentTime,
        Self::AppointmentDate,
    ];

    /// Name used between single braces in the editor
    pub fn display_name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::AppointmentTime => "appointmentTime",
            Self::AppointmentDate => "appointmentDate",
        }
    }

    /// Fields resolved from the customer record
    pub fn is_customer_scoped(self) -> bool {
        matches!(self, Self::FirstName | Self::LastName)
    }

    /// Path used between double braces by the delivery engine
    pub fn delivery_path(self) -> String {
        if self.is_customer_scoped() {
            format!("{}{}", CUSTOMER_NAMESPACE, self.display_name())
        } else {
            self.display_name().to_string()
        }
    }

    pub fn display_token(self) -> String {
        format!("{{{}}}", self.display_name())
    }

    pub fn delivery_token(self) -> String {
        format!("{{{{{}}}}}", self.delivery_path())
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.display_name() == name)
    }

    pub fn from_delivery_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.delivery_path() == path)
    }
}

impl std::fmt::Display for TemplateVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Matches `{{...}}` first, then `{...}`; neither form may nest braces.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{([^{}]*)\}\}|\{([^{}]*)\}").expect("token pattern is a valid regex")
    })
}

/// `{firstName}` -> `{{clientCustomer.firstName}}`, `{appointmentTime}` -> `{{appointmentTime}}`
pub fn to_delivery_syntax(display: &str) -> String {
    token_pattern()
        .replace_all(display, |caps: &Captures| {
            match caps.get(2).and_then(|m| TemplateVariable::from_display_name(m.as_str())) {
                Some(variable) => variable.delivery_token(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Inverse of [`to_delivery_syntax`] for the recognized variables
pub fn to_display_syntax(delivery: &str) -> String {
    token_pattern()
        .replace_all(delivery, |caps: &Captures| {
            match caps.get(1).and_then(|m| TemplateVariable::from_delivery_path(m.as_str().trim())) {
                Some(variable) => variable.display_token(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Recognized display-syntax variables in order of first appearance
pub fn placeholders(display: &str) -> Vec<TemplateVariable> {
    let mut found = Vec::new();
    for caps in token_pattern().captures_iter(display) {
        if let Some(variable) = caps.get(2).and_then(|m| TemplateVariable::from_display_name(m.as_str())) {
            if !found.contains(&variable) {
                found.push(variable);
            }
        }
    }
    found
}

fn map_content(
    content: &BTreeMap<String, String>,
    convert: fn(&str) -> String,
) -> BTreeMap<String, String> {
    content
        .iter()
        .map(|(message_type, text)| {
            let converted = if text.is_empty() { text.clone() } else { convert(text) };
            (message_type.clone(), converted)
        })
        .collect()
}

/// Convert every message type's content to delivery syntax
pub fn content_map_to_delivery(content: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    map_content(content, to_delivery_syntax)
}

/// Convert every message type's content to display syntax
pub fn content_map_to_display(content: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    map_content(content, to_display_syntax)
}
