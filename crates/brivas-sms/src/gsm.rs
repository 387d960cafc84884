//! GSM 03.38 alphabet classification and character weighting

use serde::{Deserialize, Serialize};

use crate::{GSM7_SEGMENT_CHARS, UCS2_SEGMENT_CHARS};

/// GSM 7-bit default alphabet.
/// The escape septet (0x1B) is left out: it is never valid message text.
const GSM7_BASIC: &[char] = &[
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å',
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', 'Æ', 'æ', 'ß', 'É',
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?',
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§',
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à',
];

/// Single-shift extension table, reachable after ESC.
/// Decides whether a character is representable in GSM-7 at all.
const GSM7_EXTENSION: &[char] = &['^', '{', '}', '\\', '[', '~', ']', '|', '€'];

/// Characters that occupy two septets on the wire.
/// Same set as the extension table today; kept apart because sizing and
/// classification are separate rules.
const GSM7_DOUBLE_WEIGHT: &[char] = &['^', '{', '}', '\\', '[', '~', ']', '|', '€'];

/// SMS character encoding class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmsEncoding {
    #[serde(rename = "GSM-7")]
    Gsm7,
    #[serde(rename = "UCS-2")]
    Ucs2,
}

impl SmsEncoding {
    /// Encoding required to carry `text` unchanged
    pub fn detect(text: &str) -> Self {
        if is_gsm7_text(text) {
            Self::Gsm7
        } else {
            Self::Ucs2
        }
    }

    /// Characters that fit in one segment
    pub fn segment_capacity(self) -> usize {
        match self {
            Self::Gsm7 => GSM7_SEGMENT_CHARS,
            Self::Ucs2 => UCS2_SEGMENT_CHARS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gsm7 => "GSM-7",
            Self::Ucs2 => "UCS-2",
        }
    }
}

impl std::fmt::Display for SmsEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True if `ch` is in the default alphabet or the extension table
pub fn is_gsm7_char(ch: char) -> bool {
    GSM7_BASIC.contains(&ch) || GSM7_EXTENSION.contains(&ch)
}

pub fn is_gsm7_text(text: &str) -> bool {
    text.chars().all(is_gsm7_char)
}

/// Septet weight used for length accounting
pub fn char_weight(ch: char) -> usize {
    if GSM7_DOUBLE_WEIGHT.contains(&ch) {
        2
    } else {
        1
    }
}

/// Length of `text` with extension characters counted twice
pub fn weighted_length(text: &str) -> usize {
    text.chars().map(char_weight).sum()
}
