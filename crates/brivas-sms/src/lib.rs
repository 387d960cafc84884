//! # Brivas SMS sizing
//!
//! Character accounting for outbound campaign SMS:
//!
//! - **GSM 03.38** default alphabet and single-shift extension table
//! - **Encoding detection** - GSM-7 when every character is representable, UCS-2 otherwise
//! - **Segmentation** - single-segment capacity, weighted length and the room left for
//!   campaign content once the sender prefix and opt-out footer are accounted for
//!
//! ## Example
//! ```rust
//! use brivas_sms::{compute_segmentation, SmsEncoding};
//!
//! let result = compute_segmentation("Hi {firstName}, see you soon", "Acme");
//! assert_eq!(result.encoding, SmsEncoding::Gsm7);
//! assert_eq!(result.max_content_chars, 160 - 6 - 22);
//! ```

pub mod gsm;
pub mod segment;

pub use gsm::{char_weight, is_gsm7_char, is_gsm7_text, weighted_length, SmsEncoding};
pub use segment::{
    compose_message, compute_segmentation, normalize_company_prefix, strip_placeholder_braces,
    SegmentationResult,
};

/// Footer appended to every outbound campaign SMS
pub const OPT_OUT_SUFFIX: &str = " Reply STOP to opt-out.";

/// Characters reserved for the opt-out footer when sizing content
pub const OPT_OUT_RESERVE: usize = 22;

/// Separator between the sender prefix and the message body
pub const PREFIX_SEPARATOR: &str = ": ";

/// Single-segment capacity for GSM-7 messages
pub const GSM7_SEGMENT_CHARS: usize = 160;

/// Single-segment capacity for UCS-2 messages
pub const UCS2_SEGMENT_CHARS: usize = 70;
