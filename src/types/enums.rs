use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Closed, string-valued categories used on the wire.
///
/// Every implementor declares a fixed value set at compile time; membership
/// is checked with [`WireEnum::is_valid`] before a raw string is trusted.
pub trait WireEnum: Sized + Copy {
    /// The full domain of wire values for this enum.
    fn values() -> &'static [&'static str];

    /// The wire representation of this variant.
    fn as_str(self) -> &'static str;

    /// Parse a wire value, returning `None` for non-members.
    fn parse(value: &str) -> Option<Self>;

    /// Pure membership test: true iff `value` is in [`WireEnum::values`].
    fn is_valid(value: &str) -> bool {
        Self::parse(value).is_some()
    }
}

/// Role of a content author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl WireEnum for Role {
    fn values() -> &'static [&'static str] {
        &["user", "model"]
    }

    fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "model" => Some(Role::Model),
            _ => None,
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Role as WireEnum>::parse(s)
            .ok_or_else(|| Error::validation(format!("invalid role value: {s:?}")))
    }
}

/// Reason why a candidate stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other,
}

impl WireEnum for FinishReason {
    fn values() -> &'static [&'static str] {
        &["STOP", "MAX_TOKENS", "SAFETY", "RECITATION", "OTHER"]
    }

    fn as_str(self) -> &'static str {
        match self {
            FinishReason::Stop => "STOP",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::Safety => "SAFETY",
            FinishReason::Recitation => "RECITATION",
            FinishReason::Other => "OTHER",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "STOP" => Some(FinishReason::Stop),
            "MAX_TOKENS" => Some(FinishReason::MaxTokens),
            "SAFETY" => Some(FinishReason::Safety),
            "RECITATION" => Some(FinishReason::Recitation),
            "OTHER" => Some(FinishReason::Other),
            _ => None,
        }
    }
}

impl FromStr for FinishReason {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <FinishReason as WireEnum>::parse(s)
            .ok_or_else(|| Error::validation(format!("invalid finish reason: {s:?}")))
    }
}
