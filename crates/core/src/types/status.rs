//! Status and category enums stored as text columns.
//!
//! Each enum round-trips through its lowercase wire name via `Display` and
//! `FromStr`, which is also how repositories read them back from Postgres.

use serde::{Deserialize, Serialize};

/// Error returned when a stored or submitted value names no known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Subscription tier of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Default tier, limited to the free quota.
    #[default]
    Free,
    /// Trial tier, limited like `Free`.
    Trial,
    /// Paying subscriber.
    Active,
    /// Converted client.
    Client,
}

impl SubscriptionStatus {
    /// Whether this tier bypasses the usage quota.
    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        matches!(self, Self::Active | Self::Client)
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Trial => "trial",
            Self::Active => "active",
            Self::Client => "client",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "trial" => Ok(Self::Trial),
            "active" => Ok(Self::Active),
            "client" => Ok(Self::Client),
            _ => Err(ParseEnumError::new("subscription status", s)),
        }
    }
}

/// Kind of request recorded in the usage log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    Marketing,
    Code,
    Chat,
}

impl AnalysisType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Marketing => "marketing",
            Self::Code => "code",
            Self::Chat => "chat",
        }
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnalysisType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "marketing" => Ok(Self::Marketing),
            "code" => Ok(Self::Code),
            "chat" => Ok(Self::Chat),
            _ => Err(ParseEnumError::new("analysis type", s)),
        }
    }
}

/// How interested a qualified lead is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterestLevel {
    Baixo,
    #[default]
    Medio,
    Alto,
}

impl InterestLevel {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baixo => "baixo",
            Self::Medio => "medio",
            Self::Alto => "alto",
        }
    }
}

impl std::fmt::Display for InterestLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InterestLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baixo" => Ok(Self::Baixo),
            "medio" => Ok(Self::Medio),
            "alto" => Ok(Self::Alto),
            _ => Err(ParseEnumError::new("interest level", s)),
        }
    }
}

/// Size bracket of a lead's company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompanySize {
    Pequeno,
    #[default]
    Medio,
    Grande,
    Enterprise,
}

impl CompanySize {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pequeno => "pequeno",
            Self::Medio => "medio",
            Self::Grande => "grande",
            Self::Enterprise => "enterprise",
        }
    }
}

impl std::fmt::Display for CompanySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CompanySize {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pequeno" => Ok(Self::Pequeno),
            "medio" => Ok(Self::Medio),
            "grande" => Ok(Self::Grande),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(ParseEnumError::new("company size", s)),
        }
    }
}

/// Channel of a recorded contact with a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Call,
    Email,
    Whatsapp,
    Meeting,
    Note,
    /// Also used for automatic pipeline events.
    Other,
}

impl InteractionType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Email => "email",
            Self::Whatsapp => "whatsapp",
            Self::Meeting => "meeting",
            Self::Note => "note",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InteractionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(Self::Call),
            "email" => Ok(Self::Email),
            "whatsapp" => Ok(Self::Whatsapp),
            "meeting" => Ok(Self::Meeting),
            "note" => Ok(Self::Note),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError::new("interaction type", s)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_tiers() {
        assert!(!SubscriptionStatus::Free.is_unlimited());
        assert!(!SubscriptionStatus::Trial.is_unlimited());
        assert!(SubscriptionStatus::Active.is_unlimited());
        assert!(SubscriptionStatus::Client.is_unlimited());
    }

    #[test]
    fn test_display_matches_serde() {
        let json = serde_json::to_string(&InteractionType::Whatsapp).unwrap();
        assert_eq!(json, format!("\"{}\"", InteractionType::Whatsapp));
        let json = serde_json::to_string(&CompanySize::Enterprise).unwrap();
        assert_eq!(json, format!("\"{}\"", CompanySize::Enterprise));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "gold".parse::<SubscriptionStatus>().unwrap_err();
        assert_eq!(err.kind, "subscription status");
        assert_eq!(err.to_string(), "invalid subscription status: gold");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(InterestLevel::default(), InterestLevel::Medio);
        assert_eq!(CompanySize::default(), CompanySize::Medio);
        assert_eq!(SubscriptionStatus::default(), SubscriptionStatus::Free);
    }
}
