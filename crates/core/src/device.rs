//! Device categories handled by the marketplace.

use serde::{Deserialize, Serialize};

/// The kind of device a lead, model or brand refers to.
///
/// The kind selects the questionnaire profile used for grading and the shape
/// of the condition table the resolver queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Phone,
    Tablet,
    Watch,
}

impl DeviceKind {
    /// Return the kind as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Tablet => "tablet",
            Self::Watch => "watch",
        }
    }

    /// Parse a kind from user or spreadsheet input.
    ///
    /// Accepts a few common synonyms ("mobile", "ipad", "smartwatch").
    /// Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "phone" | "phones" | "mobile" | "smartphone" => Some(Self::Phone),
            "tablet" | "tablets" | "ipad" => Some(Self::Tablet),
            "watch" | "watches" | "smartwatch" => Some(Self::Watch),
            _ => None,
        }
    }

    /// All valid stored values.
    pub const ALL: &'static [&'static str] = &["phone", "tablet", "watch"];
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_values() {
        for value in DeviceKind::ALL {
            let kind = DeviceKind::parse(value).expect("stored value parses");
            assert_eq!(kind.as_str(), *value);
        }
    }

    #[test]
    fn parses_synonyms_case_insensitively() {
        assert_eq!(DeviceKind::parse(" Mobile "), Some(DeviceKind::Phone));
        assert_eq!(DeviceKind::parse("iPad"), Some(DeviceKind::Tablet));
        assert_eq!(DeviceKind::parse("SmartWatch"), Some(DeviceKind::Watch));
    }

    #[test]
    fn rejects_unknown_kind() {
        assert_eq!(DeviceKind::parse("laptop"), None);
        assert_eq!(DeviceKind::parse(""), None);
    }
}
