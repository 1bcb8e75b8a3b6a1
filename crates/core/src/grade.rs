//! Condition grades, their price-table keys and the per-grade price map.
//!
//! A [`Grade`] is what the condition resolver produces ("A-", "B-Limited").
//! A [`PriceKey`] is how the same grade is stored in a price table record
//! ("A_MINUS", "B_MINUS_LIMITED"). The mapping between the two is total, so a
//! grade without a price key cannot be constructed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Grade
// ---------------------------------------------------------------------------

/// One of the 16 overall condition grades, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "A-Limited")]
    AMinusLimited,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "B-Limited")]
    BMinusLimited,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "C-Limited")]
    CMinusLimited,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "E")]
    E,
}

impl Grade {
    /// Every grade, best first.
    pub const ALL: [Grade; 16] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::AMinusLimited,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::BMinusLimited,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::CMinusLimited,
        Grade::DPlus,
        Grade::D,
        Grade::DMinus,
        Grade::E,
    ];

    /// The grade assigned when the device does not power on.
    pub const LOWEST: Grade = Grade::E;

    /// The human-facing label, as stored in condition tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::AMinusLimited => "A-Limited",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::BMinusLimited => "B-Limited",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::CMinusLimited => "C-Limited",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::DMinus => "D-",
            Self::E => "E",
        }
    }

    /// Parse a grade label. Surrounding whitespace and ASCII case are ignored.
    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|grade| grade.label().eq_ignore_ascii_case(value))
    }

    /// The key under which this grade's price is stored.
    pub fn price_key(&self) -> PriceKey {
        match self {
            Self::APlus => PriceKey::APlus,
            Self::A => PriceKey::A,
            Self::AMinus => PriceKey::AMinus,
            Self::AMinusLimited => PriceKey::AMinusLimited,
            Self::BPlus => PriceKey::BPlus,
            Self::B => PriceKey::B,
            Self::BMinus => PriceKey::BMinus,
            Self::BMinusLimited => PriceKey::BMinusLimited,
            Self::CPlus => PriceKey::CPlus,
            Self::C => PriceKey::C,
            Self::CMinus => PriceKey::CMinus,
            Self::CMinusLimited => PriceKey::CMinusLimited,
            Self::DPlus => PriceKey::DPlus,
            Self::D => PriceKey::D,
            Self::DMinus => PriceKey::DMinus,
            Self::E => PriceKey::E,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Price keys
// ---------------------------------------------------------------------------

/// Storage key of a grade inside a price table's `grades` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceKey {
    APlus,
    A,
    AMinus,
    AMinusLimited,
    BPlus,
    B,
    BMinus,
    BMinusLimited,
    CPlus,
    C,
    CMinus,
    CMinusLimited,
    DPlus,
    D,
    DMinus,
    E,
}

impl PriceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A_PLUS",
            Self::A => "A",
            Self::AMinus => "A_MINUS",
            Self::AMinusLimited => "A_MINUS_LIMITED",
            Self::BPlus => "B_PLUS",
            Self::B => "B",
            Self::BMinus => "B_MINUS",
            Self::BMinusLimited => "B_MINUS_LIMITED",
            Self::CPlus => "C_PLUS",
            Self::C => "C",
            Self::CMinus => "C_MINUS",
            Self::CMinusLimited => "C_MINUS_LIMITED",
            Self::DPlus => "D_PLUS",
            Self::D => "D",
            Self::DMinus => "D_MINUS",
            Self::E => "E",
        }
    }
}

impl std::fmt::Display for PriceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Grade price map
// ---------------------------------------------------------------------------

/// Prices of one (model, storage, RAM) configuration, keyed by grade.
///
/// A key that is absent means "no price configured", which is distinct from
/// a configured price of `0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradePrices(BTreeMap<PriceKey, f64>);

impl GradePrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored price for `key`, if any.
    pub fn get(&self, key: PriceKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    /// The stored price for `grade`, if any.
    pub fn price_for(&self, grade: Grade) -> Option<f64> {
        self.get(grade.price_key())
    }

    pub fn set(&mut self, key: PriceKey, price: f64) {
        self.0.insert(key, price);
    }

    /// Overwrite every key present in `other`, keeping the rest.
    pub fn merge(&mut self, other: &GradePrices) {
        for (key, price) in &other.0 {
            self.0.insert(*key, *price);
        }
    }

    /// Whether every grade has a price configured.
    pub fn is_fully_populated(&self) -> bool {
        Grade::ALL
            .iter()
            .all(|grade| self.0.contains_key(&grade.price_key()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PriceKey, f64)> for GradePrices {
    fn from_iter<I: IntoIterator<Item = (PriceKey, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fully_populated() -> GradePrices {
        Grade::ALL
            .iter()
            .enumerate()
            .map(|(i, grade)| (grade.price_key(), 1000.0 * (16 - i) as f64))
            .collect()
    }

    #[test]
    fn every_grade_maps_to_a_key_present_in_a_full_table() {
        let prices = fully_populated();
        assert!(prices.is_fully_populated());
        for grade in Grade::ALL {
            assert!(
                prices.price_for(grade).is_some(),
                "missing price for {grade}"
            );
        }
    }

    #[test]
    fn price_keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            Grade::ALL.iter().map(|g| g.price_key()).collect();
        assert_eq!(keys.len(), Grade::ALL.len());
    }

    #[test]
    fn label_round_trip() {
        for grade in Grade::ALL {
            assert_eq!(Grade::from_label(grade.label()), Some(grade));
        }
    }

    #[test]
    fn from_label_ignores_case_and_whitespace() {
        assert_eq!(Grade::from_label(" a-limited "), Some(Grade::AMinusLimited));
        assert_eq!(Grade::from_label("b+"), Some(Grade::BPlus));
    }

    #[test]
    fn from_label_rejects_unknown() {
        assert_eq!(Grade::from_label("F"), None);
        assert_eq!(Grade::from_label(""), None);
        assert_eq!(Grade::from_label("A++"), None);
    }

    #[test]
    fn serde_uses_labels_and_keys() {
        assert_eq!(serde_json::to_string(&Grade::AMinus).unwrap(), "\"A-\"");
        assert_eq!(
            serde_json::to_string(&PriceKey::BMinusLimited).unwrap(),
            "\"B_MINUS_LIMITED\""
        );
        let parsed: Grade = serde_json::from_str("\"C-Limited\"").unwrap();
        assert_eq!(parsed, Grade::CMinusLimited);
    }

    #[test]
    fn price_key_as_str_matches_serde() {
        for grade in Grade::ALL {
            let key = grade.price_key();
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn grade_prices_serialize_as_object() {
        let mut prices = GradePrices::new();
        prices.set(PriceKey::APlus, 20000.0);
        prices.set(PriceKey::E, 0.0);
        let json = serde_json::to_value(&prices).unwrap();
        assert_eq!(json, serde_json::json!({ "A_PLUS": 20000.0, "E": 0.0 }));

        let back: GradePrices = serde_json::from_value(json).unwrap();
        assert_eq!(back, prices);
    }

    #[test]
    fn zero_is_distinct_from_missing() {
        let mut prices = GradePrices::new();
        prices.set(PriceKey::D, 0.0);
        assert_eq!(prices.price_for(Grade::D), Some(0.0));
        assert_eq!(prices.price_for(Grade::DMinus), None);
    }

    #[test]
    fn merge_overwrites_only_present_keys() {
        let mut base = GradePrices::new();
        base.set(PriceKey::A, 100.0);
        base.set(PriceKey::B, 50.0);

        let mut incoming = GradePrices::new();
        incoming.set(PriceKey::A, 120.0);
        incoming.set(PriceKey::C, 30.0);

        base.merge(&incoming);
        assert_eq!(base.get(PriceKey::A), Some(120.0));
        assert_eq!(base.get(PriceKey::B), Some(50.0));
        assert_eq!(base.get(PriceKey::C), Some(30.0));
        assert_eq!(base.len(), 3);
    }
}
