//! Questionnaire answers to per-category condition codes.
//!
//! Each category is described by a static [`CategoryRule`]: the answer
//! categories it reads, the tiers it scans (worst first) and the code used
//! when no tier matches. A [`DeviceProfile`] picks the rules that apply to a
//! device kind and the condition table shape they feed.

use serde::Serialize;

use crate::condition::{ConditionField, ConditionQuery, ConditionShape};
use crate::device::DeviceKind;
use crate::questionnaire::{AnswerCategory, QuestionnaireAnswer};

/// Core code of a device that does not power on.
pub const CORE_FAILURE_CODE: &str = "CR2";

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// A code and the answer text that selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub code: &'static str,
    pub label: &'static str,
}

const fn tier(code: &'static str, label: &'static str) -> Tier {
    Tier { code, label }
}

#[derive(Debug)]
pub struct CategoryRule {
    pub field: ConditionField,
    pub sources: &'static [AnswerCategory],
    /// Only answers with the key flag set count.
    pub key_gated: bool,
    /// Tiers in scan order. The first with a matching answer wins.
    pub scan: &'static [Tier],
    pub fallback: &'static str,
}

pub static WARRANTY: CategoryRule = CategoryRule {
    field: ConditionField::Warranty,
    sources: &[AnswerCategory::Warranty],
    key_gated: false,
    scan: &[
        tier("W2", "Out Of Warranty"),
        tier("W1", "Under Warranty"),
    ],
    fallback: "W1",
};

pub static CORE: CategoryRule = CategoryRule {
    field: ConditionField::Core,
    sources: &[AnswerCategory::Core],
    key_gated: false,
    scan: &[
        tier(CORE_FAILURE_CODE, "Not Powering On"),
        tier("CR1", "Powering On"),
    ],
    fallback: "CR1",
};

pub static DISPLAY: CategoryRule = CategoryRule {
    field: ConditionField::Display,
    sources: &[AnswerCategory::Display],
    key_gated: false,
    scan: &[
        tier("D3", "Cracked Or Dead Pixels"),
        tier("D2", "Minor Scratches On Screen"),
        tier("D1", "Flawless Display"),
    ],
    fallback: "D1",
};

pub static FUNCTIONAL_MAJOR: CategoryRule = CategoryRule {
    field: ConditionField::FunctionalMajor,
    sources: &[AnswerCategory::FunctionalMajor],
    key_gated: true,
    scan: &[
        tier("MJ3", "Not Working"),
        tier("MJ2", "Partially Working"),
        tier("MJ1", "Working"),
    ],
    fallback: "MJ1",
};

pub static FUNCTIONAL_MINOR: CategoryRule = CategoryRule {
    field: ConditionField::FunctionalMinor,
    sources: &[AnswerCategory::FunctionalMinor],
    key_gated: true,
    scan: &[
        tier("MN3", "Not Working"),
        tier("MN2", "Partially Working"),
        tier("MN1", "Working"),
    ],
    fallback: "MN1",
};

pub static COSMETICS: CategoryRule = CategoryRule {
    field: ConditionField::Cosmetics,
    sources: &[AnswerCategory::Cosmetics, AnswerCategory::Physical],
    key_gated: false,
    scan: &[
        tier("C4", "Broken Body"),
        tier("C3", "Major Scratches"),
        tier("C2", "Minor Scratches"),
        tier("C1", "Flawless"),
    ],
    fallback: "C1",
};

/// Watches only distinguish a working unit; anything else falls back.
pub static FUNCTIONAL: CategoryRule = CategoryRule {
    field: ConditionField::Functional,
    sources: &[AnswerCategory::Functional],
    key_gated: true,
    scan: &[tier("F1", "Working")],
    fallback: "F1_1",
};

/// "No accessories" outranks the full box, which outranks charger only.
pub static ACCESSORIES: CategoryRule = CategoryRule {
    field: ConditionField::Accessories,
    sources: &[AnswerCategory::Accessories],
    key_gated: false,
    scan: &[
        tier("A3", "No Accessories"),
        tier("A1", "Box And Charger"),
        tier("A2", "Charger Only"),
    ],
    fallback: "A2",
};

// ---------------------------------------------------------------------------
// Device profiles
// ---------------------------------------------------------------------------

/// Rules and table shape used to grade one kind of device.
#[derive(Debug)]
pub struct DeviceProfile {
    pub kind: DeviceKind,
    pub shape: ConditionShape,
    /// One rule per field of `shape`.
    pub rules: &'static [&'static CategoryRule],
}

pub static PHONE_PROFILE: DeviceProfile = DeviceProfile {
    kind: DeviceKind::Phone,
    shape: ConditionShape::Standard,
    rules: &[
        &WARRANTY,
        &CORE,
        &DISPLAY,
        &FUNCTIONAL_MAJOR,
        &FUNCTIONAL_MINOR,
        &COSMETICS,
        &ACCESSORIES,
    ],
};

/// Tablets share the standard table with phones, so they answer every
/// standard field, warranty included.
pub static TABLET_PROFILE: DeviceProfile = DeviceProfile {
    kind: DeviceKind::Tablet,
    shape: ConditionShape::Standard,
    rules: &[
        &WARRANTY,
        &CORE,
        &DISPLAY,
        &FUNCTIONAL_MAJOR,
        &FUNCTIONAL_MINOR,
        &COSMETICS,
        &ACCESSORIES,
    ],
};

pub static WATCH_PROFILE: DeviceProfile = DeviceProfile {
    kind: DeviceKind::Watch,
    shape: ConditionShape::Watch,
    rules: &[&COSMETICS, &FUNCTIONAL, &ACCESSORIES],
};

impl DeviceProfile {
    pub fn for_kind(kind: DeviceKind) -> &'static DeviceProfile {
        match kind {
            DeviceKind::Phone => &PHONE_PROFILE,
            DeviceKind::Tablet => &TABLET_PROFILE,
            DeviceKind::Watch => &WATCH_PROFILE,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Codes derived from one questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub device_type: DeviceKind,
    pub shape: ConditionShape,
    pub codes: ConditionQuery,
    pub core_failure: bool,
}

fn answer_matches(rule: &CategoryRule, tier: &Tier, answer: &QuestionnaireAnswer) -> bool {
    rule.sources.contains(&answer.category)
        && (!rule.key_gated || answer.is_flagged())
        && answer.answer.trim().eq_ignore_ascii_case(tier.label)
}

/// Code for one category: the first tier in scan order with a matching
/// answer, else the rule's fallback.
pub fn classify_category(rule: &CategoryRule, answers: &[QuestionnaireAnswer]) -> &'static str {
    rule.scan
        .iter()
        .find(|tier| answers.iter().any(|answer| answer_matches(rule, tier, answer)))
        .map_or(rule.fallback, |tier| tier.code)
}

/// Classify a questionnaire for a device kind.
pub fn classify(kind: DeviceKind, answers: &[QuestionnaireAnswer]) -> Classification {
    let profile = DeviceProfile::for_kind(kind);

    let mut codes = ConditionQuery::new();
    for rule in profile.rules {
        codes.set(rule.field, classify_category(rule, answers));
    }

    Classification {
        device_type: kind,
        shape: profile.shape,
        core_failure: codes.is_core_failure(),
        codes,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::AnswerCategory as Cat;

    fn answer(category: AnswerCategory, text: &str) -> QuestionnaireAnswer {
        QuestionnaireAnswer::new(category, text)
    }

    fn keyed(category: AnswerCategory, text: &str) -> QuestionnaireAnswer {
        QuestionnaireAnswer::new(category, text).with_key("yes")
    }

    // -- fallback ordering --

    #[test]
    fn empty_answers_fall_back_for_every_rule() {
        for rule in [
            &WARRANTY,
            &CORE,
            &DISPLAY,
            &FUNCTIONAL_MAJOR,
            &FUNCTIONAL_MINOR,
            &COSMETICS,
            &FUNCTIONAL,
            &ACCESSORIES,
        ] {
            assert_eq!(classify_category(rule, &[]), rule.fallback);
        }
    }

    #[test]
    fn worst_matching_tier_wins() {
        let answers = [
            answer(Cat::Cosmetics, "Minor Scratches"),
            answer(Cat::Cosmetics, "Broken Body"),
            answer(Cat::Cosmetics, "Flawless"),
        ];
        assert_eq!(classify_category(&COSMETICS, &answers), "C4");
    }

    #[test]
    fn physical_answers_feed_cosmetics() {
        let answers = [answer(Cat::Physical, "Major Scratches")];
        assert_eq!(classify_category(&COSMETICS, &answers), "C3");
    }

    #[test]
    fn accessories_scan_order_is_tier3_tier1_tier2() {
        let both = [
            answer(Cat::Accessories, "Charger Only"),
            answer(Cat::Accessories, "Box And Charger"),
        ];
        assert_eq!(classify_category(&ACCESSORIES, &both), "A1");

        let all = [
            answer(Cat::Accessories, "Charger Only"),
            answer(Cat::Accessories, "No Accessories"),
            answer(Cat::Accessories, "Box And Charger"),
        ];
        assert_eq!(classify_category(&ACCESSORIES, &all), "A3");
    }

    #[test]
    fn label_match_is_trimmed_and_case_insensitive() {
        let answers = [answer(Cat::Display, "  cracked or dead PIXELS ")];
        assert_eq!(classify_category(&DISPLAY, &answers), "D3");
    }

    #[test]
    fn answers_from_other_categories_are_ignored() {
        let answers = [answer(Cat::Display, "Out Of Warranty")];
        assert_eq!(classify_category(&WARRANTY, &answers), "W1");
    }

    #[test]
    fn unknown_answer_text_falls_back() {
        let answers = [answer(Cat::Core, "Sometimes")];
        assert_eq!(classify_category(&CORE, &answers), "CR1");
    }

    // -- key flag gating --

    #[test]
    fn unflagged_functional_answers_do_not_count() {
        let answers = [
            answer(Cat::FunctionalMajor, "Not Working"),
            QuestionnaireAnswer::new(Cat::FunctionalMajor, "Partially Working").with_key("no"),
        ];
        assert_eq!(classify_category(&FUNCTIONAL_MAJOR, &answers), "MJ1");
    }

    #[test]
    fn flagged_functional_answers_count() {
        let answers = [
            answer(Cat::FunctionalMinor, "Not Working"),
            keyed(Cat::FunctionalMinor, "Partially Working"),
        ];
        assert_eq!(classify_category(&FUNCTIONAL_MINOR, &answers), "MN2");
    }

    #[test]
    fn key_flag_is_irrelevant_outside_functional_categories() {
        let answers =
            [QuestionnaireAnswer::new(Cat::Display, "Minor Scratches On Screen").with_key("no")];
        assert_eq!(classify_category(&DISPLAY, &answers), "D2");
    }

    #[test]
    fn watch_functional_only_checks_working() {
        assert_eq!(
            classify_category(&FUNCTIONAL, &[keyed(Cat::Functional, "Working")]),
            "F1"
        );
        assert_eq!(
            classify_category(&FUNCTIONAL, &[keyed(Cat::Functional, "Not Working")]),
            "F1_1"
        );
    }

    // -- profiles --

    #[test]
    fn phone_profile_fills_standard_shape() {
        let result = classify(DeviceKind::Phone, &[]);
        assert_eq!(result.shape, ConditionShape::Standard);
        for field in ConditionShape::Standard.fields() {
            assert!(result.codes.get(*field).is_some(), "missing {field:?}");
        }
        assert_eq!(result.codes.get(ConditionField::Warranty), Some("W1"));
        assert!(!result.core_failure);
    }

    #[test]
    fn tablet_grades_warranty_like_a_phone() {
        let out_of_warranty = classify(
            DeviceKind::Tablet,
            &[answer(Cat::Warranty, "Out Of Warranty")],
        );
        assert_eq!(out_of_warranty.shape, ConditionShape::Standard);
        assert_eq!(out_of_warranty.codes.get(ConditionField::Warranty), Some("W2"));

        let unanswered = classify(DeviceKind::Tablet, &[]);
        assert_eq!(unanswered.codes.get(ConditionField::Warranty), Some("W1"));
        assert_eq!(unanswered.codes.stripped().len(), ConditionShape::Standard.fields().len());
    }

    #[test]
    fn watch_profile_uses_watch_shape() {
        let answers = [
            answer(Cat::Cosmetics, "Minor Scratches"),
            keyed(Cat::Functional, "Working"),
            answer(Cat::Accessories, "Box And Charger"),
        ];
        let result = classify(DeviceKind::Watch, &answers);
        assert_eq!(result.shape, ConditionShape::Watch);
        assert_eq!(
            result.codes,
            ConditionQuery::new()
                .with(ConditionField::Cosmetics, "C2")
                .with(ConditionField::Functional, "F1")
                .with(ConditionField::Accessories, "A1")
        );
    }

    #[test]
    fn core_failure_is_flagged() {
        let result = classify(DeviceKind::Phone, &[answer(Cat::Core, "Not Powering On")]);
        assert_eq!(result.codes.get(ConditionField::Core), Some(CORE_FAILURE_CODE));
        assert!(result.core_failure);
    }

    #[test]
    fn profile_rules_cover_exactly_their_shape() {
        for kind in [DeviceKind::Phone, DeviceKind::Tablet, DeviceKind::Watch] {
            let profile = DeviceProfile::for_kind(kind);
            assert_eq!(profile.kind, kind);
            let mut fields: Vec<_> = profile
                .rules
                .iter()
                .map(|rule| rule.field)
                .collect();
            fields.sort();
            let mut expected = profile.shape.fields().to_vec();
            expected.sort();
            assert_eq!(fields, expected, "{kind}");
        }
    }
}
