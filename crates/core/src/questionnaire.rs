//! Questionnaire answers submitted with a pricing request.
//!
//! The wire payload groups answers by category:
//!
//! ```json
//! { "cosmetics": [{ "quetion": "Body condition", "answer": "Minor Scratches" }],
//!   "functionalMajor": [{ "quetion": "Camera", "answer": "Not Working", "key": "yes" }] }
//! ```
//!
//! `quetion` is the field name clients send; `question` is accepted too.
//! [`QuestionnairePayload::answers`] flattens the groups into a list of
//! [`QuestionnaireAnswer`] for the classification engine.

use serde::{Deserialize, Deserializer, Serialize};

/// Category a diagnostic question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerCategory {
    Core,
    Cosmetics,
    Display,
    FunctionalMajor,
    FunctionalMinor,
    Functional,
    Warranty,
    Accessories,
    Physical,
}

impl AnswerCategory {
    /// Functional categories only count answers whose key flag is "yes".
    pub fn is_key_gated(&self) -> bool {
        matches!(
            self,
            Self::FunctionalMajor | Self::FunctionalMinor | Self::Functional
        )
    }
}

/// One answer to one diagnostic question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionnaireAnswer {
    pub category: AnswerCategory,
    pub question: String,
    pub answer: String,
    pub key_flag: Option<String>,
}

impl QuestionnaireAnswer {
    pub fn new(category: AnswerCategory, answer: &str) -> Self {
        Self {
            category,
            question: String::new(),
            answer: answer.to_string(),
            key_flag: None,
        }
    }

    /// Builder-style setter for the key flag.
    pub fn with_key(mut self, flag: &str) -> Self {
        self.key_flag = Some(flag.to_string());
        self
    }

    /// Whether the key flag is set to "yes" (case-insensitive).
    pub fn is_flagged(&self) -> bool {
        self.key_flag
            .as_deref()
            .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("yes"))
    }
}

/// A single answer as sent by clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerEntry {
    #[serde(rename = "quetion", alias = "question", default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    /// "yes"/"no"; JSON booleans are accepted and normalized.
    #[serde(default, deserialize_with = "deserialize_key_flag")]
    pub key: Option<String>,
}

/// Answers grouped by category. Missing or `null` groups are empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnairePayload {
    #[serde(default)]
    pub core: Option<Vec<AnswerEntry>>,
    #[serde(default)]
    pub cosmetics: Option<Vec<AnswerEntry>>,
    #[serde(default)]
    pub display: Option<Vec<AnswerEntry>>,
    #[serde(default)]
    pub functional_major: Option<Vec<AnswerEntry>>,
    #[serde(default)]
    pub functional_minor: Option<Vec<AnswerEntry>>,
    #[serde(default)]
    pub functional: Option<Vec<AnswerEntry>>,
    #[serde(default)]
    pub warranty: Option<Vec<AnswerEntry>>,
    #[serde(default)]
    pub accessories: Option<Vec<AnswerEntry>>,
    #[serde(default)]
    pub physical: Option<Vec<AnswerEntry>>,
}

impl QuestionnairePayload {
    /// Flatten all groups into answers tagged with their category.
    pub fn answers(&self) -> Vec<QuestionnaireAnswer> {
        let groups = [
            (AnswerCategory::Core, &self.core),
            (AnswerCategory::Cosmetics, &self.cosmetics),
            (AnswerCategory::Display, &self.display),
            (AnswerCategory::FunctionalMajor, &self.functional_major),
            (AnswerCategory::FunctionalMinor, &self.functional_minor),
            (AnswerCategory::Functional, &self.functional),
            (AnswerCategory::Warranty, &self.warranty),
            (AnswerCategory::Accessories, &self.accessories),
            (AnswerCategory::Physical, &self.physical),
        ];

        groups
            .into_iter()
            .flat_map(|(category, entries)| {
                entries
                    .iter()
                    .flatten()
                    .map(move |entry| QuestionnaireAnswer {
                        category,
                        question: entry.question.clone(),
                        answer: entry.answer.clone(),
                        key_flag: entry.key.clone(),
                    })
            })
            .collect()
    }
}

fn deserialize_key_flag<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Bool(true)) => Ok(Some("yes".to_string())),
        Some(serde_json::Value::Bool(false)) => Ok(Some("no".to_string())),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "key must be \"yes\", \"no\" or a boolean, got {other}"
        ))),
    }
}
