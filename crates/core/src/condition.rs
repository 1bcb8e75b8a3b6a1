//! Composite condition resolution.
//!
//! Per-category codes from the classification engine are assembled into a
//! [`ConditionQuery`]. The resolver strips empty codes and looks the rest up
//! in the condition table for the device's [`ConditionShape`]; exactly one
//! matching record must exist.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classification::CORE_FAILURE_CODE;
use crate::error::CoreError;
use crate::grade::Grade;
use crate::store::ConditionGradeStore;

// ---------------------------------------------------------------------------
// Fields and shapes
// ---------------------------------------------------------------------------

/// A column of a condition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionField {
    #[serde(rename = "warrantyCode")]
    Warranty,
    #[serde(rename = "coreCode")]
    Core,
    #[serde(rename = "displayCode")]
    Display,
    #[serde(rename = "functionalMajorCode")]
    FunctionalMajor,
    #[serde(rename = "functionalMinorCode")]
    FunctionalMinor,
    #[serde(rename = "functionalCode")]
    Functional,
    #[serde(rename = "cosmeticsCode")]
    Cosmetics,
    #[serde(rename = "accessoriesCode")]
    Accessories,
}

impl ConditionField {
    /// Database column holding this code.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Warranty => "warranty_code",
            Self::Core => "core_code",
            Self::Display => "display_code",
            Self::FunctionalMajor => "functional_major_code",
            Self::FunctionalMinor => "functional_minor_code",
            Self::Functional => "functional_code",
            Self::Cosmetics => "cosmetics_code",
            Self::Accessories => "accessories_code",
        }
    }

    /// Short name used in import headers and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Warranty => "warranty",
            Self::Core => "core",
            Self::Display => "display",
            Self::FunctionalMajor => "funcMajor",
            Self::FunctionalMinor => "funcMinor",
            Self::Functional => "functional",
            Self::Cosmetics => "cosmetics",
            Self::Accessories => "accessories",
        }
    }
}

/// Key layout of a condition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionShape {
    /// Phones and tablets.
    #[default]
    Standard,
    /// Smart watches: cosmetics, functional and accessories only.
    Watch,
}

const STANDARD_FIELDS: &[ConditionField] = &[
    ConditionField::Warranty,
    ConditionField::Core,
    ConditionField::Display,
    ConditionField::FunctionalMajor,
    ConditionField::FunctionalMinor,
    ConditionField::Cosmetics,
    ConditionField::Accessories,
];

const WATCH_FIELDS: &[ConditionField] = &[
    ConditionField::Cosmetics,
    ConditionField::Functional,
    ConditionField::Accessories,
];

impl ConditionShape {
    /// Columns forming the natural key of a record of this shape.
    pub fn fields(&self) -> &'static [ConditionField] {
        match self {
            Self::Standard => STANDARD_FIELDS,
            Self::Watch => WATCH_FIELDS,
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Self::Standard => "condition_grades",
            Self::Watch => "watch_condition_grades",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Watch => "watch",
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Field → code mapping used both as a lookup filter and as a record key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionQuery(BTreeMap<ConditionField, String>);

impl ConditionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: ConditionField, code: impl Into<String>) {
        self.0.insert(field, code.into());
    }

    /// Builder-style variant of [`ConditionQuery::set`].
    pub fn with(mut self, field: ConditionField, code: impl Into<String>) -> Self {
        self.set(field, code);
        self
    }

    pub fn get(&self, field: ConditionField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Copy of this query without empty codes. Unset categories do not filter.
    pub fn stripped(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(_, code)| !code.is_empty())
                .map(|(field, code)| (*field, code.clone()))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConditionField, &str)> {
        self.0.iter().map(|(field, code)| (*field, code.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `self` selects a record keyed by `key`: every field in `self`
    /// must be present in `key` with the same code.
    pub fn matches(&self, key: &ConditionQuery) -> bool {
        self.0
            .iter()
            .all(|(field, code)| key.get(*field) == Some(code.as_str()))
    }

    /// Whether the core code signals a device that does not power on.
    pub fn is_core_failure(&self) -> bool {
        self.get(ConditionField::Core) == Some(CORE_FAILURE_CODE)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A row of a condition table: the full key of its shape plus a grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionGradeRecord {
    pub shape: ConditionShape,
    pub codes: ConditionQuery,
    pub grade: Grade,
}

impl ConditionGradeRecord {
    /// Build a record, checking that `codes` holds exactly the fields of
    /// `shape`. Empty codes are valid values.
    pub fn new(
        shape: ConditionShape,
        codes: ConditionQuery,
        grade: Grade,
    ) -> Result<Self, CoreError> {
        for field in shape.fields() {
            if codes.get(*field).is_none() {
                return Err(CoreError::Validation(format!(
                    "missing condition field '{}'",
                    field.name()
                )));
            }
        }
        if let Some((field, _)) = codes.iter().find(|(f, _)| !shape.fields().contains(f)) {
            return Err(CoreError::Validation(format!(
                "field '{}' is not part of the {} condition table",
                field.name(),
                shape.as_str()
            )));
        }
        Ok(Self {
            shape,
            codes,
            grade,
        })
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolve the overall grade for a set of category codes.
///
/// A core failure short-circuits to [`Grade::LOWEST`] without touching the
/// store. Otherwise empty codes are stripped and the store must return
/// exactly one grade: none is `NotFound`, several is an `Integrity` error.
pub async fn resolve_condition_grade<S>(
    store: &S,
    shape: ConditionShape,
    codes: &ConditionQuery,
) -> Result<Grade, CoreError>
where
    S: ConditionGradeStore + ?Sized,
{
    if codes.is_core_failure() {
        return Ok(Grade::LOWEST);
    }

    let filter = codes.stripped();
    if filter.is_empty() {
        return Err(CoreError::Validation(
            "condition query has no codes to match".to_string(),
        ));
    }

    let grades = store.matching_grades(shape, &filter).await?;
    match grades.as_slice() {
        [grade] => Ok(*grade),
        [] => Err(CoreError::NotFound {
            entity: "ConditionGrade",
            key: describe(&filter),
        }),
        many => Err(CoreError::Integrity(format!(
            "{} condition records match {}",
            many.len(),
            describe(&filter)
        ))),
    }
}

fn describe(query: &ConditionQuery) -> String {
    query
        .iter()
        .map(|(field, code)| format!("{}={code}", field.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
