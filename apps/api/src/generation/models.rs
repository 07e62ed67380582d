//! Request and result types for the document pipelines.
//!
//! Everything here is request-scoped: built per call, discarded after the response.

use std::fmt;

use serde::{
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;

use crate::errors::GenerationError;

/// Score substituted when the model omits or garbles `ats_score`.
pub const DEFAULT_ATS_SCORE: u8 = 82;
pub const ATS_SCORE_MIN: u8 = 75;
pub const ATS_SCORE_MAX: u8 = 95;

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

/// Implemented by every request body: required fields must be non-empty after trimming.
pub trait Validate {
    fn validate(&self) -> Result<(), GenerationError>;
}

fn require(field: &'static str, value: &str) -> Result<(), GenerationError> {
    if value.trim().is_empty() {
        return Err(GenerationError::Validation(field));
    }
    Ok(())
}

/// Trimmed value of an optional personalization field; blank counts as absent.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// POST /api/resume
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: String,
}

impl Validate for ResumeRequest {
    fn validate(&self) -> Result<(), GenerationError> {
        require("resume_text", &self.resume_text)?;
        require("jd_text", &self.jd_text)
    }
}

/// POST /api/cover-letter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub resume_context: String,
    #[serde(default)]
    pub jd_text: String,
    pub company: Option<String>,
    pub role: Option<String>,
}

impl Validate for CoverLetterRequest {
    fn validate(&self) -> Result<(), GenerationError> {
        require("resume_context", &self.resume_context)?;
        require("jd_text", &self.jd_text)
    }
}

/// POST /api/hr-message
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HrMessageRequest {
    #[serde(default)]
    pub resume_context: String,
    #[serde(default)]
    pub jd_text: String,
    pub recruiter_name: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
}

impl Validate for HrMessageRequest {
    fn validate(&self) -> Result<(), GenerationError> {
        require("resume_context", &self.resume_context)?;
        require("jd_text", &self.jd_text)
    }
}

/// POST /api/generate-all
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateAllRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: String,
    pub recruiter_name: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
}

impl Validate for GenerateAllRequest {
    fn validate(&self) -> Result<(), GenerationError> {
        require("resume_text", &self.resume_text)?;
        require("jd_text", &self.jd_text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume record
// ────────────────────────────────────────────────────────────────────────────

/// Ordered label → text mapping (contact details, skill categories).
///
/// Keeps the model's key order: skill categories are listed JD-relevant first.
/// Order survives only when deserialized straight from text, not via `serde_json::Value`.
/// Values are lenient: numbers and booleans are rendered to text, null becomes "".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledFields(Vec<(String, String)>);

impl LabeledFields {
    #[cfg(test)]
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for LabeledFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LabeledFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabeledFieldsVisitor;

        impl<'de> Visitor<'de> for LabeledFieldsVisitor {
            type Value = LabeledFields;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of label/text pairs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, String)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    let text = value_to_text(&value).map_err(de::Error::custom)?;
                    // Later duplicates win, keeping the first position.
                    match entries.iter_mut().find(|entry| entry.0 == key) {
                        Some(slot) => slot.1 = text,
                        None => entries.push((key, text)),
                    }
                }
                Ok(LabeledFields(entries))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(LabeledFields::default())
            }
        }

        deserializer.deserialize_any(LabeledFieldsVisitor)
    }
}

/// Renders a scalar JSON value as text. Arrays of scalars are comma-joined
/// (models sometimes emit a skill category as a list).
fn value_to_text(value: &Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Result<Vec<_>, _>>()
            .map(|parts| parts.join(", ")),
        Value::Object(_) => Err("expected text, found an object".to_string()),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    value_to_text(&value).map_err(de::Error::custom)
}

fn lenient_text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|v| value_to_text(v).map_err(de::Error::custom))
            .collect(),
        other => Err(de::Error::custom(format!("expected a list, found {other}"))),
    }
}

/// Accepts 88, 88.4 or "88"; anything else yields `None` so the caller can default.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let score = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    };
    Ok(score)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub degree: String,
    #[serde(deserialize_with = "lenient_text")]
    pub school: String,
    #[serde(deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(deserialize_with = "lenient_text")]
    pub start: String,
    #[serde(deserialize_with = "lenient_text")]
    pub end: String,
    /// Empty when the source resume has no GPA.
    #[serde(deserialize_with = "lenient_text")]
    pub gpa: String,
    #[serde(deserialize_with = "lenient_text")]
    pub coursework: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub company: String,
    #[serde(deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(deserialize_with = "lenient_text")]
    pub start: String,
    #[serde(deserialize_with = "lenient_text")]
    pub end: String,
    #[serde(deserialize_with = "lenient_text")]
    pub tech: String,
    /// Exactly 3 by prompt contract; deviations are logged, not rejected.
    #[serde(deserialize_with = "lenient_text_list")]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub tech: String,
    #[serde(deserialize_with = "lenient_text")]
    pub link: String,
    /// Exactly 2 by prompt contract.
    #[serde(deserialize_with = "lenient_text_list")]
    pub bullets: Vec<String>,
}

/// The validated output of the resume pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeRecord {
    pub name: String,
    pub contact: LabeledFields,
    pub education: Vec<EducationEntry>,
    pub skills: LabeledFields,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    /// Always within [ATS_SCORE_MIN, ATS_SCORE_MAX].
    pub ats_score: u8,
    pub matched_keywords: Vec<String>,
}

/// Raw shape as the model emits it. Required keys are checked by the normalizer
/// before this is deserialized; optional keys stay `Option` until defaults apply.
#[derive(Debug, Deserialize)]
pub(crate) struct RawResume {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    pub contact: LabeledFields,
    pub education: Vec<EducationEntry>,
    pub skills: LabeledFields,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub ats_score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub matched_keywords: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Combined result
// ────────────────────────────────────────────────────────────────────────────

/// Output of `generate_all`. Warnings are reported beside `data`, not inside it.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedResult {
    pub resume: ResumeRecord,
    /// Empty when cover-letter generation failed.
    pub cover_letter: String,
    /// Empty when HR-message generation failed.
    pub hr_message: String,
    #[serde(skip)]
    pub warnings: Vec<String>,
}
