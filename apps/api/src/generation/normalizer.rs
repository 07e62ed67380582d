//! Resume response normalizer — turns free-text model output into a validated `ResumeRecord`.
//!
//! The model is asked for bare JSON but routinely wraps it in code fences or
//! surrounds it with prose. Recovery order:
//! 1. strip a leading ```` ``` ```` / ```` ```json ```` fence and a trailing fence
//! 2. parse the cleaned text directly
//! 3. if that is not JSON at all, try each balanced `{...}` span left to right
//!
//! Required keys are checked on the parsed object so the error can name the
//! missing one; `ats_score` and `matched_keywords` are defaulted instead.

use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::GenerationError;
use crate::generation::models::{
    RawResume, ResumeRecord, ATS_SCORE_MAX, ATS_SCORE_MIN, DEFAULT_ATS_SCORE,
};

/// Top-level keys a resume object must carry (a `null` value counts as missing).
pub const REQUIRED_KEYS: [&str; 6] = [
    "name",
    "contact",
    "education",
    "skills",
    "experience",
    "projects",
];

const EXPERIENCE_BULLETS: usize = 3;
const PROJECT_BULLETS: usize = 2;

/// Parses and validates raw resume completion text.
pub fn normalize_resume(raw: &str) -> Result<ResumeRecord, GenerationError> {
    let cleaned = strip_code_fences(raw);

    let (source, object) =
        locate_object(cleaned).ok_or_else(|| GenerationError::malformed(raw))?;

    for key in REQUIRED_KEYS {
        if object.get(key).map_or(true, Value::is_null) {
            return Err(GenerationError::MissingField(key));
        }
    }

    // Re-read from text rather than from `object` so map key order survives.
    let parsed: RawResume = serde_json::from_str(source).map_err(|e| {
        warn!("Resume JSON has an unexpected shape: {e}");
        GenerationError::malformed(raw)
    })?;

    Ok(into_record(parsed))
}

fn into_record(raw: RawResume) -> ResumeRecord {
    let ats_score = match raw.ats_score {
        None => DEFAULT_ATS_SCORE,
        Some(score) => {
            let clamped = score.clamp(ATS_SCORE_MIN as i64, ATS_SCORE_MAX as i64) as u8;
            if clamped as i64 != score {
                warn!("ats_score {score} out of range, clamped to {clamped}");
            }
            clamped
        }
    };

    for exp in &raw.experience {
        if exp.bullets.len() != EXPERIENCE_BULLETS {
            warn!(
                "Experience '{}' has {} bullets (expected {EXPERIENCE_BULLETS})",
                exp.title,
                exp.bullets.len()
            );
        }
    }
    for project in &raw.projects {
        if project.bullets.len() != PROJECT_BULLETS {
            warn!(
                "Project '{}' has {} bullets (expected {PROJECT_BULLETS})",
                project.name,
                project.bullets.len()
            );
        }
    }

    ResumeRecord {
        name: raw.name,
        contact: raw.contact,
        education: raw.education,
        skills: raw.skills,
        experience: raw.experience,
        projects: raw.projects,
        ats_score,
        matched_keywords: raw.matched_keywords,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences (tag is case-insensitive).
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        text = rest.trim_start();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text
}

/// Returns the text slice that parsed and the object it parsed to.
///
/// Text that is valid JSON but not an object is rejected without a scan.
fn locate_object(text: &str) -> Option<(&str, Map<String, Value>)> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => return Some((text, object)),
        Ok(_) => return None,
        Err(_) => {}
    }

    // Every `{` is a candidate start, including ones nested in a span that
    // failed to parse or that never closes.
    let mut offset = 0;
    while let Some(start) = text[offset..].find('{').map(|i| offset + i) {
        if let Some(end) = balanced_object_end(text, start) {
            let candidate = &text[start..=end];
            if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(candidate) {
                return Some((candidate, object));
            }
        }
        offset = start + 1;
    }

    None
}

/// Given the byte index of a `{`, returns the byte index of its matching `}`.
///
/// Braces inside JSON string literals (including escaped quotes) are ignored.
/// Works on bytes: every delimiter is ASCII, and UTF-8 continuation bytes never
/// collide with ASCII.
fn balanced_object_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(start), Some(&b'{'));

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}
