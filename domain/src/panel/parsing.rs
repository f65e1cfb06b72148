//! Agent response parsing.
//!
//! These functions extract structured opinions from raw inference output.
//! They are pure domain logic: no I/O, just text and JSON handling.
//!
//! | Function | Role | Expected JSON |
//! |----------|------|---------------|
//! | [`parse_opinion`] | first pass | `{"diagnoses": [{"label", "confidence"}], "rationale"}` |
//! | [`parse_critique`] | Devil's Advocate | `{"concerns": [{"concern", "severity", "referenced_labels"}], "rationale"}` |
//!
//! The object may be wrapped in prose or a fenced code block; the first
//! balanced `{ … }` object is used. A response that stops mid-object (the
//! model hit its token limit) is repaired: the incomplete trailing field is
//! dropped and the open brackets are closed.

use super::critique::{CritiqueNote, Severity};
use super::result::RankedDiagnosis;
use serde::Deserialize;
use std::borrow::Cow;
use thiserror::Error;

/// Why a response could not be interpreted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no JSON object found in response")]
    NoJson,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

/// A first-pass agent's parsed answer
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOpinion {
    /// Sorted by descending confidence; ties keep the agent's order
    pub diagnoses: Vec<RankedDiagnosis>,
    pub rationale: String,
}

/// The Devil's Advocate's parsed answer
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCritique {
    pub concerns: Vec<CritiqueNote>,
    pub rationale: String,
}

#[derive(Deserialize)]
struct RawOpinion {
    #[serde(default, alias = "differential")]
    diagnoses: Vec<RawDiagnosis>,
    #[serde(default)]
    rationale: String,
}

#[derive(Deserialize)]
struct RawDiagnosis {
    #[serde(alias = "diagnosis", alias = "name")]
    label: String,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Deserialize)]
struct RawCritique {
    #[serde(default, alias = "critique_notes", alias = "flags")]
    concerns: Vec<RawConcern>,
    #[serde(default)]
    rationale: String,
}

#[derive(Deserialize)]
struct RawConcern {
    concern: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default, alias = "labels")]
    referenced_labels: Vec<String>,
}

/// Parse a first-pass agent's response.
///
/// Entries with blank labels, missing or non-finite confidences are
/// dropped; remaining confidences are clamped to [0, 1].
pub fn parse_opinion(response: &str) -> Result<ParsedOpinion, ParseError> {
    let raw: RawOpinion = extract_json(response)?;

    let mut diagnoses: Vec<RankedDiagnosis> = raw
        .diagnoses
        .into_iter()
        .filter_map(|d| {
            let confidence = d.confidence.filter(|c| c.is_finite())?;
            let label = d.label.trim();
            if label.is_empty() {
                return None;
            }
            Some(RankedDiagnosis::new(label, confidence))
        })
        .collect();

    // stable: equal confidences keep the agent's own ranking
    diagnoses.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    Ok(ParsedOpinion {
        diagnoses,
        rationale: raw.rationale.trim().to_string(),
    })
}

/// Parse the Devil's Advocate's response.
///
/// Unknown or missing severities are read as `Warning`; blank concerns are
/// dropped.
pub fn parse_critique(response: &str) -> Result<ParsedCritique, ParseError> {
    let raw: RawCritique = extract_json(response)?;

    let concerns = raw
        .concerns
        .into_iter()
        .filter(|c| !c.concern.trim().is_empty())
        .map(|c| {
            let severity = c
                .severity
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Severity::Warning);
            CritiqueNote::new(c.concern.trim(), severity, c.referenced_labels)
        })
        .collect();

    Ok(ParsedCritique {
        concerns,
        rationale: raw.rationale.trim().to_string(),
    })
}

fn extract_json<T: for<'de> Deserialize<'de>>(response: &str) -> Result<T, ParseError> {
    let start = response.find('{').ok_or(ParseError::NoJson)?;
    let body = &response[start..];
    let text = match scan_object(body) {
        ObjectSpan::Complete(end) => Cow::Borrowed(&body[..=end]),
        ObjectSpan::Truncated(Some(repaired)) => Cow::Owned(repaired),
        ObjectSpan::Truncated(None) => {
            return Err(ParseError::InvalidJson("truncated JSON object".to_string()));
        }
    };
    serde_json::from_str(&text).map_err(|e| ParseError::InvalidJson(e.to_string()))
}

/// Extent of the object opening at byte 0 of a response body
enum ObjectSpan {
    /// Byte index of the matching close brace
    Complete(usize),
    /// The text ended first; the repaired object, if any complete value
    /// survived
    Truncated(Option<String>),
}

fn scan_object(body: &str) -> ObjectSpan {
    let mut open: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    // (end of the last complete value, open brackets at that point); only
    // pushes happen after it, so the first `depth` entries are still valid
    let mut cut: Option<(usize, usize)> = None;

    for (i, b) in body.bytes().enumerate() {
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
            b'{' | b'[' => open.push(b),
            b'}' | b']' => {
                open.pop();
                if open.is_empty() {
                    return ObjectSpan::Complete(i);
                }
                cut = Some((i + 1, open.len()));
            }
            b',' => cut = Some((i, open.len())),
            _ => {}
        }
    }

    ObjectSpan::Truncated(cut.map(|(keep, depth)| {
        let mut repaired = body[..keep].to_string();
        repaired.extend(
            open[..depth]
                .iter()
                .rev()
                .map(|b| if *b == b'{' { '}' } else { ']' }),
        );
        repaired
    }))
}
