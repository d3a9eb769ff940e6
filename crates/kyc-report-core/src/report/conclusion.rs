use crate::types::{RiskClassification, Score};

const DESCRIPTION_LIMIT: usize = 300;

const GENERIC_CLOSING: &str =
    "All six risk categories have been assessed and no further recommendations were provided.";

/// Conclusion paragraph: a verdict sentence followed by the company
/// description (first 300 characters), else the first recommendation, else a
/// generic closing sentence.
pub fn assemble_conclusion(
    company_name: &str,
    overall_score: Score,
    classification: RiskClassification,
    company_description: Option<&str>,
    recommendations: &[String],
) -> String {
    let verdict = format!(
        "Based on comprehensive open-source investigation, {} presents a {} profile with a final risk score of {:.1}/10.",
        company_name,
        classification.headline(),
        overall_score
    );

    let description = company_description
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let closing = match description {
        Some(d) => truncate_chars(d, DESCRIPTION_LIMIT),
        None => recommendations
            .iter()
            .map(|r| r.trim())
            .find(|r| !r.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_CLOSING.to_string()),
    };

    format!("{} {}", verdict, closing)
}

/// First `limit` characters of `text`, with `...` appended when cut.
fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}
