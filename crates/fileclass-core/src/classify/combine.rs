use std::collections::HashSet;

use super::fallback::default_classification;
use super::ClassificationResult;

/// Multiplier applied to the mean confidence of agreeing candidates
pub const AGREEMENT_BOOST: f64 = 1.2;

/// Reasoning entries kept in a combined result
pub const MAX_REASONS: usize = 5;

/// Merge candidate results into one.
///
/// The highest-confidence candidate wins; ties go to the earlier candidate.
/// When other candidates share the winner's category, the confidence becomes
/// `min(mean × 1.2, 1.0)`. Reasoning is the deduplicated union of every
/// candidate's reasoning in ranked order, capped at [`MAX_REASONS`].
pub fn combine(candidates: &[ClassificationResult]) -> ClassificationResult {
    let mut ranked: Vec<&ClassificationResult> = candidates.iter().collect();
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let Some(best) = ranked.first().copied() else {
        return default_classification("");
    };

    let agreeing: Vec<f64> = ranked
        .iter()
        .filter(|r| r.category == best.category)
        .map(|r| r.confidence)
        .collect();
    let confidence = if agreeing.len() > 1 {
        let mean = agreeing.iter().sum::<f64>() / agreeing.len() as f64;
        (mean * AGREEMENT_BOOST).min(1.0)
    } else {
        best.confidence
    };

    let mut seen = HashSet::new();
    let reasoning = ranked
        .iter()
        .flat_map(|r| r.reasoning.iter().map(String::as_str))
        .filter(|reason| seen.insert(*reason))
        .take(MAX_REASONS)
        .map(str::to_string)
        .collect();

    ClassificationResult {
        category: best.category.clone(),
        subcategory: best.subcategory.clone(),
        confidence: clamp_confidence(confidence),
        suggested_path: best.suggested_path.clone(),
        reasoning,
    }
}

/// Rule priors from a hand-edited file may lie outside 0.0-1.0
fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}
