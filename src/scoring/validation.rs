use super::config::ScoringWeights;

/// Validate the weight vector at startup.
/// Returns all violations at once (not just the first).
pub fn validate_weights(weights: &ScoringWeights) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (name, value) in [
        ("opportunity", weights.opportunity),
        ("peak", weights.peak),
        ("weekday", weights.weekday),
        ("market", weights.market),
        ("low_price", weights.low_price),
        ("competition", weights.competition),
    ] {
        if !value.is_finite() {
            errors.push(format!("weights.{}: must be a finite number", name));
        } else if value < 0.0 {
            errors.push(format!(
                "weights.{}: must be non-negative, got {}",
                name, value
            ));
        }
    }

    let sum = weights.sum();
    if sum.is_finite() && (sum - 1.0).abs() > 1e-6 {
        errors.push(format!("weights: must sum to 1.0, got {:.4}", sum));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
