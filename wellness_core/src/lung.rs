//! Lung-health score: breath-hold time relative to resting pulse.

use crate::{Error, LungInput, LungResult, Result};

/// `score = breath_hold_seconds / pulse * 100`
///
/// The normalizer already rejects a pulse of zero or less; the check here
/// keeps the function total for callers that build `LungInput` directly.
pub fn lung_health_score(input: &LungInput) -> Result<LungResult> {
    if input.pulse <= 0.0 {
        return Err(Error::validation("pulse", "must be greater than zero"));
    }

    let score = input.breath_hold_seconds / input.pulse * 100.0;
    if !score.is_finite() {
        return Err(Error::Internal(format!(
            "lung score is not finite for breath hold {} s, pulse {}",
            input.breath_hold_seconds, input.pulse
        )));
    }
    tracing::info!("Lung health score calculated: {}", score);
    Ok(LungResult { score })
}
