//! Fixed illustrative degradation formula for the two derived features.
//!
//! This is a deterministic placeholder, not a learned regression. The form
//! of the calculation, both caps, and their order of application are part of
//! the inference contract and must not change.

/// Corrosion impact percent assumed when the user does not supply one.
pub const DEFAULT_CORROSION_IMPACT_PERCENT: f32 = 15.0;

/// Thickness loss in mm per year per percent of corrosion impact.
pub const CORROSION_RATE_MM_PER_YEAR_PER_PERCENT: f32 = 0.05;

/// Derived degradation figures fed to the classifier and shown to the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegradationEstimate {
    /// Estimated thickness loss over the prediction horizon, mm.
    pub thickness_loss_mm: f32,
    /// Estimated material loss as a percentage of the initial thickness.
    pub material_loss_percent: f32,
}

/// Estimate thickness and material loss for a prediction horizon.
///
/// Thickness loss is capped at 95% of the initial thickness before the
/// material-loss percentage is derived; the percentage is then capped at
/// 100. The cap order matters and is covered by tests.
pub fn estimate(years: f32, initial_thickness_mm: f32) -> DegradationEstimate {
    let mut thickness_loss_mm = years
        * (DEFAULT_CORROSION_IMPACT_PERCENT / 100.0)
        * CORROSION_RATE_MM_PER_YEAR_PER_PERCENT;
    let cap = initial_thickness_mm * 0.95;
    if thickness_loss_mm > cap {
        thickness_loss_mm = cap;
    }

    let mut material_loss_percent = (thickness_loss_mm / initial_thickness_mm) * 100.0;
    if material_loss_percent > 100.0 {
        material_loss_percent = 100.0;
    }

    DegradationEstimate {
        thickness_loss_mm,
        material_loss_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_example_values() {
        // years=10, impact=15.0, rate=0.05 -> 0.075mm; thickness 15.0 -> 0.5%.
        let est = estimate(10.0, 15.0);
        assert!((est.thickness_loss_mm - 0.075).abs() < 1e-6);
        assert!((est.material_loss_percent - 0.5).abs() < 1e-5);
    }

    #[test]
    fn thickness_loss_is_capped_at_95_percent() {
        // 30 years at the default rate would lose 0.225mm; a 0.1mm wall caps
        // at 0.095mm and the percentage lands at exactly 95.
        let est = estimate(30.0, 0.1);
        assert!((est.thickness_loss_mm - 0.095).abs() < 1e-6);
        assert!((est.material_loss_percent - 95.0).abs() < 1e-3);
    }

    #[test]
    fn zero_years_means_zero_loss() {
        let est = estimate(0.0, 15.0);
        assert_eq!(est.thickness_loss_mm, 0.0);
        assert_eq!(est.material_loss_percent, 0.0);
    }
}
