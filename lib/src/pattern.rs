//! Far-field array-factor pattern synthesis
//!
//! Computes the beam pattern intensity of a weighted, steered linear
//! array over an angle sweep.

use crate::profile::{compute_weights, ProfileConfig};
use num_complex::Complex64;
use std::f64::consts::TAU;

/// One point of a beam pattern curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternPoint {
    /// Sweep angle in degrees
    pub angle_deg: f64,
    /// Linear intensity, in [0, 1] when the pattern is normalized
    pub intensity_lin: f64,
    /// Intensity in dB; negative infinity when the linear value is 0
    pub intensity_db: f64,
}

/// Convert a linear intensity to dB, mapping 0 to negative infinity
pub fn intensity_db(intensity_lin: f64) -> f64 {
    if intensity_lin == 0.0 {
        f64::NEG_INFINITY
    } else {
        10.0 * intensity_lin.log10()
    }
}

/// Default angle sweep from -90 to 90 degrees in 0.25 degree steps
pub fn default_angles() -> Vec<f64> {
    angle_sweep(-90.0, 90.0, 0.25)
}

/// Inclusive angle sweep, each value rounded to 6 decimal places
pub fn angle_sweep(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut angles = Vec::new();
    let mut angle = start;
    while angle <= end + 1e-9 {
        angles.push((angle * 1e6).round() / 1e6);
        angle += step;
    }
    angles
}

/// Compute the array-factor intensity pattern over the given sweep
///
/// When `normalized` is set the pattern is scaled so its peak linear
/// intensity is 1 (and 0 dB).
pub fn compute_pattern(config: &ProfileConfig, angles: &[f64], normalized: bool) -> Vec<PatternPoint> {
    let weights = compute_weights(config);
    let n = config.elements;
    let center = (n as f64 - 1.0) / 2.0;
    let wavenumber = TAU / config.wavelength();
    let pitch = config.element_pitch_meters();
    let sin_steer = config.steer_angle_rad().sin();

    let mut intensities = Vec::with_capacity(angles.len());
    for &angle_deg in angles {
        let sin_theta = angle_deg.to_radians().sin();
        let phase_step = wavenumber * pitch * (sin_theta - sin_steer);

        let mut factor = Complex64::new(0.0, 0.0);
        for (i, &w) in weights.iter().enumerate() {
            let psi = (i as f64 - center) * phase_step;
            factor += w * Complex64::from_polar(1.0, psi);
        }
        intensities.push(factor.norm_sqr());
    }

    let peak = intensities.iter().fold(0.0f64, |m, &v| m.max(v));
    let scale = if normalized && peak > 0.0 { 1.0 / peak } else { 1.0 };

    angles
        .iter()
        .zip(intensities.iter())
        .map(|(&angle_deg, &raw)| {
            let intensity_lin = raw * scale;
            PatternPoint {
                angle_deg,
                intensity_lin,
                intensity_db: intensity_db(intensity_lin),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{SpacingUnit, WindowSelection};

    fn rect_config(elements: usize, steer_angle_deg: f64) -> ProfileConfig {
        ProfileConfig {
            elements,
            spacing: 0.5,
            spacing_unit: SpacingUnit::Wavelength,
            frequency_hz: 5.0e6,
            wave_speed: 1540.0,
            steer_angle_deg,
            window: WindowSelection::Rectangular,
            focus_depth: None,
        }
    }

    #[test]
    fn test_default_angles_inclusive() {
        let angles = default_angles();
        assert_eq!(angles.len(), 721);
        assert_eq!(angles[0], -90.0);
        assert_eq!(*angles.last().unwrap(), 90.0);
        assert!((angles[1] - angles[0] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_angle_sweep_rounding() {
        let angles = angle_sweep(0.0, 1.0, 0.1);
        assert_eq!(angles.len(), 11);
        // Accumulated float error is rounded away at 6 decimals
        assert_eq!(angles[3], 0.3);
        assert_eq!(angles[10], 1.0);
    }

    #[test]
    fn test_rectangular_broadside_peak_at_zero() {
        let pattern = compute_pattern(&rect_config(4, 0.0), &default_angles(), true);
        let peak = pattern
            .iter()
            .max_by(|a, b| a.intensity_lin.partial_cmp(&b.intensity_lin).unwrap())
            .unwrap();
        assert_eq!(peak.angle_deg, 0.0);
        assert!((peak.intensity_lin - 1.0).abs() < 1e-12);
        assert!(peak.intensity_db.abs() < 1e-9);
    }

    #[test]
    fn test_steered_peak_moves() {
        let pattern = compute_pattern(&rect_config(32, 20.0), &default_angles(), true);
        let peak = pattern
            .iter()
            .max_by(|a, b| a.intensity_lin.partial_cmp(&b.intensity_lin).unwrap())
            .unwrap();
        assert!(
            (peak.angle_deg - 20.0).abs() <= 0.5,
            "steered peak found at {} degrees",
            peak.angle_deg
        );
    }

    #[test]
    fn test_unnormalized_peak_is_coherent_sum() {
        // At the steering angle all phasors align, so |AF|^2 = (sum w)^2
        let config = rect_config(8, 0.0);
        let pattern = compute_pattern(&config, &[0.0], false);
        assert!((pattern[0].intensity_lin - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_peak_unity() {
        let config = ProfileConfig {
            window: WindowSelection::Hamming,
            ..rect_config(16, 10.0)
        };
        let pattern = compute_pattern(&config, &default_angles(), true);
        let max = pattern.iter().fold(0.0f64, |m, p| m.max(p.intensity_lin));
        assert!((max - 1.0).abs() < 1e-12);
        assert!(pattern.iter().all(|p| p.intensity_lin <= 1.0 + 1e-12));
    }

    #[test]
    fn test_zero_intensity_maps_to_neg_infinity() {
        assert_eq!(intensity_db(0.0), f64::NEG_INFINITY);
        assert!((intensity_db(0.5) - (-3.0103)).abs() < 1e-3);
    }
}
