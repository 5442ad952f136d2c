//! Per-element delay and phase computation
//!
//! Supports far-field (angle-only) steering and near-field focused
//! steering through a chosen focal point. Delays are relative to the
//! array center; under focused steering the center element is zero.

use crate::profile::ProfileConfig;
use std::f64::consts::TAU;

/// Parallel per-element delay and phase vectors
#[derive(Debug, Clone, PartialEq)]
pub struct PerElementDelays {
    /// Time delays in seconds
    pub time_delays: Vec<f64>,
    /// Phase offsets in radians at the operating frequency
    pub phase_radians: Vec<f64>,
}

/// Element x-positions in meters, centered at the array origin
pub fn element_positions(config: &ProfileConfig) -> Vec<f64> {
    let n = config.elements;
    let pitch = config.element_pitch_meters();
    let center = (n as f64 - 1.0) / 2.0;
    (0..n).map(|i| (i as f64 - center) * pitch).collect()
}

/// Compute per-element time delays and phase offsets for a profile
pub fn compute_delays(config: &ProfileConfig) -> PerElementDelays {
    let positions = element_positions(config);
    let theta = config.steer_angle_rad();
    let speed = config.wave_speed;

    let time_delays: Vec<f64> = if config.is_focused() {
        let depth = config.focus_depth.unwrap_or(0.0);
        // Focal point along the steering direction
        let focal_x = depth * theta.sin();
        let focal_z = depth * theta.cos();
        let reference_range = focal_x.hypot(focal_z);
        positions
            .iter()
            .map(|&x| {
                let range = (focal_x - x).hypot(focal_z);
                (range - reference_range) / speed
            })
            .collect()
    } else {
        let sin_theta = theta.sin();
        positions.iter().map(|&x| x * sin_theta / speed).collect()
    };

    let phase_radians = time_delays
        .iter()
        .map(|&tau| TAU * config.frequency_hz * tau)
        .collect();

    PerElementDelays {
        time_delays,
        phase_radians,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{SpacingUnit, WindowSelection};

    fn test_config(elements: usize, steer_angle_deg: f64, focus_depth: Option<f64>) -> ProfileConfig {
        ProfileConfig {
            elements,
            spacing: 0.5,
            spacing_unit: SpacingUnit::Wavelength,
            frequency_hz: 5.0e6,
            wave_speed: 1540.0,
            steer_angle_deg,
            window: WindowSelection::Rectangular,
            focus_depth,
        }
    }

    #[test]
    fn test_positions_centered() {
        let config = test_config(5, 0.0, None);
        let positions = element_positions(&config);
        assert_eq!(positions.len(), 5);
        assert!((positions[2]).abs() < 1e-15);
        assert!((positions[0] + positions[4]).abs() < 1e-15);
        let pitch = config.element_pitch_meters();
        assert!((positions[1] - positions[0] - pitch).abs() < 1e-12);
    }

    #[test]
    fn test_broadside_delays_zero() {
        let delays = compute_delays(&test_config(8, 0.0, None));
        assert!(delays.time_delays.iter().all(|&t| t.abs() < 1e-18));
        assert!(delays.phase_radians.iter().all(|&p| p.abs() < 1e-12));
    }

    #[test]
    fn test_steered_delays_antisymmetric() {
        for &n in &[7usize, 8] {
            let delays = compute_delays(&test_config(n, 30.0, None));
            for i in 0..n {
                let mirror = delays.time_delays[n - 1 - i];
                assert!(
                    (delays.time_delays[i] + mirror).abs() < 1e-18,
                    "delays not antisymmetric at {} for N={}",
                    i,
                    n
                );
            }
            if n % 2 == 1 {
                assert!(delays.time_delays[n / 2].abs() < 1e-18);
            }
        }
    }

    #[test]
    fn test_focused_center_element_zero() {
        let delays = compute_delays(&test_config(9, 15.0, Some(0.03)));
        assert!(delays.time_delays[4].abs() < 1e-15);
    }

    #[test]
    fn test_focused_broadside_edges_lead() {
        // At broadside focus, edge elements are farther from the focal
        // point than the center, so their relative delays are positive
        let delays = compute_delays(&test_config(9, 0.0, Some(0.02)));
        assert!(delays.time_delays[0] > 0.0);
        assert!(delays.time_delays[8] > 0.0);
        assert!((delays.time_delays[0] - delays.time_delays[8]).abs() < 1e-18);
    }

    #[test]
    fn test_zero_focus_depth_is_far_field() {
        let far = compute_delays(&test_config(8, 20.0, None));
        let zero = compute_delays(&test_config(8, 20.0, Some(0.0)));
        assert_eq!(far, zero);
    }

    #[test]
    fn test_phase_matches_delay() {
        let config = test_config(6, 25.0, None);
        let delays = compute_delays(&config);
        for (tau, phi) in delays.time_delays.iter().zip(delays.phase_radians.iter()) {
            let expected = 2.0 * std::f64::consts::PI * config.frequency_hz * tau;
            assert!((phi - expected).abs() < 1e-12);
        }
    }
}
