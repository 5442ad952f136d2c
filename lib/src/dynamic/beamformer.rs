//! Delay-and-sum beamformer strategies
//!
//! Three interchangeable strategies reduce a raw sample matrix to one
//! beamformed time series per scanline. Delay compensation uses
//! fractional-sample linear interpolation; the delayed variants require
//! phased scanning and degrade to a plain (or apodized) sum otherwise,
//! reporting the degradation through the log facade.

use super::{
    element_position_meters, scanline_param, DynamicBeamformingConfig, SampleMatrix, ScanType,
    ScanlineVector,
};
use crate::window::{make_window, WindowType, DEFAULT_CHEBYSHEV_SIDELOBE_DB};

const FRACTION_EPSILON: f64 = 1e-12;

/// Capability interface for scanline beamformers
pub trait Beamformer {
    /// Reduce one scanline's sample matrix to a beamformed vector of
    /// length `samples`
    fn beamform(
        &self,
        matrix: &SampleMatrix,
        scanline_index: usize,
        config: &DynamicBeamformingConfig,
    ) -> ScanlineVector;

    /// Get the name of the beamformer
    fn name(&self) -> &'static str;
}

/// Read one element's row at a fractional sample index
///
/// Out-of-range lower index contributes 0; a fractional part below the
/// epsilon or a missing upper neighbor returns the lower sample without
/// extrapolation.
pub fn sample_row_linear(matrix: &SampleMatrix, element: usize, index: f64) -> f64 {
    let samples = matrix.len() as isize;
    let lower = index.floor() as isize;
    if lower < 0 || lower >= samples {
        return 0.0;
    }
    let fraction = index - lower as f64;
    let lower_value = matrix[lower as usize][element];
    if fraction <= FRACTION_EPSILON {
        return lower_value;
    }
    let upper = lower + 1;
    if upper >= samples {
        return lower_value;
    }
    lower_value * (1.0 - fraction) + matrix[upper as usize][element] * fraction
}

/// Per-element fractional sample shifts steering toward `sin_theta`
///
/// Negative delays become time advances (positive sample shifts are
/// toward later samples).
fn steering_shifts(config: &DynamicBeamformingConfig, sin_theta: f64) -> Vec<f64> {
    (0..config.array.elements)
        .map(|e| {
            let x = element_position_meters(e, &config.array);
            -(x * sin_theta / config.propagation_speed) / config.time_step
        })
        .collect()
}

/// Plain sum across elements, no delay compensation or apodization
#[derive(Debug, Clone, Copy, Default)]
pub struct SumBeamformer;

impl SumBeamformer {
    pub fn new() -> Self {
        SumBeamformer
    }
}

impl Beamformer for SumBeamformer {
    fn beamform(
        &self,
        matrix: &SampleMatrix,
        _scanline_index: usize,
        _config: &DynamicBeamformingConfig,
    ) -> ScanlineVector {
        matrix.iter().map(|row| row.iter().sum()).collect()
    }

    fn name(&self) -> &'static str {
        "sum"
    }
}

/// Delay-and-sum beamformer for phased scans
#[derive(Debug, Clone, Copy, Default)]
pub struct DelayAndSumBeamformer;

impl DelayAndSumBeamformer {
    pub fn new() -> Self {
        DelayAndSumBeamformer
    }
}

impl Beamformer for DelayAndSumBeamformer {
    fn beamform(
        &self,
        matrix: &SampleMatrix,
        scanline_index: usize,
        config: &DynamicBeamformingConfig,
    ) -> ScanlineVector {
        if config.scanning.scan_type != ScanType::Phased {
            log::error!(
                "Delay-and-sum requires phased scanning, got {}; falling back to plain sum",
                config.scanning.scan_type
            );
            return SumBeamformer::new().beamform(matrix, scanline_index, config);
        }

        let theta = scanline_param(config, scanline_index);
        let shifts = steering_shifts(config, theta.sin());

        (0..matrix.len())
            .map(|s| {
                shifts
                    .iter()
                    .enumerate()
                    .map(|(e, &shift)| sample_row_linear(matrix, e, s as f64 + shift))
                    .sum()
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "delay-and-sum"
    }
}

/// Delay-and-sum beamformer with apodization weighting
///
/// Window parameters default to a Hamming window at the standard
/// Chebyshev attenuation when unset. On non-phased scans the fallback
/// sum is still apodized.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApodizedDelayAndSumBeamformer {
    pub window_type: Option<WindowType>,
    pub chebyshev_sidelobe_db: Option<f64>,
}

impl ApodizedDelayAndSumBeamformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(window_type: WindowType, chebyshev_sidelobe_db: Option<f64>) -> Self {
        Self {
            window_type: Some(window_type),
            chebyshev_sidelobe_db,
        }
    }

    fn weights(&self, elements: usize) -> Vec<f64> {
        make_window(
            self.window_type.unwrap_or(WindowType::Hamming),
            elements,
            self.chebyshev_sidelobe_db
                .unwrap_or(DEFAULT_CHEBYSHEV_SIDELOBE_DB),
        )
    }
}

impl Beamformer for ApodizedDelayAndSumBeamformer {
    fn beamform(
        &self,
        matrix: &SampleMatrix,
        scanline_index: usize,
        config: &DynamicBeamformingConfig,
    ) -> ScanlineVector {
        let weights = self.weights(config.array.elements);

        if config.scanning.scan_type != ScanType::Phased {
            log::error!(
                "Apodized delay-and-sum requires phased scanning, got {}; falling back to apodized sum",
                config.scanning.scan_type
            );
            return matrix
                .iter()
                .map(|row| row.iter().zip(weights.iter()).map(|(v, w)| v * w).sum())
                .collect();
        }

        let theta = scanline_param(config, scanline_index);
        let shifts = steering_shifts(config, theta.sin());

        (0..matrix.len())
            .map(|s| {
                shifts
                    .iter()
                    .zip(weights.iter())
                    .enumerate()
                    .map(|(e, (&shift, &w))| w * sample_row_linear(matrix, e, s as f64 + shift))
                    .sum()
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "delay-and-sum + apodization"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::ScanConfig;

    fn config(scan_type: ScanType, samples: usize, elements: usize) -> DynamicBeamformingConfig {
        DynamicBeamformingConfig {
            time_step: 1.0e-8,
            propagation_speed: 1540.0,
            scanning: ScanConfig {
                num_scan_lines: 8,
                scan_type,
                range: (-0.5, 0.5),
                samples,
            },
            array: crate::dynamic::ArrayConfig {
                elements,
                element_spacing: 0.3e-3,
            },
        }
    }

    fn ramp_matrix(samples: usize, elements: usize) -> SampleMatrix {
        (0..samples)
            .map(|s| (0..elements).map(|e| (s * 10 + e) as f64).collect())
            .collect()
    }

    #[test]
    fn test_interpolation_exact_at_integer_index() {
        let matrix = ramp_matrix(8, 3);
        assert_eq!(sample_row_linear(&matrix, 1, 3.0), 31.0);
        assert_eq!(sample_row_linear(&matrix, 2, 0.0), 2.0);
    }

    #[test]
    fn test_interpolation_midpoint() {
        let matrix = ramp_matrix(8, 3);
        let value = sample_row_linear(&matrix, 0, 2.5);
        assert!((value - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_interpolation_out_of_bounds_is_zero() {
        let matrix = ramp_matrix(8, 3);
        assert_eq!(sample_row_linear(&matrix, 0, -0.5), 0.0);
        assert_eq!(sample_row_linear(&matrix, 0, 8.0), 0.0);
        assert_eq!(sample_row_linear(&matrix, 0, 100.0), 0.0);
    }

    #[test]
    fn test_interpolation_clamps_at_last_sample() {
        let matrix = ramp_matrix(8, 3);
        // Right out-of-bounds neighbor returns the last stored value
        assert_eq!(sample_row_linear(&matrix, 1, 7.5), 71.0);
    }

    #[test]
    fn test_sum_beamformer_zero_matrix() {
        let matrix: SampleMatrix = vec![vec![0.0; 16]; 8];
        let out = SumBeamformer::new().beamform(&matrix, 0, &config(ScanType::Phased, 8, 16));
        assert_eq!(out, vec![0.0; 8]);
    }

    #[test]
    fn test_sum_beamformer_adds_elements() {
        let matrix = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let out = SumBeamformer::new().beamform(&matrix, 0, &config(ScanType::Phased, 2, 3));
        assert_eq!(out, vec![6.0, 15.0]);
    }

    #[test]
    fn test_delay_and_sum_center_scanline_is_plain_sum() {
        // The center of a symmetric sweep steers to zero, where all
        // shifts vanish
        let cfg = config(ScanType::Phased, 16, 4);
        let matrix = ramp_matrix(16, 4);
        let das = DelayAndSumBeamformer::new();
        let steered = das.beamform(&matrix, 3, &cfg); // param = -0.5 + 3/7 -> not zero
        let mut centered_cfg = cfg;
        centered_cfg.scanning.num_scan_lines = 7;
        let centered = das.beamform(&matrix, 3, &centered_cfg); // param = 0
        let plain = SumBeamformer::new().beamform(&matrix, 3, &cfg);
        assert_eq!(centered, plain);
        assert_ne!(steered, plain);
    }

    #[test]
    fn test_delay_and_sum_linear_scan_falls_back() {
        let cfg = config(ScanType::Linear, 8, 4);
        let matrix = ramp_matrix(8, 4);
        let das = DelayAndSumBeamformer::new().beamform(&matrix, 2, &cfg);
        let plain = SumBeamformer::new().beamform(&matrix, 2, &cfg);
        assert_eq!(das, plain);
    }

    #[test]
    fn test_apodized_linear_scan_fallback_is_weighted() {
        let cfg = config(ScanType::Linear, 4, 8);
        let matrix: SampleMatrix = vec![vec![1.0; 8]; 4];
        let apodized = ApodizedDelayAndSumBeamformer::new();
        let out = apodized.beamform(&matrix, 0, &cfg);

        let weights = make_window(WindowType::Hamming, 8, DEFAULT_CHEBYSHEV_SIDELOBE_DB);
        let expected: f64 = weights.iter().sum();
        for v in out {
            assert!((v - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_apodized_output_length() {
        let cfg = config(ScanType::Phased, 32, 8);
        let matrix = ramp_matrix(32, 8);
        let out = ApodizedDelayAndSumBeamformer::with_window(WindowType::Chebyshev, Some(40.0))
            .beamform(&matrix, 1, &cfg);
        assert_eq!(out.len(), 32);
    }

    #[test]
    fn test_beamformer_names() {
        assert_eq!(SumBeamformer::new().name(), "sum");
        assert_eq!(DelayAndSumBeamformer::new().name(), "delay-and-sum");
        assert_eq!(
            ApodizedDelayAndSumBeamformer::new().name(),
            "delay-and-sum + apodization"
        );
    }
}
