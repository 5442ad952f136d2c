//! Dynamic (time-domain) beamforming simulation
//!
//! Scanline-based simulation of a linear array: synthetic per-element
//! echo generation, delay-and-sum beamforming strategies and the frame
//! loop that drives them.

pub mod beamformer;
pub mod frame;
pub mod generator;

pub use beamformer::{
    ApodizedDelayAndSumBeamformer, Beamformer, DelayAndSumBeamformer, SumBeamformer,
};
pub use frame::{run_frame, FrameResult};
pub use generator::{PointSourceGenerator, PointSourceParams, ScanlineGenerator, TransmitModel};

use crate::Result;
use std::fmt;

/// Raw per-element time series for one scanline, shape [samples][elements]
pub type SampleMatrix = Vec<Vec<f64>>;

/// Beamformed time series for one scanline
pub type ScanlineVector = Vec<f64>;

/// Scan sweep geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanType {
    /// Parallel scanlines, range interpreted as lateral offsets in meters
    Linear,
    /// Steered scanlines, range interpreted as angles in radians
    Phased,
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl ScanType {
    /// Get the name of the scan type
    pub fn name(&self) -> &'static str {
        match self {
            ScanType::Linear => "linear",
            ScanType::Phased => "phased",
        }
    }

    /// Parse a scan type from its lowercase name
    pub fn parse(name: &str) -> Option<ScanType> {
        match name {
            "linear" => Some(ScanType::Linear),
            "phased" => Some(ScanType::Phased),
            _ => None,
        }
    }
}

/// Scanline sweep parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    /// Number of scanlines per frame (>= 1)
    pub num_scan_lines: usize,
    /// Sweep interpretation
    pub scan_type: ScanType,
    /// Sweep range (min, max) in scan-type units
    pub range: (f64, f64),
    /// Samples per scanline (>= 1)
    pub samples: usize,
}

/// Physical array parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayConfig {
    /// Number of array elements (>= 1)
    pub elements: usize,
    /// Element spacing in meters (> 0)
    pub element_spacing: f64,
}

/// Full dynamic simulation configuration
///
/// Recomputed per frame; there is no persistent mutable state beyond
/// the caller-held configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicBeamformingConfig {
    /// Sampling interval in seconds (> 0)
    pub time_step: f64,
    /// Propagation speed in m/s (> 0)
    pub propagation_speed: f64,
    pub scanning: ScanConfig,
    pub array: ArrayConfig,
}

impl Default for DynamicBeamformingConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0e-8,
            propagation_speed: 1540.0,
            scanning: ScanConfig {
                num_scan_lines: 64,
                scan_type: ScanType::Phased,
                range: (-0.5, 0.5),
                samples: 1024,
            },
            array: ArrayConfig {
                elements: 32,
                element_spacing: 0.3e-3,
            },
        }
    }
}

impl DynamicBeamformingConfig {
    /// Create a new dynamic configuration with validation
    pub fn new(
        time_step: f64,
        propagation_speed: f64,
        scanning: ScanConfig,
        array: ArrayConfig,
    ) -> Result<Self> {
        if time_step <= 0.0 || !time_step.is_finite() {
            return Err(format!("Time step must be positive, got {}", time_step));
        }
        if propagation_speed <= 0.0 || !propagation_speed.is_finite() {
            return Err(format!(
                "Propagation speed must be positive, got {}",
                propagation_speed
            ));
        }
        if scanning.num_scan_lines < 1 {
            return Err("Scanline count must be at least 1".to_string());
        }
        if scanning.samples < 1 {
            return Err("Sample count must be at least 1".to_string());
        }
        if array.elements < 1 {
            return Err("Element count must be at least 1".to_string());
        }
        if array.element_spacing <= 0.0 || !array.element_spacing.is_finite() {
            return Err(format!(
                "Element spacing must be positive, got {}",
                array.element_spacing
            ));
        }

        Ok(Self {
            time_step,
            propagation_speed,
            scanning,
            array,
        })
    }
}

/// Element x-position in meters, centered at the array origin
pub fn element_position_meters(index: usize, array: &ArrayConfig) -> f64 {
    (index as f64 - (array.elements as f64 - 1.0) / 2.0) * array.element_spacing
}

/// Scan parameter (angle or lateral offset) for a scanline index
///
/// Linearly interpolates the configured range across the frame; a
/// single-scanline frame sits at the range midpoint.
pub fn scanline_param(config: &DynamicBeamformingConfig, scanline_index: usize) -> f64 {
    let (min, max) = config.scanning.range;
    let count = config.scanning.num_scan_lines;
    if count <= 1 {
        return (min + max) / 2.0;
    }
    min + (max - min) * scanline_index as f64 / (count - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = DynamicBeamformingConfig::default();
        assert!(DynamicBeamformingConfig::new(
            config.time_step,
            config.propagation_speed,
            config.scanning,
            config.array
        )
        .is_ok());

        assert!(DynamicBeamformingConfig::new(
            0.0,
            config.propagation_speed,
            config.scanning,
            config.array
        )
        .is_err());

        let mut bad = config.scanning;
        bad.num_scan_lines = 0;
        assert!(DynamicBeamformingConfig::new(
            config.time_step,
            config.propagation_speed,
            bad,
            config.array
        )
        .is_err());
    }

    #[test]
    fn test_element_positions_centered() {
        let array = ArrayConfig {
            elements: 4,
            element_spacing: 1.0e-3,
        };
        assert!((element_position_meters(0, &array) + 1.5e-3).abs() < 1e-15);
        assert!((element_position_meters(3, &array) - 1.5e-3).abs() < 1e-15);
        assert!(
            (element_position_meters(1, &array) + element_position_meters(2, &array)).abs()
                < 1e-18
        );
    }

    #[test]
    fn test_scanline_param_interpolation() {
        let mut config = DynamicBeamformingConfig::default();
        config.scanning.range = (-1.0, 1.0);
        config.scanning.num_scan_lines = 5;

        assert!((scanline_param(&config, 0) + 1.0).abs() < 1e-15);
        assert!((scanline_param(&config, 2)).abs() < 1e-15);
        assert!((scanline_param(&config, 4) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_single_scanline_uses_midpoint() {
        let mut config = DynamicBeamformingConfig::default();
        config.scanning.range = (0.2, 0.6);
        config.scanning.num_scan_lines = 1;
        assert!((scanline_param(&config, 0) - 0.4).abs() < 1e-15);
    }
}
