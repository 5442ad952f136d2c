//! Frame loop driving a generator/beamformer pair
//!
//! Each scanline is generated and beamformed independently; results are
//! placed by scanline index, so execution order never affects output.

use super::{
    scanline_param, Beamformer, DynamicBeamformingConfig, ScanlineGenerator, ScanlineVector,
};

/// One simulated frame
#[derive(Debug, Clone)]
pub struct FrameResult {
    /// Beamformed vector per scanline, shape [num_scan_lines][samples]
    pub beamformed: Vec<ScanlineVector>,
    /// Scan parameter (angle or offset) per scanline
    pub scan_params: Vec<f64>,
}

/// Run a full frame across all scanlines
pub fn run_frame(
    config: &DynamicBeamformingConfig,
    generator: &dyn ScanlineGenerator,
    beamformer: &dyn Beamformer,
) -> FrameResult {
    let count = config.scanning.num_scan_lines;
    let mut beamformed = Vec::with_capacity(count);
    let mut scan_params = Vec::with_capacity(count);

    for scanline_index in 0..count {
        scan_params.push(scanline_param(config, scanline_index));
        let matrix = generator.generate_scanline(scanline_index, config);
        beamformed.push(beamformer.beamform(&matrix, scanline_index, config));
    }

    FrameResult {
        beamformed,
        scan_params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::{
        DelayAndSumBeamformer, PointSourceGenerator, PointSourceParams, SumBeamformer,
    };

    fn small_config() -> DynamicBeamformingConfig {
        let mut config = DynamicBeamformingConfig::default();
        config.scanning.num_scan_lines = 5;
        config.scanning.samples = 32;
        config.array.elements = 4;
        config
    }

    #[test]
    fn test_frame_shape() {
        let config = small_config();
        let generator = PointSourceGenerator::doubled_receive(PointSourceParams::default());
        let frame = run_frame(&config, &generator, &SumBeamformer::new());

        assert_eq!(frame.beamformed.len(), 5);
        assert_eq!(frame.scan_params.len(), 5);
        assert!(frame.beamformed.iter().all(|line| line.len() == 32));
    }

    #[test]
    fn test_scan_params_cover_range() {
        let config = small_config();
        let generator = PointSourceGenerator::transmit_receive(PointSourceParams::default());
        let frame = run_frame(&config, &generator, &DelayAndSumBeamformer::new());

        let (min, max) = config.scanning.range;
        assert!((frame.scan_params[0] - min).abs() < 1e-15);
        assert!((frame.scan_params[4] - max).abs() < 1e-15);
        // Monotonic sweep
        for pair in frame.scan_params.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_frame_deterministic() {
        let config = small_config();
        let generator = PointSourceGenerator::doubled_receive(PointSourceParams::default());
        let beamformer = DelayAndSumBeamformer::new();
        let first = run_frame(&config, &generator, &beamformer);
        let second = run_frame(&config, &generator, &beamformer);
        assert_eq!(first.beamformed, second.beamformed);
        assert_eq!(first.scan_params, second.scan_params);
    }
}
