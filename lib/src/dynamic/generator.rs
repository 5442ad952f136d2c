//! Synthetic per-element signal generation
//!
//! Models an ideal point reflector receding from the array along a
//! fixed bearing and produces the raw per-element time series a real
//! front end would capture.

use super::{element_position_meters, DynamicBeamformingConfig, SampleMatrix, ScanType};
use std::f64::consts::TAU;

/// Initial reflector depth in meters; keeps t = 0 off the array plane
const INITIAL_DEPTH_M: f64 = 1.0e-3;

/// Capability interface for per-scanline signal sources
pub trait ScanlineGenerator {
    /// Generate the raw sample matrix for one scanline,
    /// shape [samples][elements]
    fn generate_scanline(
        &self,
        scanline_index: usize,
        config: &DynamicBeamformingConfig,
    ) -> SampleMatrix;

    /// Get the name of the generator
    fn name(&self) -> &'static str;
}

/// Round-trip delay model for the point-source echo
///
/// Both variants are kept as named strategies; neither is canonical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransmitModel {
    /// Ignore the transmit path and double the per-element receive delay
    DoubledReceive,
    /// Explicit transmit delay from the array center plus per-element
    /// receive delay
    TransmitReceive,
}

/// Point-source echo parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSourceParams {
    /// Carrier frequency of the echo in Hz
    pub frequency_hz: f64,
    /// Radial speed of the reflector in m/s
    pub source_speed: f64,
    /// Bearing of the reflector: radians for phased scans, lateral
    /// offset in meters for linear scans
    pub bearing: f64,
    /// Echo amplitude
    pub amplitude: f64,
    /// Initial carrier phase in radians
    pub initial_phase: f64,
}

impl Default for PointSourceParams {
    fn default() -> Self {
        Self {
            frequency_hz: 5.0e6,
            source_speed: 20.0,
            bearing: 0.0,
            amplitude: 1.0,
            initial_phase: 0.0,
        }
    }
}

/// Point-source echo generator
///
/// The output is deliberately independent of the scanline index: the
/// reflector is a fixed global source, not a directional transmit per
/// scanline. A fresh matrix is allocated on every call.
#[derive(Debug, Clone, Copy)]
pub struct PointSourceGenerator {
    params: PointSourceParams,
    model: TransmitModel,
}

impl PointSourceGenerator {
    /// Generator that approximates the round trip by doubling the
    /// receive delay
    pub fn doubled_receive(params: PointSourceParams) -> Self {
        Self {
            params,
            model: TransmitModel::DoubledReceive,
        }
    }

    /// Generator with explicit transmit plus receive delays
    pub fn transmit_receive(params: PointSourceParams) -> Self {
        Self {
            params,
            model: TransmitModel::TransmitReceive,
        }
    }

    /// Create a generator with an explicit model selection
    pub fn with_model(params: PointSourceParams, model: TransmitModel) -> Self {
        Self { params, model }
    }

    pub fn model(&self) -> TransmitModel {
        self.model
    }

    /// Reflector position at simulation time t
    fn source_position(&self, t: f64, scan_type: ScanType) -> (f64, f64) {
        let z = INITIAL_DEPTH_M + self.params.source_speed * t;
        let x = match scan_type {
            ScanType::Phased => z * self.params.bearing.tan(),
            ScanType::Linear => self.params.bearing,
        };
        (x, z)
    }
}

impl ScanlineGenerator for PointSourceGenerator {
    fn generate_scanline(
        &self,
        _scanline_index: usize,
        config: &DynamicBeamformingConfig,
    ) -> SampleMatrix {
        let samples = config.scanning.samples;
        let elements = config.array.elements;
        let speed = config.propagation_speed;
        let omega = TAU * self.params.frequency_hz;

        let mut matrix = vec![vec![0.0; elements]; samples];
        for (s, row) in matrix.iter_mut().enumerate() {
            let t = s as f64 * config.time_step;
            let (source_x, source_z) = self.source_position(t, config.scanning.scan_type);

            let transmit_delay = match self.model {
                TransmitModel::DoubledReceive => 0.0,
                TransmitModel::TransmitReceive => source_x.hypot(source_z) / speed,
            };

            for (e, sample) in row.iter_mut().enumerate() {
                let element_x = element_position_meters(e, &config.array);
                let receive_delay = (source_x - element_x).hypot(source_z) / speed;
                let total_delay = match self.model {
                    TransmitModel::DoubledReceive => 2.0 * receive_delay,
                    TransmitModel::TransmitReceive => transmit_delay + receive_delay,
                };
                *sample = self.params.amplitude
                    * (omega * (t - total_delay) + self.params.initial_phase).cos();
            }
        }

        matrix
    }

    fn name(&self) -> &'static str {
        match self.model {
            TransmitModel::DoubledReceive => "point source (doubled receive delay)",
            TransmitModel::TransmitReceive => "point source (transmit + receive delay)",
        }
    }
}
