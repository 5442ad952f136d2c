//! Beamforming profile configuration and computation
//!
//! Ties together window synthesis, delay geometry and pattern synthesis
//! for a linear transducer array. The configuration is immutable per
//! computation; every compute function returns freshly allocated output.

use crate::delays::{compute_delays, PerElementDelays};
use crate::pattern::{compute_pattern, default_angles, PatternPoint};
use crate::window::{
    hamming_window, make_window, normalize_max_abs, WindowType, DEFAULT_CHEBYSHEV_SIDELOBE_DB,
};
use crate::Result;
use std::fmt;

/// Unit of the element spacing parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpacingUnit {
    /// Spacing expressed in wavelengths
    Wavelength,
    /// Spacing expressed in meters
    Meters,
}

impl Default for SpacingUnit {
    fn default() -> Self {
        SpacingUnit::Wavelength
    }
}

impl fmt::Display for SpacingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl SpacingUnit {
    /// Get the name of the spacing unit
    pub fn name(&self) -> &'static str {
        match self {
            SpacingUnit::Wavelength => "wavelength",
            SpacingUnit::Meters => "meters",
        }
    }

    /// Parse a spacing unit from its lowercase name
    pub fn parse(name: &str) -> Option<SpacingUnit> {
        match name {
            "wavelength" => Some(SpacingUnit::Wavelength),
            "meters" => Some(SpacingUnit::Meters),
            _ => None,
        }
    }
}

/// Apodization selection for a profile
///
/// Custom weights only exist in the `Custom` variant, so a preset
/// selection can never carry stale weight data.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowSelection {
    Rectangular,
    Hamming,
    Triangular,
    Chebyshev { sidelobe_db: f64 },
    Custom { weights: Vec<f64> },
}

impl Default for WindowSelection {
    fn default() -> Self {
        WindowSelection::Rectangular
    }
}

impl WindowSelection {
    /// Get the serialized name of the selection
    pub fn name(&self) -> &'static str {
        match self {
            WindowSelection::Rectangular => "rectangular",
            WindowSelection::Hamming => "hamming",
            WindowSelection::Triangular => "triangular",
            WindowSelection::Chebyshev { .. } => "chebyshev",
            WindowSelection::Custom { .. } => "custom",
        }
    }

    /// Chebyshev sidelobe attenuation, when applicable
    pub fn chebyshev_sidelobe_db(&self) -> Option<f64> {
        match self {
            WindowSelection::Chebyshev { sidelobe_db } => Some(*sidelobe_db),
            _ => None,
        }
    }

    /// Custom weight vector, when applicable
    pub fn custom_weights(&self) -> Option<&[f64]> {
        match self {
            WindowSelection::Custom { weights } => Some(weights),
            _ => None,
        }
    }
}

/// Immutable per-computation profile parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    /// Number of array elements (>= 1)
    pub elements: usize,
    /// Element spacing, in `spacing_unit` units (> 0)
    pub spacing: f64,
    /// Unit of `spacing`
    pub spacing_unit: SpacingUnit,
    /// Operating frequency in Hz (> 0)
    pub frequency_hz: f64,
    /// Propagation speed in m/s (> 0)
    pub wave_speed: f64,
    /// Steering angle in degrees
    pub steer_angle_deg: f64,
    /// Apodization window selection
    pub window: WindowSelection,
    /// Focal depth in meters; absent or 0 means far-field steering
    pub focus_depth: Option<f64>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            elements: 16,
            spacing: 0.5,
            spacing_unit: SpacingUnit::Wavelength,
            frequency_hz: 5.0e6,
            wave_speed: 1540.0,
            steer_angle_deg: 0.0,
            window: WindowSelection::Hamming,
            focus_depth: None,
        }
    }
}

impl ProfileConfig {
    /// Create a new profile configuration with validation
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        elements: usize,
        spacing: f64,
        spacing_unit: SpacingUnit,
        frequency_hz: f64,
        wave_speed: f64,
        steer_angle_deg: f64,
        window: WindowSelection,
        focus_depth: Option<f64>,
    ) -> Result<Self> {
        if elements < 1 {
            return Err("Element count must be at least 1".to_string());
        }
        if spacing <= 0.0 || !spacing.is_finite() {
            return Err(format!("Spacing must be positive, got {}", spacing));
        }
        if frequency_hz <= 0.0 || !frequency_hz.is_finite() {
            return Err(format!("Frequency must be positive, got {}", frequency_hz));
        }
        if wave_speed <= 0.0 || !wave_speed.is_finite() {
            return Err(format!("Wave speed must be positive, got {}", wave_speed));
        }
        if !steer_angle_deg.is_finite() {
            return Err(format!(
                "Steering angle must be finite, got {}",
                steer_angle_deg
            ));
        }
        if let Some(depth) = focus_depth {
            if depth < 0.0 || !depth.is_finite() {
                return Err(format!("Focus depth must be non-negative, got {}", depth));
            }
        }

        Ok(Self {
            elements,
            spacing,
            spacing_unit,
            frequency_hz,
            wave_speed,
            steer_angle_deg,
            window,
            focus_depth,
        })
    }

    /// Wavelength in meters
    pub fn wavelength(&self) -> f64 {
        self.wave_speed / self.frequency_hz
    }

    /// Element pitch in meters, regardless of the configured unit
    pub fn element_pitch_meters(&self) -> f64 {
        match self.spacing_unit {
            SpacingUnit::Meters => self.spacing,
            SpacingUnit::Wavelength => self.spacing * self.wavelength(),
        }
    }

    /// Steering angle in radians
    pub fn steer_angle_rad(&self) -> f64 {
        self.steer_angle_deg.to_radians()
    }

    /// Whether near-field focused steering is active
    pub fn is_focused(&self) -> bool {
        matches!(self.focus_depth, Some(depth) if depth > 0.0)
    }
}

/// Computed per-element state of a profile
#[derive(Debug, Clone)]
pub struct ProfileSnapshot {
    /// Normalized apodization weights (max-abs 1)
    pub weights: Vec<f64>,
    /// Per-element delays and phases
    pub delays: PerElementDelays,
}

/// Full serializable profile: config, per-element state and pattern
#[derive(Debug, Clone)]
pub struct BeamformFullProfile {
    pub config: ProfileConfig,
    pub snapshot: ProfileSnapshot,
    pub pattern: Vec<PatternPoint>,
}

/// Compute the apodization weights for a profile
///
/// Custom weights with the wrong length fall back to a Hamming window;
/// this is a deliberate leniency, surfaced only as a log diagnostic.
/// The result is renormalized to max-abs 1 unless degenerate.
pub fn compute_weights(config: &ProfileConfig) -> Vec<f64> {
    let n = config.elements;
    let mut weights = match &config.window {
        WindowSelection::Rectangular => {
            make_window(WindowType::Rectangular, n, DEFAULT_CHEBYSHEV_SIDELOBE_DB)
        }
        WindowSelection::Hamming => {
            make_window(WindowType::Hamming, n, DEFAULT_CHEBYSHEV_SIDELOBE_DB)
        }
        WindowSelection::Triangular => {
            make_window(WindowType::Triangular, n, DEFAULT_CHEBYSHEV_SIDELOBE_DB)
        }
        WindowSelection::Chebyshev { sidelobe_db } => {
            make_window(WindowType::Chebyshev, n, *sidelobe_db)
        }
        WindowSelection::Custom { weights } => {
            if weights.len() == n {
                weights.clone()
            } else {
                log::warn!(
                    "Custom weights length {} does not match {} elements, falling back to Hamming",
                    weights.len(),
                    n
                );
                hamming_window(n)
            }
        }
    };

    normalize_max_abs(&mut weights);
    weights
}

/// Compute the per-element snapshot (weights + delays) for a profile
pub fn compute_snapshot(config: &ProfileConfig) -> ProfileSnapshot {
    ProfileSnapshot {
        weights: compute_weights(config),
        delays: compute_delays(config),
    }
}

/// Compute a full profile over the default angle sweep
pub fn compute_full_profile(config: &ProfileConfig) -> BeamformFullProfile {
    let snapshot = compute_snapshot(config);
    let pattern = compute_pattern(config, &default_angles(), true);
    BeamformFullProfile {
        config: config.clone(),
        snapshot,
        pattern,
    }
}

/// Create commonly used profile configurations
pub mod presets {
    use super::*;

    /// Preset information structure
    pub struct PresetInfo {
        pub id: usize,
        pub name: &'static str,
        pub description: &'static str,
        pub config: ProfileConfig,
    }

    /// Default imaging profile
    pub fn default() -> ProfileConfig {
        ProfileConfig::default()
    }

    /// Uniform broadside array (widest main lobe reference)
    pub fn uniform_broadside() -> ProfileConfig {
        ProfileConfig {
            elements: 32,
            window: WindowSelection::Rectangular,
            ..ProfileConfig::default()
        }
    }

    /// Low-sidelobe Chebyshev array (odd count keeps the equiripple taper)
    pub fn low_sidelobe() -> ProfileConfig {
        ProfileConfig {
            elements: 63,
            window: WindowSelection::Chebyshev { sidelobe_db: 50.0 },
            ..ProfileConfig::default()
        }
    }

    /// Steered phased array at 30 degrees
    pub fn steered() -> ProfileConfig {
        ProfileConfig {
            elements: 32,
            steer_angle_deg: 30.0,
            ..ProfileConfig::default()
        }
    }

    /// Near-field focused array at 40 mm depth
    pub fn focused() -> ProfileConfig {
        ProfileConfig {
            elements: 64,
            focus_depth: Some(0.04),
            ..ProfileConfig::default()
        }
    }

    /// List all presets with detailed info
    pub fn list_presets() -> Vec<PresetInfo> {
        vec![
            PresetInfo {
                id: 0,
                name: "Default",
                description: "16 elements, Hamming, broadside",
                config: default(),
            },
            PresetInfo {
                id: 1,
                name: "Uniform Broadside",
                description: "32 elements, rectangular",
                config: uniform_broadside(),
            },
            PresetInfo {
                id: 2,
                name: "Low Sidelobe",
                description: "63 elements, Chebyshev 50 dB",
                config: low_sidelobe(),
            },
            PresetInfo {
                id: 3,
                name: "Steered 30deg",
                description: "32 elements, Hamming, 30 degree steer",
                config: steered(),
            },
            PresetInfo {
                id: 4,
                name: "Focused 40mm",
                description: "64 elements, Hamming, 40 mm focus",
                config: focused(),
            },
        ]
    }

    /// Get a preset by ID
    pub fn get_preset(id: usize) -> Option<PresetInfo> {
        list_presets().into_iter().find(|p| p.id == id)
    }
}
