//! Beamline Library
//!
//! A library for phased-array beamforming analysis and simulation.
//! Provides apodization window synthesis, per-element delay/phase
//! computation, far-field pattern synthesis with quality statistics,
//! and a scanline-based dynamic beamforming simulation.

pub mod analytic;
pub mod delays;
pub mod dynamic;
pub mod pattern;
pub mod profile;
pub mod profile_csv;
pub mod stats;
pub mod utils;
pub mod window;

pub use num_complex::Complex64;
pub use profile::{BeamformFullProfile, ProfileConfig, ProfileSnapshot};
pub use rustfft; // Re-export rustfft for external use if needed

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
///
/// Sets up logging for native targets when the `env_logger` feature is
/// enabled.
pub fn init() {
    #[cfg(feature = "env_logger")]
    {
        let _ = env_logger::try_init();
    }
}

/// Result type for beamforming operations
pub type Result<T> = std::result::Result<T, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        init();
        assert!(!VERSION.is_empty());
    }
}
