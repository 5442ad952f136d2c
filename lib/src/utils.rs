//! Utility functions for formatting and summaries
//!
//! Provides display helpers used by client applications; the library
//! itself never formats for display inside the compute paths.

use crate::dynamic::{DynamicBeamformingConfig, FrameResult};
use crate::profile::BeamformFullProfile;
use crate::stats::compute_pattern_stats;

/// Format a frequency value for display
pub fn format_frequency(freq_hz: f64) -> String {
    if freq_hz >= 1.0e6 {
        format!("{:.2} MHz", freq_hz / 1.0e6)
    } else if freq_hz >= 1.0e3 {
        format!("{:.2} kHz", freq_hz / 1.0e3)
    } else {
        format!("{:.1} Hz", freq_hz)
    }
}

/// Format an angle in degrees for display
pub fn format_angle(angle_deg: f64) -> String {
    format!("{:.2}°", angle_deg)
}

/// Format a time delay in seconds for display
pub fn format_delay(delay_s: f64) -> String {
    if delay_s.abs() >= 1.0e-6 {
        format!("{:.3} µs", delay_s * 1.0e6)
    } else {
        format!("{:.2} ns", delay_s * 1.0e9)
    }
}

/// Get a summary string for a computed profile
pub fn profile_summary(profile: &BeamformFullProfile) -> String {
    let config = &profile.config;
    let mut summary = String::new();

    summary.push_str("Profile:\n");
    summary.push_str(&format!("  Elements: {}\n", config.elements));
    summary.push_str(&format!(
        "  Spacing: {} {}\n",
        config.spacing, config.spacing_unit
    ));
    summary.push_str(&format!(
        "  Frequency: {}\n",
        format_frequency(config.frequency_hz)
    ));
    summary.push_str(&format!("  Wave speed: {} m/s\n", config.wave_speed));
    summary.push_str(&format!(
        "  Steering: {}\n",
        format_angle(config.steer_angle_deg)
    ));
    summary.push_str(&format!("  Window: {}\n", config.window.name()));
    match config.focus_depth {
        Some(depth) if depth > 0.0 => {
            summary.push_str(&format!("  Focus depth: {:.1} mm\n", depth * 1.0e3));
        }
        _ => summary.push_str("  Focus: far field\n"),
    }

    let stats = compute_pattern_stats(&profile.pattern);
    summary.push_str(&format!("  {}\n", stats));
    summary.push_str(&format!("  Pattern points: {}\n", profile.pattern.len()));

    summary
}

/// Get a summary string for a simulated frame
pub fn frame_summary(config: &DynamicBeamformingConfig, frame: &FrameResult) -> String {
    let mut summary = String::new();

    summary.push_str("Frame:\n");
    summary.push_str(&format!(
        "  Scanlines: {} ({} scan)\n",
        frame.beamformed.len(),
        config.scanning.scan_type
    ));
    summary.push_str(&format!(
        "  Samples per scanline: {}\n",
        config.scanning.samples
    ));
    summary.push_str(&format!(
        "  Scan range: [{:.4}, {:.4}]\n",
        config.scanning.range.0, config.scanning.range.1
    ));

    let peak = frame
        .beamformed
        .iter()
        .flatten()
        .fold(0.0f64, |m, &v| m.max(v.abs()));
    summary.push_str(&format!("  Peak |amplitude|: {:.4}\n", peak));

    summary
}
