//! Apodization window functions for beam pattern shaping
//!
//! Implements the preset windows applied across the array aperture:
//! rectangular, Hamming, triangular (Bartlett) and Dolph-Chebyshev.
//! Custom per-element weights are handled at the profile level.

use std::f64::consts::PI;
use std::fmt;

/// Default Dolph-Chebyshev sidelobe attenuation in dB
pub const DEFAULT_CHEBYSHEV_SIDELOBE_DB: f64 = 30.0;

/// Preset window types available for apodization
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowType {
    /// Rectangular window (uniform weighting)
    Rectangular,
    /// Hamming window (recommended default)
    Hamming,
    /// Triangular (Bartlett) window
    Triangular,
    /// Dolph-Chebyshev window (equiripple sidelobes)
    Chebyshev,
}

impl Default for WindowType {
    fn default() -> Self {
        WindowType::Hamming
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl WindowType {
    /// Get all available preset window types
    pub fn all() -> &'static [WindowType] {
        &[
            WindowType::Rectangular,
            WindowType::Hamming,
            WindowType::Triangular,
            WindowType::Chebyshev,
        ]
    }

    /// Get the name of the window type
    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Rectangular => "rectangular",
            WindowType::Hamming => "hamming",
            WindowType::Triangular => "triangular",
            WindowType::Chebyshev => "chebyshev",
        }
    }

    /// Parse a window type from its lowercase name
    pub fn parse(name: &str) -> Option<WindowType> {
        match name {
            "rectangular" => Some(WindowType::Rectangular),
            "hamming" => Some(WindowType::Hamming),
            "triangular" => Some(WindowType::Triangular),
            "chebyshev" => Some(WindowType::Chebyshev),
            _ => None,
        }
    }
}

/// Generate a preset window of the given type and size
///
/// `chebyshev_sidelobe_db` is only consulted for the Chebyshev window.
pub fn make_window(window_type: WindowType, n: usize, chebyshev_sidelobe_db: f64) -> Vec<f64> {
    let mut window = match window_type {
        WindowType::Rectangular => rectangular_window(n),
        WindowType::Hamming => hamming_window(n),
        WindowType::Triangular => triangular_window(n),
        WindowType::Chebyshev => chebyshev_window(n, chebyshev_sidelobe_db),
    };
    normalize_max_abs(&mut window);
    window
}

/// Scale a weight vector so its maximum absolute value is 1
///
/// Degenerate all-zero input is left unchanged.
pub fn normalize_max_abs(window: &mut [f64]) {
    let max_abs = window.iter().fold(0.0f64, |m, &w| m.max(w.abs()));
    if max_abs > 0.0 {
        for w in window.iter_mut() {
            *w /= max_abs;
        }
    }
}

/// Rectangular window: all ones
pub fn rectangular_window(n: usize) -> Vec<f64> {
    vec![1.0; n]
}

/// Hamming window
pub fn hamming_window(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0; n.max(1)];
    }
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

/// Triangular (Bartlett) window
pub fn triangular_window(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0; n.max(1)];
    }
    let half = (n - 1) as f64 / 2.0;
    (0..n).map(|i| 1.0 - (i as f64 - half).abs() / half).collect()
}

/// Dolph-Chebyshev window with the given sidelobe attenuation in dB
///
/// Samples the Chebyshev polynomial of order N-1 in the frequency domain
/// and recovers the time-domain window through a direct inverse cosine
/// transform. The result is normalized to max-abs 1, centered and
/// symmetrized.
///
/// Odd sizes produce the equiripple taper at the design level. For even
/// sizes the sampled spectrum is antisymmetric (odd polynomial order)
/// and the cosine transform cancels it, so the window collapses to
/// uniform weighting; prefer an odd element count for Chebyshev arrays.
pub fn chebyshev_window(n: usize, sidelobe_db: f64) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0; n.max(1)];
    }

    // Ripple parameter; degenerate attenuation gives a uniform window
    let ripple = 10f64.powf(sidelobe_db / 20.0);
    if !ripple.is_finite() || ripple <= 1.0 {
        return vec![1.0; n];
    }

    let order = (n - 1) as f64;
    let beta = (ripple.acosh() / order).cosh();
    let t_beta = chebyshev_poly(order, beta);

    // Frequency-domain samples of T_{N-1} at beta*cos(pi*k/N)
    let spectrum: Vec<f64> = (0..n)
        .map(|k| chebyshev_poly(order, beta * (PI * k as f64 / n as f64).cos()) / t_beta)
        .collect();

    // Inverse real cosine transform, direct O(N^2) summation
    let mut window = vec![0.0; n];
    for (i, w) in window.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (k, &s) in spectrum.iter().enumerate() {
            sum += s * (2.0 * PI * k as f64 * i as f64 / n as f64).cos();
        }
        *w = sum;
    }

    // Normalize to max-abs 1 and clamp spurious negatives from the transform
    let max_abs = window.iter().fold(0.0f64, |m, &w| m.max(w.abs()));
    if max_abs > 0.0 {
        for w in window.iter_mut() {
            *w /= max_abs;
        }
    }
    for w in window.iter_mut() {
        if *w < 0.0 {
            *w = 0.0;
        }
    }

    // Rotate the main lobe to the array center
    window.rotate_right(n / 2);

    // Symmetrize by averaging mirrored pairs
    for i in 0..n / 2 {
        let avg = (window[i] + window[n - 1 - i]) / 2.0;
        window[i] = avg;
        window[n - 1 - i] = avg;
    }

    // Averaging can nudge the peak off unity for even sizes
    let max_abs = window.iter().fold(0.0f64, |m, &w| m.max(w.abs()));
    if max_abs > 0.0 {
        for w in window.iter_mut() {
            *w /= max_abs;
        }
    }

    window
}

/// Evaluate the Chebyshev polynomial T_m(x) for arbitrary real x
///
/// Uses cos(m*acos(x)) inside [-1, 1] and the cosh continuation outside,
/// with the sign flip for odd order at negative arguments.
fn chebyshev_poly(order: f64, x: f64) -> f64 {
    if x.abs() <= 1.0 {
        (order * x.acos()).cos()
    } else {
        let value = (order * x.abs().acosh()).cosh();
        if x < 0.0 && (order as i64) % 2 != 0 {
            -value
        } else {
            value
        }
    }
}

/// Calculate the coherent gain of a window (sum of window values)
pub fn coherent_gain(window: &[f64]) -> f64 {
    window.iter().sum()
}

/// Calculate the power gain of a window (sum of squared window values)
pub fn power_gain(window: &[f64]) -> f64 {
    window.iter().map(|&w| w * w).sum()
}
