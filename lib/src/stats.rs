//! Beam pattern quality statistics
//!
//! Derives peak sidelobe level, integrated sidelobe ratio and main-lobe
//! width from a pattern curve. Degenerate inputs (empty pattern, zero
//! peak, zero main-lobe energy) yield explicit `None` fields rather than
//! errors; callers must treat `None` as "not computable", not zero.

use crate::pattern::PatternPoint;
use std::fmt;

const MASK_EPSILON: f64 = 1e-12;

/// Pattern quality figures; `None` marks an undefined quantity
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PatternStats {
    /// Peak sidelobe level relative to the main peak, in dB
    pub psl_db: Option<f64>,
    /// Peak sidelobe level, linear
    pub psl_lin: Option<f64>,
    /// Integrated sidelobe ratio in dB
    pub islr_db: Option<f64>,
    /// Full width at half maximum of the main lobe, in degrees
    pub fwhm_deg: Option<f64>,
    /// Integrated main-lobe energy
    pub main_lobe_area: Option<f64>,
    /// Integrated total energy
    pub total_area: Option<f64>,
}

impl fmt::Display for PatternStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt(value: Option<f64>) -> String {
            match value {
                Some(v) => format!("{:.3}", v),
                None => "n/a".to_string(),
            }
        }
        write!(
            f,
            "Pattern stats: PSL={} dB, ISLR={} dB, FWHM={} deg",
            opt(self.psl_db),
            opt(self.islr_db),
            opt(self.fwhm_deg)
        )
    }
}

/// Compute pattern statistics from a pattern curve
pub fn compute_pattern_stats(points: &[PatternPoint]) -> PatternStats {
    if points.is_empty() {
        return PatternStats::default();
    }

    let mut sorted: Vec<PatternPoint> = points.to_vec();
    sorted.sort_by(|a, b| a.angle_deg.partial_cmp(&b.angle_deg).unwrap());

    let (peak_index, peak) = sorted
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.intensity_lin))
        .fold((0, f64::NEG_INFINITY), |best, cur| {
            if cur.1 > best.1 {
                cur
            } else {
                best
            }
        });

    if peak <= 0.0 {
        return PatternStats::default();
    }

    let (left_boundary, right_boundary) = main_lobe_boundaries(&sorted, peak_index, peak);
    let fwhm_deg = (right_boundary - left_boundary).max(0.0);

    // Trapezoidal integration of total and main-lobe energy
    let mut total_area = 0.0;
    let mut main_lobe_area = 0.0;
    for pair in sorted.windows(2) {
        let width = pair[1].angle_deg - pair[0].angle_deg;
        let segment = 0.5 * (pair[0].intensity_lin + pair[1].intensity_lin) * width;
        total_area += segment;
        let in_lobe = |p: &PatternPoint| {
            p.angle_deg >= left_boundary - MASK_EPSILON && p.angle_deg <= right_boundary + MASK_EPSILON
        };
        if in_lobe(&pair[0]) && in_lobe(&pair[1]) {
            main_lobe_area += segment;
        }
    }

    // Peak sidelobe: strongest point outside the main-lobe mask
    let psl_lin = sorted
        .iter()
        .filter(|p| {
            p.angle_deg < left_boundary - MASK_EPSILON || p.angle_deg > right_boundary + MASK_EPSILON
        })
        .map(|p| p.intensity_lin)
        .fold(None, |best: Option<f64>, v| {
            Some(best.map_or(v, |b| b.max(v)))
        });

    let psl_db = psl_lin.map(|psl| {
        if psl == 0.0 {
            f64::NEG_INFINITY
        } else {
            10.0 * (psl / peak).log10()
        }
    });

    let islr_db = if main_lobe_area > 0.0 {
        let sidelobe_area = (total_area - main_lobe_area).max(0.0);
        // Exactly-zero sidelobe energy substitutes machine epsilon, giving
        // a large negative finite value rather than -inf
        let ratio = if sidelobe_area / main_lobe_area == 0.0 {
            f64::EPSILON
        } else {
            sidelobe_area / main_lobe_area
        };
        Some(10.0 * ratio.log10())
    } else {
        None
    };

    PatternStats {
        psl_db,
        psl_lin,
        islr_db,
        fwhm_deg: Some(fwhm_deg),
        main_lobe_area: Some(main_lobe_area),
        total_area: Some(total_area),
    }
}

/// Determine the main-lobe boundary angles around the peak
///
/// First tier: nearest local minima strictly left and right of the peak.
/// Fallback: half-power crossings found by linear interpolation, with the
/// array edge used when the peak touches a boundary.
fn main_lobe_boundaries(points: &[PatternPoint], peak_index: usize, peak: f64) -> (f64, f64) {
    let left_null = find_null(points, peak_index, -1);
    let right_null = find_null(points, peak_index, 1);

    if let (Some(left), Some(right)) = (left_null, right_null) {
        if left < peak_index && right > peak_index {
            return (points[left].angle_deg, points[right].angle_deg);
        }
    }

    let half = peak * 0.5;
    (
        half_power_boundary(points, peak_index, half, -1),
        half_power_boundary(points, peak_index, half, 1),
    )
}

/// Scan outward from the peak for the nearest local minimum
///
/// A local minimum satisfies v[i] <= v[i-1] and v[i] <= v[i+1]; the scan
/// never treats the array edges as minima.
fn find_null(points: &[PatternPoint], peak_index: usize, direction: isize) -> Option<usize> {
    let len = points.len() as isize;
    let mut i = peak_index as isize + direction;
    while i >= 1 && i < len - 1 {
        let value = points[i as usize].intensity_lin;
        if value <= points[(i - 1) as usize].intensity_lin
            && value <= points[(i + 1) as usize].intensity_lin
        {
            return Some(i as usize);
        }
        i += direction;
    }
    None
}

/// Find the half-power crossing angle on one side of the peak
fn half_power_boundary(points: &[PatternPoint], peak_index: usize, half: f64, direction: isize) -> f64 {
    let len = points.len() as isize;
    let mut i = peak_index as isize + direction;
    while i >= 0 && i < len {
        let outside = &points[i as usize];
        if outside.intensity_lin < half {
            // Interpolate between the last in-lobe sample and this one
            let inside = &points[(i - direction) as usize];
            let span = outside.intensity_lin - inside.intensity_lin;
            if span == 0.0 {
                return outside.angle_deg;
            }
            let t = (half - inside.intensity_lin) / span;
            return inside.angle_deg + t * (outside.angle_deg - inside.angle_deg);
        }
        i += direction;
    }

    // Peak region touches the array edge
    if direction < 0 {
        points[0].angle_deg
    } else {
        points[points.len() - 1].angle_deg
    }
}
