//! Profile text serialization and the persistence port
//!
//! Encodes a full profile as a CSV-like text document and parses it
//! back. The library never touches a filesystem; callers provide a
//! `ProfileStore` implementation for actual persistence.

use crate::profile::{BeamformFullProfile, ProfileConfig, SpacingUnit, WindowSelection};
use crate::window::DEFAULT_CHEBYSHEV_SIDELOBE_DB;
use crate::Result;

const DATA_HEADER: &str = "index,weight,phaseRadians,timeDelaySeconds";

/// Persistence port for profile documents
///
/// Implementations decide where the text lives (files, browser storage,
/// memory); the library only produces and consumes the payload.
pub trait ProfileStore {
    /// Persist a document under the given name
    fn save(&mut self, name: &str, content: &str) -> Result<()>;
    /// Load a document by name; `Ok(None)` when absent
    fn load(&self, name: &str) -> Result<Option<String>>;
}

/// In-memory store, mainly useful for tests and scripting
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    fn save(&mut self, name: &str, content: &str) -> Result<()> {
        self.entries.insert(name.to_string(), content.to_string());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Option<String>> {
        Ok(self.entries.get(name).cloned())
    }
}

/// Encode a full profile as the persisted text format
pub fn to_csv(profile: &BeamformFullProfile) -> String {
    let config = &profile.config;
    let mut out = String::new();

    out.push_str("# BeamformerConfig\n");
    out.push_str(&format!("elements,{}\n", config.elements));
    out.push_str(&format!("spacing,{}\n", config.spacing));
    out.push_str(&format!("spacingUnit,{}\n", config.spacing_unit));
    out.push_str(&format!("frequencyHz,{}\n", config.frequency_hz));
    out.push_str(&format!("waveSpeed,{}\n", config.wave_speed));
    out.push_str(&format!("steerAngleDeg,{}\n", config.steer_angle_deg));
    out.push_str(&format!("windowType,{}\n", config.window.name()));
    out.push_str(&format!(
        "focusDepth,{}\n",
        config
            .focus_depth
            .map(|d| d.to_string())
            .unwrap_or_default()
    ));
    out.push_str(&format!(
        "chebyshevSidelobeDb,{}\n",
        config
            .window
            .chebyshev_sidelobe_db()
            .map(|db| db.to_string())
            .unwrap_or_default()
    ));
    out.push_str(&format!(
        "customWeights,{}\n",
        if config.window.custom_weights().is_some() {
            "present"
        } else {
            ""
        }
    ));
    out.push('\n');

    out.push_str(DATA_HEADER);
    out.push('\n');
    let snapshot = &profile.snapshot;
    for i in 0..config.elements {
        out.push_str(&format!(
            "{},{},{},{}\n",
            i,
            snapshot.weights.get(i).copied().unwrap_or(0.0),
            snapshot.delays.phase_radians.get(i).copied().unwrap_or(0.0),
            snapshot.delays.time_delays.get(i).copied().unwrap_or(0.0)
        ));
    }

    out
}

/// Parse a persisted profile document back into a configuration
///
/// Lines before the data header are `key,value` pairs; `#` comments and
/// blank lines are skipped. A document without the data header row is a
/// fatal parse error. Recovered per-element weights become custom
/// weights only when their count matches the parsed element count.
pub fn parse_csv_config(text: &str) -> Result<ProfileConfig> {
    let mut elements: usize = 1;
    let mut spacing: f64 = 0.5;
    let mut spacing_unit = SpacingUnit::Wavelength;
    let mut frequency_hz: f64 = 1.0;
    let mut wave_speed: f64 = 1540.0;
    let mut steer_angle_deg: f64 = 0.0;
    let mut window_name = "rectangular".to_string();
    let mut focus_depth: Option<f64> = None;
    let mut chebyshev_sidelobe_db: Option<f64> = None;

    let mut lines = text.lines();
    let mut header_found = false;

    for line in lines.by_ref() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == DATA_HEADER || line.starts_with("index,weight") {
            header_found = true;
            break;
        }

        let (key, value) = match line.split_once(',') {
            Some(pair) => pair,
            None => continue,
        };
        let value = value.trim();

        match key.trim() {
            "elements" => {
                if let Ok(v) = value.parse::<usize>() {
                    elements = v;
                }
            }
            "spacing" => {
                if let Ok(v) = value.parse::<f64>() {
                    spacing = v;
                }
            }
            "spacingUnit" => {
                if let Some(unit) = SpacingUnit::parse(value) {
                    spacing_unit = unit;
                }
            }
            "frequencyHz" => {
                if let Ok(v) = value.parse::<f64>() {
                    frequency_hz = v;
                }
            }
            "waveSpeed" => {
                if let Ok(v) = value.parse::<f64>() {
                    wave_speed = v;
                }
            }
            "steerAngleDeg" => {
                if let Ok(v) = value.parse::<f64>() {
                    steer_angle_deg = v;
                }
            }
            "windowType" => {
                window_name = value.to_string();
            }
            "focusDepth" => {
                focus_depth = value.parse::<f64>().ok();
            }
            "chebyshevSidelobeDb" => {
                chebyshev_sidelobe_db = value.parse::<f64>().ok();
            }
            // customWeights marker and unknown keys carry no data
            _ => {}
        }
    }

    if !header_found {
        return Err("Profile document has no per-element data header".to_string());
    }

    // Data rows: only index and weight columns are re-parsed
    let mut weights = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split(',');
        let index = fields.next().and_then(|f| f.trim().parse::<usize>().ok());
        let weight = fields.next().and_then(|f| f.trim().parse::<f64>().ok());
        if let (Some(_), Some(w)) = (index, weight) {
            weights.push(w);
        }
    }

    let window = match window_name.as_str() {
        "hamming" => WindowSelection::Hamming,
        "triangular" => WindowSelection::Triangular,
        "chebyshev" => WindowSelection::Chebyshev {
            sidelobe_db: chebyshev_sidelobe_db.unwrap_or(DEFAULT_CHEBYSHEV_SIDELOBE_DB),
        },
        "custom" => {
            if weights.len() == elements {
                WindowSelection::Custom { weights }
            } else {
                log::warn!(
                    "Parsed {} weights for {} elements, dropping custom weights",
                    weights.len(),
                    elements
                );
                WindowSelection::Custom {
                    weights: Vec::new(),
                }
            }
        }
        _ => WindowSelection::Rectangular,
    };

    ProfileConfig::new(
        elements,
        spacing,
        spacing_unit,
        frequency_hz,
        wave_speed,
        steer_angle_deg,
        window,
        focus_depth,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{compute_full_profile, ProfileConfig};

    #[test]
    fn test_round_trip_config() {
        let config = ProfileConfig {
            elements: 8,
            spacing: 0.45,
            spacing_unit: SpacingUnit::Wavelength,
            frequency_hz: 3.2e6,
            wave_speed: 1480.0,
            steer_angle_deg: -12.5,
            window: WindowSelection::Chebyshev { sidelobe_db: 45.0 },
            focus_depth: Some(0.025),
        };
        let profile = compute_full_profile(&config);
        let text = to_csv(&profile);
        let parsed = parse_csv_config(&text).unwrap();

        assert_eq!(parsed.elements, config.elements);
        assert_eq!(parsed.spacing, config.spacing);
        assert_eq!(parsed.spacing_unit, config.spacing_unit);
        assert_eq!(parsed.frequency_hz, config.frequency_hz);
        assert_eq!(parsed.wave_speed, config.wave_speed);
        assert_eq!(parsed.steer_angle_deg, config.steer_angle_deg);
        assert_eq!(parsed.window, config.window);
        assert_eq!(parsed.focus_depth, config.focus_depth);
    }

    #[test]
    fn test_round_trip_custom_weights() {
        let config = ProfileConfig {
            elements: 4,
            window: WindowSelection::Custom {
                weights: vec![0.25, 1.0, 1.0, 0.25],
            },
            ..ProfileConfig::default()
        };
        let profile = compute_full_profile(&config);
        let text = to_csv(&profile);
        assert!(text.contains("customWeights,present"));

        let parsed = parse_csv_config(&text).unwrap();
        let weights = parsed.window.custom_weights().unwrap();
        assert_eq!(weights.len(), 4);
        // Weights were renormalized before serialization
        assert_eq!(weights, &[0.25, 1.0, 1.0, 0.25]);
    }

    #[test]
    fn test_missing_header_is_fatal() {
        let text = "# BeamformerConfig\nelements,4\nspacing,0.5\n";
        assert!(parse_csv_config(text).is_err());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let text = format!("elements,4\n{}\n0,1\n1,1\n2,1\n3,1\n", DATA_HEADER);
        let parsed = parse_csv_config(&text).unwrap();
        assert_eq!(parsed.elements, 4);
        assert_eq!(parsed.spacing_unit, SpacingUnit::Wavelength);
        assert_eq!(parsed.frequency_hz, 1.0);
        assert_eq!(parsed.wave_speed, 1540.0);
        assert_eq!(parsed.steer_angle_deg, 0.0);
        assert_eq!(parsed.window, WindowSelection::Rectangular);
        assert_eq!(parsed.focus_depth, None);
    }

    #[test]
    fn test_weight_count_mismatch_drops_custom() {
        let text = format!(
            "elements,4\nwindowType,custom\n{}\n0,0.5\n1,1.0\n",
            DATA_HEADER
        );
        let parsed = parse_csv_config(&text).unwrap();
        assert_eq!(
            parsed.window,
            WindowSelection::Custom {
                weights: Vec::new()
            }
        );
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let profile = compute_full_profile(&ProfileConfig::default());
        let text = to_csv(&profile);
        store.save("probe", &text).unwrap();

        let loaded = store.load("probe").unwrap().unwrap();
        assert_eq!(loaded, text);
        assert!(store.load("missing").unwrap().is_none());
    }
}
