//! Beamline CLI
//!
//! Command-line interface for the beamline library. Provides an
//! interactive shell for computing beamforming profiles, inspecting
//! pattern statistics, persisting profiles, and running the dynamic
//! beamforming simulation.

use std::fs;
use std::path::PathBuf;

use beamline_lib::{
    dynamic::{
        run_frame, ApodizedDelayAndSumBeamformer, Beamformer, DelayAndSumBeamformer,
        DynamicBeamformingConfig, FrameResult, PointSourceGenerator, PointSourceParams,
        ScanType, ScanlineGenerator, SumBeamformer,
    },
    profile::{
        compute_full_profile, presets, BeamformFullProfile, ProfileConfig, SpacingUnit,
        WindowSelection,
    },
    profile_csv::{parse_csv_config, to_csv, ProfileStore},
    stats::compute_pattern_stats,
    utils,
    window::WindowType,
};
use clap::{Arg, Command};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Directory-backed profile store
struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }
}

impl ProfileStore for FileStore {
    fn save(&mut self, name: &str, content: &str) -> beamline_lib::Result<()> {
        fs::write(self.path_for(name), content)
            .map_err(|e| format!("Failed to write {}: {}", name, e))
    }

    fn load(&self, name: &str) -> beamline_lib::Result<Option<String>> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| format!("Failed to read {}: {}", name, e))
    }
}

/// Application state
struct AppState {
    config: ProfileConfig,
    dynamic: DynamicBeamformingConfig,
    source: PointSourceParams,
    last_profile: Option<BeamformFullProfile>,
    last_frame: Option<FrameResult>,
    store: FileStore,
}

impl AppState {
    fn new() -> Self {
        Self {
            config: ProfileConfig::default(),
            dynamic: DynamicBeamformingConfig::default(),
            source: PointSourceParams::default(),
            last_profile: None,
            last_frame: None,
            store: FileStore::new(PathBuf::from(".")),
        }
    }
}

/// Print the help message showing available commands
fn print_help() {
    println!("Available commands:");
    println!("  config                          - Show the current profile configuration");
    println!("  set <parameter> <value>         - Change a profile parameter");
    println!("  preset <n>                      - Load a configuration preset");
    println!("  presets                         - List available presets");
    println!("  profile                         - Compute the profile and show a summary");
    println!("  pattern [start end step]        - Compute the beam pattern over a sweep");
    println!("  stats                           - Show statistics for the last pattern");
    println!("  save <filename>                 - Save the computed profile");
    println!("  load <filename>                 - Load a profile from disk");
    println!("  sim                             - Show the dynamic simulation configuration");
    println!("  sim set <parameter> <value>     - Change a simulation parameter");
    println!("  frame <beamformer> [model]      - Run one simulated frame");
    println!("  envelope <scanline>             - Envelope of a beamformed scanline");
    println!("  status                          - Show application status");
    println!("  help                            - Show this help message");
    println!("  quit                            - Exit the program");
    println!();
    println!("Profile parameters:");
    println!("  elements <n>                    - Array element count (>= 1)");
    println!("  spacing <value>                 - Element spacing");
    println!("  spacing_unit <wavelength|meters>");
    println!("  frequency <hz>                  - Operating frequency");
    println!("  speed <m/s>                     - Wave propagation speed");
    println!("  angle <degrees>                 - Steering angle");
    println!("  window <rectangular|hamming|triangular|chebyshev>");
    println!("  cheb_db <db>                    - Chebyshev sidelobe attenuation");
    println!("  focus <meters|off>              - Focal depth, 'off' for far field");
    println!();
    println!("Simulation parameters:");
    println!("  scan_type <linear|phased>, scanlines <n>, samples <n>,");
    println!("  range <min> <max>, time_step <s>, sim_elements <n>,");
    println!("  sim_spacing <m>, source_speed <m/s>, bearing <value>");
    println!();
    println!("Beamformers: sum, das, das-apod   Models: doubled, twoway");
    println!();
    println!("Examples:");
    println!("  set elements 64");
    println!("  set window chebyshev");
    println!("  set cheb_db 45");
    println!("  profile");
    println!("  pattern -45 45 0.1");
    println!("  save probe.csv");
    println!("  frame das-apod twoway");
    println!("  envelope 32");
}

/// Process a user command
fn process_command(command: &str, state: &mut AppState) {
    let parts: Vec<&str> = command.split_whitespace().collect();

    if parts.is_empty() {
        return;
    }

    match parts[0] {
        "config" => print_config(&state.config),

        "set" => {
            if parts.len() < 3 {
                println!("Usage: set <parameter> <value>");
                return;
            }
            set_profile_param(state, parts[1], &parts[2..]);
        }

        "preset" => {
            if parts.len() != 2 {
                println!("Usage: preset <n>");
                return;
            }
            match parts[1].parse::<usize>().ok().and_then(presets::get_preset) {
                Some(preset) => {
                    println!("Loaded preset '{}' ({})", preset.name, preset.description);
                    state.config = preset.config;
                    state.last_profile = None;
                }
                None => println!("Unknown preset: {}", parts[1]),
            }
        }

        "presets" => {
            println!("Available presets:");
            for preset in presets::list_presets() {
                println!("  {} - {} ({})", preset.id, preset.name, preset.description);
            }
        }

        "profile" => {
            let profile = compute_full_profile(&state.config);
            println!("{}", utils::profile_summary(&profile));
            state.last_profile = Some(profile);
        }

        "pattern" => {
            let angles = if parts.len() == 4 {
                let parsed: Option<(f64, f64, f64)> = match (
                    parts[1].parse(),
                    parts[2].parse(),
                    parts[3].parse(),
                ) {
                    (Ok(a), Ok(b), Ok(c)) => Some((a, b, c)),
                    _ => None,
                };
                match parsed {
                    Some((start, end, step)) if step > 0.0 && end > start => {
                        beamline_lib::pattern::angle_sweep(start, end, step)
                    }
                    _ => {
                        println!("Usage: pattern [start end step]");
                        return;
                    }
                }
            } else {
                beamline_lib::pattern::default_angles()
            };

            let pattern = beamline_lib::pattern::compute_pattern(&state.config, &angles, true);
            let stats = compute_pattern_stats(&pattern);
            println!("Computed {} pattern points", pattern.len());
            println!("{}", stats);

            let mut profile = compute_full_profile(&state.config);
            profile.pattern = pattern;
            state.last_profile = Some(profile);
        }

        "stats" => match &state.last_profile {
            Some(profile) => {
                let stats = compute_pattern_stats(&profile.pattern);
                println!("{}", stats);
                if let (Some(main), Some(total)) = (stats.main_lobe_area, stats.total_area) {
                    println!("  Main-lobe energy: {:.6}", main);
                    println!("  Total energy:     {:.6}", total);
                }
            }
            None => println!("No pattern computed yet. Run 'profile' or 'pattern' first."),
        },

        "save" => {
            if parts.len() != 2 {
                println!("Usage: save <filename>");
                return;
            }
            let profile = match &state.last_profile {
                Some(profile) => profile.clone(),
                None => compute_full_profile(&state.config),
            };
            let text = to_csv(&profile);
            match state.store.save(parts[1], &text) {
                Ok(_) => println!("Profile saved to {}", parts[1]),
                Err(e) => println!("Error saving profile: {}", e),
            }
        }

        "load" => {
            if parts.len() != 2 {
                println!("Usage: load <filename>");
                return;
            }
            match state.store.load(parts[1]) {
                Ok(Some(text)) => match parse_csv_config(&text) {
                    Ok(config) => {
                        println!("Loaded profile from {}", parts[1]);
                        state.config = config;
                        state.last_profile = None;
                        print_config(&state.config);
                    }
                    Err(e) => println!("Error parsing profile: {}", e),
                },
                Ok(None) => println!("No such file: {}", parts[1]),
                Err(e) => println!("Error loading profile: {}", e),
            }
        }

        "sim" => {
            if parts.len() >= 3 && parts[1] == "set" {
                set_sim_param(state, parts[2], &parts[3..]);
            } else if parts.len() == 1 {
                print_sim_config(&state.dynamic, &state.source);
            } else {
                println!("Usage: sim [set <parameter> <value>]");
            }
        }

        "frame" => {
            if parts.len() < 2 {
                println!("Usage: frame <sum|das|das-apod> [doubled|twoway]");
                return;
            }

            let beamformer: Box<dyn Beamformer> = match parts[1] {
                "sum" => Box::new(SumBeamformer::new()),
                "das" => Box::new(DelayAndSumBeamformer::new()),
                "das-apod" => Box::new(ApodizedDelayAndSumBeamformer::with_window(
                    WindowType::Hamming,
                    None,
                )),
                other => {
                    println!("Unknown beamformer: {}", other);
                    return;
                }
            };

            let generator = match parts.get(2).copied().unwrap_or("doubled") {
                "doubled" => PointSourceGenerator::doubled_receive(state.source),
                "twoway" => PointSourceGenerator::transmit_receive(state.source),
                other => {
                    println!("Unknown generator model: {}", other);
                    return;
                }
            };

            println!(
                "Running frame: {} / {}",
                beamformer.name(),
                generator.name()
            );
            let frame = run_frame(&state.dynamic, &generator, beamformer.as_ref());
            println!("{}", utils::frame_summary(&state.dynamic, &frame));
            state.last_frame = Some(frame);
        }

        "envelope" => {
            if parts.len() != 2 {
                println!("Usage: envelope <scanline>");
                return;
            }
            let index: usize = match parts[1].parse() {
                Ok(i) => i,
                Err(_) => {
                    println!("Invalid scanline index: {}", parts[1]);
                    return;
                }
            };
            match &state.last_frame {
                Some(frame) => match frame.beamformed.get(index) {
                    Some(line) => {
                        let env = beamline_lib::analytic::envelope(line);
                        let peak = env.iter().fold(0.0f64, |m, &v| m.max(v));
                        let mean = env.iter().sum::<f64>() / env.len().max(1) as f64;
                        println!(
                            "Envelope of scanline {}: {} samples, peak {:.4}, mean {:.4}",
                            index,
                            env.len(),
                            peak,
                            mean
                        );
                    }
                    None => println!(
                        "Scanline {} out of range (frame has {})",
                        index,
                        frame.beamformed.len()
                    ),
                },
                None => println!("No frame simulated yet. Run 'frame' first."),
            }
        }

        "status" => {
            println!("Profile: {} elements, {} window", state.config.elements, state.config.window.name());
            println!(
                "Pattern computed: {}",
                if state.last_profile.is_some() { "yes" } else { "no" }
            );
            println!(
                "Frame simulated: {}",
                if state.last_frame.is_some() { "yes" } else { "no" }
            );
        }

        "help" => print_help(),

        "quit" | "exit" => {
            println!("Goodbye!");
            std::process::exit(0);
        }

        _ => {
            println!("Unknown command: '{}'", parts[0]);
            println!("Type 'help' for available commands");
        }
    }
}

fn print_config(config: &ProfileConfig) {
    println!("Current profile configuration:");
    println!("  Elements: {}", config.elements);
    println!("  Spacing: {} {}", config.spacing, config.spacing_unit);
    println!(
        "  Frequency: {}",
        utils::format_frequency(config.frequency_hz)
    );
    println!("  Wave speed: {} m/s", config.wave_speed);
    println!("  Steering angle: {}", utils::format_angle(config.steer_angle_deg));
    println!("  Window: {}", config.window.name());
    if let Some(db) = config.window.chebyshev_sidelobe_db() {
        println!("  Chebyshev sidelobe: {} dB", db);
    }
    match config.focus_depth {
        Some(depth) if depth > 0.0 => println!("  Focus depth: {} m", depth),
        _ => println!("  Focus: far field"),
    }
}

fn print_sim_config(config: &DynamicBeamformingConfig, source: &PointSourceParams) {
    println!("Current simulation configuration:");
    println!("  Scan type: {}", config.scanning.scan_type);
    println!("  Scanlines: {}", config.scanning.num_scan_lines);
    println!("  Samples: {}", config.scanning.samples);
    println!(
        "  Range: [{}, {}]",
        config.scanning.range.0, config.scanning.range.1
    );
    println!("  Time step: {} s", config.time_step);
    println!("  Propagation speed: {} m/s", config.propagation_speed);
    println!("  Elements: {}", config.array.elements);
    println!("  Element spacing: {} m", config.array.element_spacing);
    println!("  Source speed: {} m/s", source.source_speed);
    println!("  Source bearing: {}", source.bearing);
    println!(
        "  Source frequency: {}",
        utils::format_frequency(source.frequency_hz)
    );
}

fn set_profile_param(state: &mut AppState, param: &str, values: &[&str]) {
    let value = values[0];
    let mut updated = state.config.clone();

    match param {
        "elements" => match value.parse::<usize>() {
            Ok(n) if n >= 1 => updated.elements = n,
            _ => {
                println!("Invalid element count: {}", value);
                return;
            }
        },
        "spacing" => match value.parse::<f64>() {
            Ok(v) if v > 0.0 => updated.spacing = v,
            _ => {
                println!("Invalid spacing: {}", value);
                return;
            }
        },
        "spacing_unit" => match SpacingUnit::parse(value) {
            Some(unit) => updated.spacing_unit = unit,
            None => {
                println!("Invalid spacing unit: {} (wavelength or meters)", value);
                return;
            }
        },
        "frequency" => match value.parse::<f64>() {
            Ok(v) if v > 0.0 => updated.frequency_hz = v,
            _ => {
                println!("Invalid frequency: {}", value);
                return;
            }
        },
        "speed" => match value.parse::<f64>() {
            Ok(v) if v > 0.0 => updated.wave_speed = v,
            _ => {
                println!("Invalid wave speed: {}", value);
                return;
            }
        },
        "angle" => match value.parse::<f64>() {
            Ok(v) if v.is_finite() => updated.steer_angle_deg = v,
            _ => {
                println!("Invalid steering angle: {}", value);
                return;
            }
        },
        "window" => {
            updated.window = match value {
                "rectangular" => WindowSelection::Rectangular,
                "hamming" => WindowSelection::Hamming,
                "triangular" => WindowSelection::Triangular,
                "chebyshev" => WindowSelection::Chebyshev {
                    sidelobe_db: state
                        .config
                        .window
                        .chebyshev_sidelobe_db()
                        .unwrap_or(beamline_lib::window::DEFAULT_CHEBYSHEV_SIDELOBE_DB),
                },
                _ => {
                    println!("Invalid window type: {}", value);
                    println!("Valid types: rectangular, hamming, triangular, chebyshev");
                    return;
                }
            };
        }
        "cheb_db" => match value.parse::<f64>() {
            Ok(db) if db.is_finite() => {
                updated.window = WindowSelection::Chebyshev { sidelobe_db: db };
            }
            _ => {
                println!("Invalid attenuation: {}", value);
                return;
            }
        },
        "focus" => {
            if value == "off" {
                updated.focus_depth = None;
            } else {
                match value.parse::<f64>() {
                    Ok(depth) if depth >= 0.0 => updated.focus_depth = Some(depth),
                    _ => {
                        println!("Invalid focus depth: {}", value);
                        return;
                    }
                }
            }
        }
        _ => {
            println!("Unknown parameter: {}", param);
            return;
        }
    }

    state.config = updated;
    state.last_profile = None;
    println!("Set {} to {}", param, values.join(" "));
}

fn set_sim_param(state: &mut AppState, param: &str, values: &[&str]) {
    if values.is_empty() {
        println!("Usage: sim set <parameter> <value>");
        return;
    }
    let value = values[0];

    match param {
        "scan_type" => match ScanType::parse(value) {
            Some(scan_type) => state.dynamic.scanning.scan_type = scan_type,
            None => {
                println!("Invalid scan type: {} (linear or phased)", value);
                return;
            }
        },
        "scanlines" => match value.parse::<usize>() {
            Ok(n) if n >= 1 => state.dynamic.scanning.num_scan_lines = n,
            _ => {
                println!("Invalid scanline count: {}", value);
                return;
            }
        },
        "samples" => match value.parse::<usize>() {
            Ok(n) if n >= 1 => state.dynamic.scanning.samples = n,
            _ => {
                println!("Invalid sample count: {}", value);
                return;
            }
        },
        "range" => {
            if values.len() != 2 {
                println!("Usage: sim set range <min> <max>");
                return;
            }
            match (values[0].parse::<f64>(), values[1].parse::<f64>()) {
                (Ok(min), Ok(max)) if max > min => state.dynamic.scanning.range = (min, max),
                _ => {
                    println!("Invalid range: {} {}", values[0], values[1]);
                    return;
                }
            }
        }
        "time_step" => match value.parse::<f64>() {
            Ok(v) if v > 0.0 => state.dynamic.time_step = v,
            _ => {
                println!("Invalid time step: {}", value);
                return;
            }
        },
        "sim_elements" => match value.parse::<usize>() {
            Ok(n) if n >= 1 => state.dynamic.array.elements = n,
            _ => {
                println!("Invalid element count: {}", value);
                return;
            }
        },
        "sim_spacing" => match value.parse::<f64>() {
            Ok(v) if v > 0.0 => state.dynamic.array.element_spacing = v,
            _ => {
                println!("Invalid element spacing: {}", value);
                return;
            }
        },
        "source_speed" => match value.parse::<f64>() {
            Ok(v) => state.source.source_speed = v,
            _ => {
                println!("Invalid source speed: {}", value);
                return;
            }
        },
        "bearing" => match value.parse::<f64>() {
            Ok(v) if v.is_finite() => state.source.bearing = v,
            _ => {
                println!("Invalid bearing: {}", value);
                return;
            }
        },
        _ => {
            println!("Unknown simulation parameter: {}", param);
            return;
        }
    }

    state.last_frame = None;
    println!("Set {} to {}", param, values.join(" "));
}

fn main() {
    // Parse command line arguments
    let matches = Command::new("Beamline")
        .version(beamline_lib::VERSION)
        .about("Phased-array beamforming profile and simulation tool")
        .arg(
            Arg::new("file")
                .help("Profile file to load on startup")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("elements")
                .long("elements")
                .short('n')
                .help("Set array element count")
                .value_name("COUNT"),
        )
        .arg(
            Arg::new("window-type")
                .long("window-type")
                .short('t')
                .help("Set window type (rectangular, hamming, triangular, chebyshev)")
                .value_name("TYPE"),
        )
        .get_matches();

    println!("Beamline v{}", beamline_lib::VERSION);
    println!("Type 'help' for available commands\n");

    // Initialize the library
    beamline_lib::init();

    let mut state = AppState::new();

    if let Some(elements_str) = matches.get_one::<String>("elements") {
        match elements_str.parse::<usize>() {
            Ok(n) if n >= 1 => {
                state.config.elements = n;
                println!("Set element count to {}", n);
            }
            _ => eprintln!("Invalid element count: {}", elements_str),
        }
    }

    if let Some(window_str) = matches.get_one::<String>("window-type") {
        set_profile_param(&mut state, "window", &[window_str.as_str()]);
    }

    // Load profile from command line if provided
    if let Some(filename) = matches.get_one::<String>("file") {
        process_command(&format!("load {}", filename), &mut state);
    }

    // Setup readline
    let mut rl = DefaultEditor::new().expect("Failed to create readline");

    // Main command loop
    loop {
        let readline = rl.readline("beam> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    rl.add_history_entry(trimmed).ok();
                    process_command(trimmed, &mut state);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
}
