use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use beatcurve::audio::{artifact, bands, estimate_tempo, extract_band_energy, load_waveform};
use beatcurve::curve::{
    apply_artifact_energy_curve, apply_beat_curve, apply_energy_curve, apply_motion_preset,
    AnimatableProperty, Axis, FrameRange, ImpulseShape, MotionPreset,
};
use beatcurve::{BandPreset, BpmState, MemorySink};

#[derive(Parser)]
#[command(name = "beatcurve")]
#[command(about = "Analyze audio tempo and band energy, synthesize animation keyframes")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate BPM and extract band energy, writing a _freq_data.json artifact
    Analyze {
        /// Audio file to analyze (.wav or .mp3)
        input: PathBuf,

        /// Band registry: 'percussive' or 'broadband'
        #[arg(long, default_value = "percussive")]
        bands: String,

        /// Analysis hop length in samples
        #[arg(long, default_value_t = bands::DEFAULT_HOP_LENGTH)]
        hop_length: usize,

        /// Host scene frame rate
        #[arg(long, default_value_t = 24)]
        fps: u32,
    },

    /// Generate beat-synchronized keyframes from the detected tempo
    BeatCurve {
        /// Audio file to analyze (.wav or .mp3)
        input: PathBuf,

        /// Host scene frame rate
        #[arg(long, default_value_t = 24)]
        fps: u32,

        #[arg(long, default_value_t = 1)]
        start: i64,

        #[arg(long, default_value_t = 250)]
        end: i64,

        #[arg(long, default_value_t = 1.0)]
        amplitude: f32,

        /// Impulse shape: 'impulse', 'sinus', 'bounce', or 'ease'
        #[arg(long, default_value = "impulse")]
        shape: String,

        /// Animated property: 'location', 'rotation' or 'scale'
        #[arg(long, default_value = "location")]
        property: String,

        /// Comma-separated axes, e.g. 'z' or 'x,y,z'
        #[arg(long, default_value = "z")]
        axes: String,

        /// Target object or bone name
        #[arg(long, default_value = "object")]
        target: String,

        /// Skip detection and use this BPM directly
        #[arg(long)]
        bpm: Option<u32>,

        /// Halve the detected BPM before synthesis
        #[arg(long)]
        halve: bool,

        /// Double the detected BPM before synthesis
        #[arg(long)]
        double: bool,

        /// Keyframe JSON output (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate keyframes following one frequency band's energy envelope
    EnergyCurve {
        /// Audio file (.wav/.mp3) or a previously written _freq_data.json
        input: PathBuf,

        /// Band name from the selected registry
        #[arg(long, default_value = "kick")]
        band: String,

        /// Band registry used when analyzing audio
        #[arg(long, default_value = "percussive")]
        bands: String,

        #[arg(long, default_value_t = 24)]
        fps: u32,

        #[arg(long, default_value_t = 1.0)]
        amplitude: f32,

        #[arg(long, default_value = "location")]
        property: String,

        /// Single axis, e.g. 'z'
        #[arg(long, default_value = "z")]
        axis: String,

        #[arg(long, default_value = "object")]
        target: String,

        /// Keyframe JSON output (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Emit a canned motion pattern, independent of any audio
    Preset {
        /// Pattern: 'shake-x', 'shake-yz', 'pulse-scale', or 'wobble'
        name: String,

        #[arg(long, default_value_t = 1)]
        start: i64,

        #[arg(long, default_value_t = 250)]
        end: i64,

        #[arg(long, default_value = "object")]
        target: String,

        /// Keyframe JSON output (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Analyze {
            input,
            bands,
            hop_length,
            fps,
        } => analyze(input, &bands, hop_length, fps),
        Command::BeatCurve {
            input,
            fps,
            start,
            end,
            amplitude,
            shape,
            property,
            axes,
            target,
            bpm,
            halve,
            double,
            output,
        } => {
            let mut state = BpmState::new(fps);
            match bpm {
                Some(bpm) => state.apply_detection(Some(bpm)),
                None => {
                    let waveform = load_waveform(&input)?;
                    state.apply_detection(estimate_tempo(&waveform));
                }
            }
            if halve {
                state.halve();
            }
            if double {
                state.double();
            }

            let mut sink = MemorySink::new();
            let count = apply_beat_curve(
                &mut sink,
                &target,
                parse_property(&property)?,
                &parse_axes(&axes)?,
                &state,
                FrameRange::new(start, end),
                amplitude,
                parse_shape(&shape)?,
            )?;
            info!(
                "Generated {} keyframes at {} BPM ({} frames per beat)",
                count, state.bpm, state.frames_per_beat
            );
            write_sink(&sink, output)
        }
        Command::EnergyCurve {
            input,
            band,
            bands: registry,
            fps,
            amplitude,
            property,
            axis,
            target,
            output,
        } => {
            let property = parse_property(&property)?;
            let axis = parse_single_axis(&axis)?;
            let mut sink = MemorySink::new();

            let count = if input.extension().is_some_and(|e| e == "json") {
                let data = artifact::load_freq_data(&input)?;
                apply_artifact_energy_curve(
                    &mut sink, &target, property, axis, &data, &band, fps as f32, amplitude,
                )?
            } else {
                let waveform = load_waveform(&input)?;
                let series = extract_band_energy(
                    &waveform,
                    parse_band_preset(&registry)?.bands(),
                    bands::DEFAULT_HOP_LENGTH,
                );
                apply_energy_curve(
                    &mut sink, &target, property, axis, &series, &band, fps as f32, amplitude,
                )?
            };

            info!("Generated {} keyframes from band '{}'", count, band);
            write_sink(&sink, output)
        }
        Command::Preset {
            name,
            start,
            end,
            target,
            output,
        } => {
            let preset = parse_preset(&name)?;
            let mut sink = MemorySink::new();
            let count = apply_motion_preset(&mut sink, &target, preset, FrameRange::new(start, end));
            info!("Preset '{}' produced {} keyframes", name, count);
            write_sink(&sink, output)
        }
    }
}

fn analyze(input: PathBuf, registry: &str, hop_length: usize, fps: u32) -> Result<()> {
    let preset = parse_band_preset(registry)?;
    let waveform = load_waveform(&input)?;

    let mut state = BpmState::new(fps);
    state.apply_detection(estimate_tempo(&waveform));

    let series = extract_band_energy(&waveform, preset.bands(), hop_length);

    info!("=== ANALYSIS RESULTS ===");
    info!("Duration: {:.2} seconds", series.duration);
    info!("Analysis frames: {}", series.frame_count());
    info!("Analysis frame rate: {:.2} Hz", series.fps());
    if state.bpm > 0 {
        info!(
            "BPM: {} -> approx. {} frames per beat at {} fps",
            state.bpm, state.frames_per_beat, fps
        );
    } else {
        info!("No BPM detected");
    }
    for (name, values) in &series.energy {
        let peak = values.iter().cloned().fold(0.0f32, f32::max);
        info!("Band '{}': peak energy {:.6}", name, peak);
    }

    let output_path = artifact::artifact_path(&input);
    artifact::save_freq_data(&artifact::FreqData::from(&series), &output_path)?;
    Ok(())
}

fn write_sink(sink: &MemorySink, output: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(sink)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!("Keyframes written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn parse_band_preset(name: &str) -> Result<BandPreset> {
    match name.to_lowercase().as_str() {
        "percussive" => Ok(BandPreset::Percussive),
        "broadband" => Ok(BandPreset::Broadband),
        other => bail!("unknown band registry '{other}' (expected 'percussive' or 'broadband')"),
    }
}

fn parse_shape(name: &str) -> Result<ImpulseShape> {
    match name.to_lowercase().as_str() {
        "impulse" => Ok(ImpulseShape::Impulse),
        "sinus" => Ok(ImpulseShape::Sinus),
        "bounce" => Ok(ImpulseShape::Bounce),
        "ease" => Ok(ImpulseShape::Ease),
        other => bail!("unknown impulse shape '{other}'"),
    }
}

fn parse_property(name: &str) -> Result<AnimatableProperty> {
    match name.to_lowercase().as_str() {
        "location" => Ok(AnimatableProperty::Location),
        "rotation" | "rotation_euler" => Ok(AnimatableProperty::RotationEuler),
        "scale" => Ok(AnimatableProperty::Scale),
        other => bail!("unknown property '{other}'"),
    }
}

fn parse_single_axis(name: &str) -> Result<Axis> {
    match name.to_lowercase().as_str() {
        "x" => Ok(Axis::X),
        "y" => Ok(Axis::Y),
        "z" => Ok(Axis::Z),
        other => bail!("unknown axis '{other}'"),
    }
}

fn parse_axes(list: &str) -> Result<Vec<Axis>> {
    let mut axes: Vec<Axis> = Vec::new();
    for part in list.split(',').filter(|s| !s.trim().is_empty()) {
        let axis = parse_single_axis(part.trim())?;
        // repeating an axis would double up its channel
        if !axes.contains(&axis) {
            axes.push(axis);
        }
    }
    if axes.is_empty() {
        bail!("no axes selected");
    }
    Ok(axes)
}

fn parse_preset(name: &str) -> Result<MotionPreset> {
    match name.to_lowercase().as_str() {
        "shake-x" | "shake_x" => Ok(MotionPreset::ShakeX),
        "shake-yz" | "shake_yz" => Ok(MotionPreset::ShakeYz),
        "pulse-scale" | "pulse_scale" => Ok(MotionPreset::PulseScale),
        "wobble" | "rotate" => Ok(MotionPreset::Wobble),
        other => bail!("unknown motion preset '{other}'"),
    }
}
