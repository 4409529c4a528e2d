//! powerpack command-line tool
//!
//! Runs the panel logic offline: converts detection messages into image
//! annotations, decodes raw sensor buffers to PNG, and replays key scripts
//! through the teleop mappers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use powerpack::config::{AppConfig, LogLevel};
use powerpack::detection::{
    ConverterOptions, Detection2DArrayConverter, DisplayOptions, MessageConverter, ObjectLabels,
};
use powerpack::raw_image::{EncodedImage, ImageEncoding, decode_or_skip};
use powerpack::teleop::{CommandMapper, KeyCommandMapper, KeyEvent, PoseCommandMapper};

#[derive(Parser)]
#[command(author, version, about = "Robotics visualization panel tools", long_about = None)]
struct Cli {
    /// Config file; defaults to the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Convert a Detection2DArray JSON message into ImageAnnotations JSON
    Convert {
        /// Detection2DArray message file
        input: PathBuf,
        /// JSON object mapping class ids to names; defaults to COCO
        #[arg(long)]
        labels: Option<PathBuf>,
        /// Hide bounding boxes
        #[arg(long)]
        no_bbox: bool,
        /// Hide class ids
        #[arg(long)]
        no_id: bool,
        /// Hide scores
        #[arg(long)]
        no_score: bool,
        /// Hide object labels
        #[arg(long)]
        no_label: bool,
    },
    /// Decode a raw image buffer and write it as PNG
    Decode {
        /// Raw pixel bytes
        input: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// mono8, rgb8, bgr8, rgba8 or bgra8
        #[arg(long)]
        encoding: String,
        /// Bytes per row; defaults to tightly packed
        #[arg(long)]
        stride: Option<u32>,
        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Replay a key script such as "+w +a -w -a" and print emitted commands
    Keys {
        /// Whitespace separated tokens: +key press, -key release, ~key auto-repeat
        script: String,
        /// Emit camera pose deltas instead of velocity commands
        #[arg(long)]
        pose: bool,
    },
    /// Write a default config file to --config or the user config directory
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Install the logger before anything logs. Returns whether `RUST_LOG`
/// controls the filter, in which case the config level is ignored.
fn init_logger() -> bool {
    let env_controlled = std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
        .format_timestamp_secs()
        .try_init();
    apply_log_level(env_controlled, LogLevel::default());
    env_controlled
}

fn apply_log_level(env_controlled: bool, level: LogLevel) {
    if !env_controlled {
        log::set_max_level(level.to_level_filter());
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("load config: {}", path.display())),
        None => Ok(AppConfig::load_from_default_path().unwrap_or_default()),
    }
}

fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => AppConfig::default_path().context("no user config directory")?,
    };
    if path.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", path.display());
    }
    AppConfig::new()
        .save(&path)
        .with_context(|| format!("write config: {}", path.display()))
}

fn convert(
    config: &AppConfig,
    input: &Path,
    labels: Option<&Path>,
    hidden: DisplayOptions,
) -> Result<()> {
    let json = std::fs::read_to_string(input)
        .with_context(|| format!("read detections: {}", input.display()))?;

    let labels = match labels {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read labels: {}", path.display()))?;
            ObjectLabels::from_json(&json)
                .with_context(|| format!("parse labels: {}", path.display()))?
        }
        None => ObjectLabels::coco(),
    };

    let saved = config.detection.display;
    let display = DisplayOptions {
        bounding_box: saved.bounding_box && !hidden.bounding_box,
        id: saved.id && !hidden.id,
        score: saved.score && !hidden.score,
        object_label: saved.object_label && !hidden.object_label,
    };

    let converter =
        Detection2DArrayConverter::new(ConverterOptions::new().display(display).labels(labels));
    let annotations = converter
        .convert_json(&json)
        .with_context(|| format!("convert {}", input.display()))?;

    println!("{}", serde_json::to_string_pretty(&annotations)?);
    Ok(())
}

fn decode_file(
    input: &Path,
    width: u32,
    height: u32,
    encoding: &str,
    stride: Option<u32>,
    output: &Path,
) -> Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("read raw image: {}", input.display()))?;

    // An unknown encoding is reported by the decoder.
    let stride = stride.unwrap_or_else(|| {
        encoding
            .parse::<ImageEncoding>()
            .map_or(0, |parsed| width.saturating_mul(parsed.channels() as u32))
    });

    let frame = EncodedImage::new(width, height, stride, encoding, &data);
    let Some(bitmap) = decode_or_skip(&frame) else {
        bail!("cannot decode {} as {}", input.display(), encoding);
    };
    if bitmap.is_empty() {
        bail!("image has no pixels ({}x{})", width, height);
    }

    let image = bitmap
        .into_rgba_image()
        .context("bitmap does not match its dimensions")?;
    image
        .save(output)
        .with_context(|| format!("write png: {}", output.display()))?;
    log::info!("Wrote {}x{} image to {}", width, height, output.display());
    Ok(())
}

fn replay<M: CommandMapper>(mut mapper: M, script: &str) -> Result<()> {
    for token in script.split_whitespace() {
        let Some(event) = KeyEvent::from_token(token) else {
            bail!("bad key token '{}', expected +key, -key or ~key", token);
        };
        match mapper.on_key_event(&event) {
            Some(command) => println!("{} {}", token, serde_json::to_string(&command)?),
            None => log::debug!("{} -> no command", token),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let env_controlled = init_logger();
    // init-config must not fail on the file it is about to replace.
    let config = if matches!(cli.cmd, Cmd::InitConfig { .. }) {
        AppConfig::default()
    } else {
        load_config(cli.config.as_deref())?
    };
    apply_log_level(env_controlled, config.preferences.log_level);

    match cli.cmd {
        Cmd::Convert {
            input,
            labels,
            no_bbox,
            no_id,
            no_score,
            no_label,
        } => {
            let hidden = DisplayOptions {
                bounding_box: no_bbox,
                id: no_id,
                score: no_score,
                object_label: no_label,
            };
            convert(&config, &input, labels.as_deref(), hidden)
        }
        Cmd::Decode {
            input,
            width,
            height,
            encoding,
            stride,
            output,
        } => decode_file(&input, width, height, &encoding, stride, &output),
        Cmd::Keys { script, pose } => {
            if pose {
                replay(
                    PoseCommandMapper::new(config.pose_teleop.mapper_config()),
                    &script,
                )
            } else {
                replay(KeyCommandMapper::new(config.teleop.mapper_config()), &script)
            }
        }
        Cmd::InitConfig { force } => init_config(cli.config.as_deref(), force),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("powerpack-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_config_level_applies_without_rust_log() {
        apply_log_level(false, LogLevel::Warn);
        assert_eq!(log::max_level(), log::LevelFilter::Warn);

        apply_log_level(true, LogLevel::Trace);
        assert_eq!(log::max_level(), log::LevelFilter::Warn);

        apply_log_level(false, LogLevel::Debug);
        assert_eq!(log::max_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_decode_unsupported_encoding_writes_nothing() {
        let input = temp_path("depth.raw");
        let output = temp_path("depth.png");
        std::fs::write(&input, [0u8; 8]).unwrap();

        let result = decode_file(&input, 2, 2, "16UC1", None, &output);
        assert!(result.is_err());
        assert!(!output.exists());

        std::fs::remove_file(&input).unwrap();
    }

    #[test]
    fn test_init_config_respects_force() {
        let path = temp_path("nested").join("config.json");
        init_config(Some(&path), false).unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.version, powerpack::config::CONFIG_VERSION);

        assert!(init_config(Some(&path), false).is_err());
        init_config(Some(&path), true).unwrap();

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_decode_writes_png() {
        let input = temp_path("mono.raw");
        let output = temp_path("mono.png");
        std::fs::write(&input, [0u8, 64, 128, 255]).unwrap();

        decode_file(&input, 2, 2, "mono8", None, &output).unwrap();
        let image = image::open(&output).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(1, 1).0, [255, 255, 255, 255]);

        std::fs::remove_file(&input).unwrap();
        std::fs::remove_file(&output).unwrap();
    }
}
