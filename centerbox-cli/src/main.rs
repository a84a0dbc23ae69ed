use centerbox::{Detection, OverlapMetric, Pipeline, PipelineConfig, PredictionGrid};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "CenterBox CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum OverlapConfig {
    KeptFraction,
    Union,
}

impl From<OverlapConfig> for OverlapMetric {
    fn from(value: OverlapConfig) -> Self {
        match value {
            OverlapConfig::KeptFraction => OverlapMetric::KeptFraction,
            OverlapConfig::Union => OverlapMetric::Union,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PipelineConfigJson {
    grid_width: usize,
    grid_height: usize,
    score_threshold: f32,
    iou_threshold: f32,
    overlap: OverlapConfig,
    collapse_epsilon: f32,
}

impl Default for PipelineConfigJson {
    fn default() -> Self {
        let cfg = PipelineConfig::default();
        Self {
            grid_width: cfg.grid_width,
            grid_height: cfg.grid_height,
            score_threshold: cfg.score_threshold,
            iou_threshold: cfg.iou_threshold,
            overlap: OverlapConfig::KeptFraction,
            collapse_epsilon: cfg.collapse_epsilon,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    /// Serialized prediction grid for one image.
    predictions_path: String,
    /// Identifier attached to every detection; also the image path used to
    /// measure the target size when the explicit size is absent.
    image_id: String,
    /// Target image width in pixels; 0 means measure from `image_id`.
    image_width: usize,
    /// Target image height in pixels; 0 means measure from `image_id`.
    image_height: usize,
    output_path: Option<String>,
    pipeline: PipelineConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            predictions_path: String::new(),
            image_id: String::new(),
            image_width: 0,
            image_height: 0,
            output_path: None,
            pipeline: PipelineConfigJson::default(),
        }
    }
}

/// Prediction grid file: flat row-major (height, width, channels) data.
#[derive(Debug, Deserialize)]
struct Predictions {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    image_id: String,
    category: usize,
    score: f32,
    top: i64,
    left: i64,
    bottom: i64,
    right: i64,
}

impl From<Detection> for DetectionRecord {
    fn from(value: Detection) -> Self {
        let (top, left, bottom, right) = value.rounded_corners();
        Self {
            image_id: value.image_id,
            category: value.category,
            score: value.score,
            top,
            left,
            bottom,
            right,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    detections: Vec<DetectionRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("centerbox=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.predictions_path.is_empty() || config.image_id.is_empty() {
        return Err("predictions_path and image_id must be set in the config".into());
    }

    let predictions_text = fs::read_to_string(&config.predictions_path)?;
    let predictions: Predictions = serde_json::from_str(&predictions_text)?;
    let grid = PredictionGrid::from_slice(
        &predictions.data,
        predictions.width,
        predictions.height,
        predictions.channels,
    )?;

    let image_size = if config.image_width == 0 || config.image_height == 0 {
        centerbox::io::image_size(&config.image_id)?
    } else {
        (config.image_width, config.image_height)
    };

    let pipeline = Pipeline::with_config(PipelineConfig {
        grid_width: config.pipeline.grid_width,
        grid_height: config.pipeline.grid_height,
        score_threshold: config.pipeline.score_threshold,
        iou_threshold: config.pipeline.iou_threshold,
        overlap: config.pipeline.overlap.into(),
        collapse_epsilon: config.pipeline.collapse_epsilon,
    });

    let detections = pipeline.process_image(&grid, image_size, &config.image_id)?;
    let output = Output {
        detections: detections.into_iter().map(DetectionRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
