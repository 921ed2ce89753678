use std::path::PathBuf;
use std::process;

use clap::Parser;

use frameset_core::augmentation::domain::frame_perturber::FramePerturber;
use frameset_core::augmentation::infrastructure::random_perturbation_generator::{
    PerturbationBounds, RandomPerturbationGenerator,
};
use frameset_core::catalog::infrastructure::directory_catalog::DirectoryCatalog;
use frameset_core::dataset::domain::split::SplitFractions;
use frameset_core::dataset::domain::split_assigner::SplitPolicy;
use frameset_core::dataset::infrastructure::dataset_writer::DatasetWriter;
use frameset_core::dataset::infrastructure::split_assigner_factory::create_split_assigner;
use frameset_core::pipeline::build_dataset_use_case::{BuildConfig, BuildDatasetUseCase};
use frameset_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use frameset_core::sampling::domain::edge_trim::{EdgeTrim, TrimEdges};
use frameset_core::sampling::domain::sample_target::{SampleTarget, TargetPolicy};
use frameset_core::shared::constants::{
    DEFAULT_FRAME_EXTENSION, DEFAULT_TEST_FRACTION, DEFAULT_TRAIN_FRACTION,
    DEFAULT_TRIM_FPS, DEFAULT_TRIM_SECONDS, DEFAULT_UPSAMPLE_TOLERANCE,
    DEFAULT_VALIDATION_FRACTION, MAX_ANGLE_DEGREES, MAX_TRANSLATION_PIXELS,
};
use frameset_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Turns a tree of walkthrough videos into a balanced train/validation/test
/// frame dataset.
#[derive(Parser)]
#[command(name = "frameset")]
struct Cli {
    /// Directory whose immediate subdirectories hold the videos.
    source: PathBuf,

    /// Dataset root to create (must not exist).
    destination: PathBuf,

    /// Fraction of each group's frames in the train split.
    #[arg(long, default_value_t = DEFAULT_TRAIN_FRACTION)]
    train: f64,

    /// Fraction of each group's frames in the validation split.
    #[arg(long, default_value_t = DEFAULT_VALIDATION_FRACTION)]
    validation: f64,

    /// Fraction of each group's frames in the test split.
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    test: f64,

    /// Split policy: sequential or random.
    #[arg(long, default_value = "sequential")]
    split_policy: String,

    /// Frames per group (0 = normalize to the smallest group).
    #[arg(long, default_value_t = 0)]
    target_count: usize,

    /// Groups at most this many frames short of the target are not upsampled.
    #[arg(long, default_value_t = DEFAULT_UPSAMPLE_TOLERANCE)]
    upsample_tolerance: usize,

    /// Seconds trimmed from each edge of every video.
    #[arg(long, default_value_t = DEFAULT_TRIM_SECONDS)]
    trim_seconds: f64,

    /// Frame rate used to convert --trim-seconds to frames.
    #[arg(long, default_value_t = DEFAULT_TRIM_FPS)]
    fps: f64,

    /// Edges to trim: leading or both.
    #[arg(long, default_value = "both")]
    trim_edges: String,

    /// Maximum rotation of synthesized frames, in degrees.
    #[arg(long, default_value_t = MAX_ANGLE_DEGREES)]
    max_angle: i32,

    /// Maximum translation of synthesized frames, in pixels.
    #[arg(long, default_value_t = MAX_TRANSLATION_PIXELS)]
    max_translation: i32,

    /// Output frame size as WIDTHxHEIGHT (default: source size).
    #[arg(long)]
    resize: Option<String>,

    /// Output image format: png or jpg.
    #[arg(long, default_value = DEFAULT_FRAME_EXTENSION)]
    format: String,

    /// Seed for perturbations and random split draws.
    #[arg(long)]
    seed: Option<u64>,

    /// Count frames and print the per-group plan without writing anything.
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Option values parsed and range-checked by the core types.
struct Settings {
    fractions: SplitFractions,
    policy: SplitPolicy,
    trim: EdgeTrim,
    target: TargetPolicy,
    bounds: PerturbationBounds,
    size: Option<(u32, u32)>,
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;
    let settings = settings(&cli)?;

    let perturber: Box<dyn FramePerturber> = match cli.seed {
        Some(seed) => Box::new(RandomPerturbationGenerator::with_seed(settings.bounds, seed)),
        None => Box::new(RandomPerturbationGenerator::new(settings.bounds)),
    };
    let writer = DatasetWriter::new(&cli.destination, Box::new(ImageFileWriter::new()))
        .with_size(settings.size)?
        .with_extension(&cli.format)?;

    log::info!(
        "Trimming {} frames per edge ({:?}), target {:?}",
        settings.trim.frames_per_edge(),
        settings.trim.edges(),
        settings.target.target
    );

    let use_case = BuildDatasetUseCase::new(
        Box::new(DirectoryCatalog::with_ffmpeg(&cli.source)),
        perturber,
        create_split_assigner(settings.policy, settings.fractions, cli.seed),
        writer,
        Box::new(StdoutPipelineLogger::default()),
        BuildConfig {
            trim: settings.trim,
            target: settings.target,
        },
    );

    if cli.dry_run {
        let plan = use_case.plan()?;
        print!("{plan}");
        return Ok(());
    }

    let mut use_case = use_case;
    let summary = use_case.execute()?;
    print!("{summary}");
    log::info!("Dataset written to {}", cli.destination.display());
    Ok(())
}

/// Filesystem preconditions. Option values are checked by [`settings`].
fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.source.is_dir() {
        return Err(format!("Source directory not found: {}", cli.source.display()).into());
    }
    if !cli.dry_run && cli.destination.exists() {
        return Err(format!(
            "Destination already exists: {}",
            cli.destination.display()
        )
        .into());
    }
    Ok(())
}

fn settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    Ok(Settings {
        fractions: SplitFractions::new(cli.train, cli.validation, cli.test)?,
        policy: SplitPolicy::parse(&cli.split_policy)?,
        trim: EdgeTrim::from_seconds(
            cli.trim_seconds,
            cli.fps,
            TrimEdges::parse(&cli.trim_edges)?,
        )?,
        target: TargetPolicy::new(
            SampleTarget::from_count(cli.target_count),
            cli.upsample_tolerance,
        ),
        bounds: PerturbationBounds::new(cli.max_angle, cli.max_translation)?,
        size: cli.resize.as_deref().map(parse_resize).transpose()?,
    })
}

fn parse_resize(value: &str) -> Result<(u32, u32), Box<dyn std::error::Error>> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Resize must look like WIDTHxHEIGHT, got '{value}'"))?;
    let width: u32 = w.trim().parse()?;
    let height: u32 = h.trim().parse()?;
    if width == 0 || height == 0 {
        return Err(format!("Resize dimensions must be positive, got '{value}'").into());
    }
    Ok((width, height))
}
