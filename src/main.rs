use anyhow::{bail, Context, Result};
use captioner_core::{AppConfig, GeneralConfig};
use captioner_pipeline::{run_batch, Pipeline, RunReport};
use captioner_publish::{CloudinaryClient, MediaUploader, Publisher, PublisherRegistry};
use captioner_source::HttpTranscriptSource;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "captioner", about = "Publish WebVTT captions built from hosted transcripts")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "captioner.toml")]
    config: PathBuf,

    /// Dotenv file loaded before the configuration is interpolated
    #[arg(long, default_value = ".env.local")]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch, convert and publish captions for each media id
    Run {
        /// Media ids to process (defaults to `media.default_ids`)
        media_ids: Vec<String>,
    },
    /// Upload a source video with transcription enabled, then try to publish its captions
    Seed {
        #[arg(long)]
        source_url: Option<String>,
        #[arg(long)]
        media_id: Option<String>,
    },
    /// Convert a local transcript JSON file to WebVTT
    Convert {
        input: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Command {
    /// `convert` runs without reading the config file.
    fn needs_config(&self) -> bool {
        !matches!(self, Command::Convert { .. })
    }
}

fn load_env_file(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to load env file {path:?}")),
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false),
    );

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")
}

fn build_pipeline(config: &AppConfig) -> Result<Arc<Pipeline>> {
    let source = HttpTranscriptSource::new(&config.storage)
        .context("failed to create transcript source")?;

    let publisher: Arc<dyn Publisher> = PublisherRegistry::new()
        .create(&config.publisher.plugin, &config.storage, &config.publisher.extra)
        .map(Arc::from)
        .with_context(|| format!("failed to create publisher '{}'", config.publisher.plugin))?;

    tracing::info!(
        cloud = %config.storage.cloud_name,
        publisher = %publisher.name(),
        "pipeline ready"
    );
    Ok(Arc::new(Pipeline::new(Arc::new(source), publisher)))
}

fn print_reports(reports: &[RunReport]) -> Result<()> {
    for report in reports {
        println!("{report}");
    }
    let failed = reports.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        bail!("{failed} of {} caption run(s) failed", reports.len());
    }
    Ok(())
}

async fn run(config: &AppConfig, media_ids: Vec<String>) -> Result<()> {
    let media_ids = if media_ids.is_empty() {
        config.media.default_ids.clone()
    } else {
        media_ids
    };
    if media_ids.is_empty() {
        bail!("no media ids given and media.default_ids is empty");
    }

    let pipeline = build_pipeline(config)?;
    let reports = run_batch(pipeline, media_ids, config.general.concurrency).await;
    print_reports(&reports)
}

async fn seed(config: &AppConfig, source_url: Option<String>, media_id: Option<String>) -> Result<()> {
    let source_url = source_url.unwrap_or_else(|| config.media.source_url.clone());
    let media_id = match media_id.or_else(|| config.media.default_ids.first().cloned()) {
        Some(id) => id,
        None => bail!("no media id given and media.default_ids is empty"),
    };

    let uploader = CloudinaryClient::from_config(&config.storage)
        .context("seeding requires storage credentials")?;
    let uploaded = uploader
        .upload_video_from_url(&source_url, &media_id)
        .await
        .with_context(|| format!("failed to upload {source_url}"))?;
    tracing::info!(
        public_id = %uploaded.public_id,
        secure_url = uploaded.secure_url.as_deref().unwrap_or("-"),
        "source video stored; transcription requested"
    );

    let pipeline = build_pipeline(config)?;
    let report = RunReport::new(uploaded.public_id.clone(), pipeline.run(&uploaded.public_id).await);
    print_reports(std::slice::from_ref(&report))
}

fn convert_file(input: &Path) -> Result<captioner_core::SubtitleDocument> {
    let body = std::fs::read(input).with_context(|| format!("failed to read {input:?}"))?;
    let raw = captioner_core::parse_raw_segments(&body)
        .with_context(|| format!("{input:?} is not a transcript segment list"))?;
    captioner_core::convert_raw_transcript(raw)
        .with_context(|| format!("failed to convert {input:?}"))
}

fn convert(input: &Path, output: Option<&Path>) -> Result<()> {
    let document = convert_file(input)?;

    tracing::info!(
        cues = document.cues.len(),
        skipped = document.skipped,
        "transcript converted"
    );

    let vtt = document.render();
    match output {
        Some(path) => {
            std::fs::write(path, vtt).with_context(|| format!("failed to write {path:?}"))?
        }
        None => print!("{vtt}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_env_file(&cli.env_file)?;

    if !cli.command.needs_config() {
        init_tracing(&GeneralConfig::default().log_level)?;
        if let Command::Convert { input, output } = &cli.command {
            return convert(input, output.as_deref());
        }
    }

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("failed to load config from {:?}", cli.config))?;

    init_tracing(&config.general.log_level)?;
    tracing::debug!(config = ?cli.config, "captioner starting");

    match cli.command {
        Command::Run { media_ids } => run(&config, media_ids).await,
        Command::Seed {
            source_url,
            media_id,
        } => seed(&config, source_url, media_id).await,
        Command::Convert { input, output } => convert(&input, output.as_deref()),
    }
}
