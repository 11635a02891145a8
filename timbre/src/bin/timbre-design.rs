use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use timbre_config::Config;
use timbre_engine::{DesignJob, Device, ModelManager, WorkerLoader, worker_threads};

/// One-shot voice design synthesis
///
/// Instead of cloning a reference recording, the model invents a voice
/// from a natural-language description and speaks the text with it.
#[derive(Debug, Parser)]
#[command(name = "timbre-design", about = "Design a voice from a description and speak with it")]
struct Args {
    /// Spoken text to synthesize, or path to a text file
    #[arg(long)]
    text: String,

    /// Description of the voice to design, or path to a text file
    #[arg(long)]
    instruct: String,

    /// Synthesis language
    #[arg(long, default_value = "English")]
    language: String,

    /// Where to write the synthesized WAV
    #[arg(long, default_value = "voice_design.wav")]
    out: PathBuf,

    /// Checkpoint override; voice design ships as its own checkpoint
    #[arg(long)]
    model_dir: Option<String>,

    /// Path to configuration file; defaults apply when the file is absent
    #[arg(short, long, default_value = "timbre.toml", env = "TIMBRE_CONFIG")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging();

    let mut config = load_config(&args.config)?;
    if let Some(model_dir) = args.model_dir {
        config.model.model_dir = model_dir;
    }

    let job = DesignJob {
        text: timbre_core::text_or_file(&args.text)?,
        instruct: timbre_core::text_or_file(&args.instruct)?,
        language: args.language.clone(),
        params: config.generation.clone(),
    };

    let device: Device = config.model.device.parse()?;
    let loader = Arc::new(WorkerLoader::new(
        config.model.runner.clone(),
        config.model.model_dir.clone(),
        Duration::from_secs(config.model.load_timeout_secs),
        worker_threads(),
    ));
    let manager = Arc::new(ModelManager::new());
    Arc::clone(&manager).load(loader, device).await?;

    let started = Instant::now();
    let output = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            println!("interrupted, exiting");
            std::process::exit(0);
        }
        result = manager.synthesize_design(job) => result?,
    };

    tracing::info!(
        "[voice design {}] time: {:.3}s",
        args.language,
        started.elapsed().as_secs_f64()
    );

    let waveform = output
        .primary()
        .ok_or_else(|| anyhow::anyhow!("engine returned no waveforms"))?;
    timbre_audio::write_wav(&args.out, waveform, output.sample_rate)?;
    println!("wrote {}", args.out.display());

    Ok(())
}

/// Load the config file, or fall back to defaults when it is absent
fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.is_file() {
        Config::load(path)
    } else {
        tracing::debug!("no config file at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
