use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use timbre_config::Config;
use timbre_core::input::{non_empty_lines, select_line};
use timbre_core::take::{line_case_label, next_take_path};
use timbre_engine::{CloneJob, Device, ModelManager, WorkerLoader, worker_threads};

/// Batch line-by-line voice cloning
#[derive(Debug, Parser)]
#[command(name = "timbre-lines", about = "Clone a voice and synthesize batch input line by line")]
struct Args {
    /// Reference audio URL or file path, passed through to the engine
    #[arg(long)]
    ref_audio: String,

    /// Reference text, or path to a text file
    #[arg(long)]
    ref_text: String,

    /// Synthesis text; a file path means one generation per non-empty line
    #[arg(long)]
    syn_text: String,

    /// Synthesis language
    #[arg(long, default_value = "Auto")]
    syn_lang: String,

    /// Only generate the given 1-based line
    #[arg(long)]
    line: Option<usize>,

    /// Directory for synthesized takes
    #[arg(long, default_value = "takes")]
    out_dir: PathBuf,

    /// Derive the voice prompt once and reuse it for every line
    #[arg(long)]
    reuse_prompt: bool,

    /// Path to configuration file; defaults apply when the file is absent
    #[arg(short, long, default_value = "timbre.toml", env = "TIMBRE_CONFIG")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging();

    let config = load_config(&args.config)?;

    let ref_text = timbre_core::text_or_file(&args.ref_text)?;
    let lines = load_syn_lines(&args.syn_text)?;
    anyhow::ensure!(!lines.is_empty(), "no synthesis text lines found");

    // Selection happens before any model work so range errors are instant
    let (selected, first_line_no) = match args.line {
        Some(index) => (vec![select_line(&lines, index)?.to_string()], index),
        None => (lines, 1),
    };

    std::fs::create_dir_all(&args.out_dir)?;

    let device: Device = config.model.device.parse()?;
    let loader = Arc::new(WorkerLoader::new(
        config.model.runner.clone(),
        config.model.model_dir.clone(),
        Duration::from_secs(config.model.load_timeout_secs),
        worker_threads(),
    ));
    let manager = Arc::new(ModelManager::new());
    Arc::clone(&manager).load(loader, device).await?;

    let prompt = if args.reuse_prompt {
        let prompt = manager
            .derive_prompt(PathBuf::from(&args.ref_audio), ref_text.clone(), false)
            .await?;
        tracing::info!("voice prompt derived once, reusing for {} line(s)", selected.len());
        Some(prompt)
    } else {
        None
    };

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    for (offset, text) in selected.iter().enumerate() {
        let case = line_case_label(first_line_no + offset);

        let synth = async {
            match &prompt {
                Some(prompt) => {
                    manager
                        .synthesize_with_prompt(
                            prompt.clone(),
                            text.clone(),
                            args.syn_lang.clone(),
                            config.generation.clone(),
                        )
                        .await
                }
                None => {
                    manager
                        .synthesize(CloneJob {
                            ref_audio: PathBuf::from(&args.ref_audio),
                            ref_text: ref_text.clone(),
                            text: text.clone(),
                            language: args.syn_lang.clone(),
                            params: config.generation.clone(),
                        })
                        .await
                }
            }
        };

        let started = Instant::now();
        let output = tokio::select! {
            _ = &mut interrupt => {
                println!("interrupted, exiting");
                std::process::exit(0);
            }
            result = synth => result?,
        };

        tracing::info!(
            "[{case}] time: {:.3}s, n_wavs={}, sr={}",
            started.elapsed().as_secs_f64(),
            output.waveforms.len(),
            output.sample_rate
        );

        for (idx, waveform) in output.waveforms.iter().enumerate() {
            let path = next_take_path(&args.out_dir, &case, idx);
            timbre_audio::write_wav(&path, waveform, output.sample_rate)?;
        }
    }

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

/// Batch input: a file path means one entry per non-empty line, anything
/// else is a single literal entry
fn load_syn_lines(value: &str) -> anyhow::Result<Vec<String>> {
    let path = Path::new(value);
    if path.is_file() {
        Ok(non_empty_lines(&std::fs::read_to_string(path)?))
    } else {
        Ok(vec![value.trim().to_string()])
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
