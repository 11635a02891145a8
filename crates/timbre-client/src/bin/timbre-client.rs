use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use timbre_client::{CloneClient, CloneRequest, encode_audio_file};

/// Single-shot voice-clone client
#[derive(Debug, Parser)]
#[command(name = "timbre-client", about = "Send one voice-clone request to a timbre server")]
struct Args {
    /// Base URL for the timbre server
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server_url: String,

    /// Path to the reference WAV audio file
    #[arg(long)]
    ref_audio: PathBuf,

    /// Reference text, or path to a text file
    #[arg(long)]
    ref_text: String,

    /// Synthesis text, or path to a text file
    #[arg(long)]
    syn_text: String,

    /// Synthesis language
    #[arg(long, default_value = "Auto")]
    syn_lang: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 300.0)]
    timeout: f64,

    /// Where to write the synthesized WAV
    #[arg(long, default_value = "clone.wav")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let timeout = Duration::try_from_secs_f64(args.timeout)
        .map_err(|e| anyhow::anyhow!("invalid --timeout value: {e}"))?;

    let request = CloneRequest {
        ref_audio_base64: encode_audio_file(&args.ref_audio)?,
        ref_text: timbre_core::text_or_file(&args.ref_text)?,
        syn_text: timbre_core::text_or_file(&args.syn_text)?,
        syn_lang: args.syn_lang,
    };

    let client = CloneClient::new(&args.server_url)?.with_timeout(timeout);

    let response = client.clone_voice(&request).await?;
    let audio = response.decode_audio()?;
    std::fs::write(&args.out, &audio)?;

    println!("wrote {} bytes to {}", audio.len(), args.out.display());
    Ok(())
}
