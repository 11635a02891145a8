use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use timbre_core::GenerationParams;

use crate::{
    CloneJob, DesignJob, Device, EngineError, EngineLoader, SynthesisOutput, VoiceCloneEngine, VoiceClonePrompt,
};

/// Sample rate assumed when the worker's handshake does not carry one
const DEFAULT_SAMPLE_RATE: u32 = 24000;

/// Spawns the configured synthesis worker and speaks its line protocol
///
/// The worker is any executable that loads the checkpoint, prints a
/// `{"event":"ready"}` line on stdout, then answers one JSON request per
/// line. Keeping the command in configuration lets deployments wrap
/// whatever inference runtime they ship.
#[derive(Debug, Clone)]
pub struct WorkerLoader {
    runner: Vec<String>,
    model_dir: String,
    load_timeout: Duration,
    threads: usize,
}

impl WorkerLoader {
    pub const fn new(runner: Vec<String>, model_dir: String, load_timeout: Duration, threads: usize) -> Self {
        Self { runner, model_dir, load_timeout, threads }
    }
}

impl EngineLoader for WorkerLoader {
    fn load(&self, device: Device) -> crate::Result<Box<dyn VoiceCloneEngine>> {
        Ok(Box::new(ProcessEngine::spawn(self, device)?))
    }
}

#[derive(Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum WorkerRequest<'a> {
    Clone {
        ref_audio: &'a Path,
        ref_text: &'a str,
        text: &'a str,
        language: &'a str,
        params: &'a GenerationParams,
        out_dir: &'a Path,
    },
    Prompt {
        ref_audio: &'a Path,
        ref_text: &'a str,
        x_vector_only: bool,
    },
    Generate {
        prompt_id: &'a str,
        text: &'a str,
        language: &'a str,
        params: &'a GenerationParams,
        out_dir: &'a Path,
    },
    Design {
        text: &'a str,
        instruct: &'a str,
        language: &'a str,
        params: &'a GenerationParams,
        out_dir: &'a Path,
    },
}

#[derive(Deserialize)]
struct WorkerReply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    wavs: Vec<PathBuf>,
    #[serde(default)]
    sample_rate: Option<u32>,
    #[serde(default)]
    prompt_id: Option<String>,
}

#[derive(Deserialize)]
struct ReadyEvent {
    event: String,
    #[serde(default)]
    sample_rate: Option<u32>,
}

struct Worker {
    child: Child,
    stdin: ChildStdin,
    lines: mpsc::Receiver<String>,
}

impl Worker {
    fn send(&mut self, request: &WorkerRequest<'_>) -> crate::Result<()> {
        let line = serde_json::to_string(request)
            .map_err(|e| EngineError::Protocol(format!("failed to encode request: {e}")))?;
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Blocks until the worker answers. A dead worker disconnects the
    /// channel, so this never hangs on a crashed process.
    fn recv(&self) -> crate::Result<String> {
        self.lines.recv().map_err(|_| EngineError::WorkerExited)
    }

    fn recv_timeout(&self, timeout: Duration) -> crate::Result<Option<String>> {
        match self.lines.recv_timeout(timeout) {
            Ok(line) => Ok(Some(line)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::WorkerExited),
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Engine backed by a worker subprocess
///
/// This side only moves JSON lines and WAV files; the checkpoint lives in
/// the worker. One request is in flight at a time, enforced upstream by
/// the manager's synthesis gate.
struct ProcessEngine {
    worker: Mutex<Worker>,
    sample_rate: u32,
}

impl ProcessEngine {
    fn spawn(loader: &WorkerLoader, device: Device) -> crate::Result<Self> {
        let (program, args) = loader
            .runner
            .split_first()
            .ok_or_else(|| EngineError::Protocol("empty worker command".to_string()))?;
        let threads = loader.threads.to_string();

        tracing::info!(%device, runner = %program, "spawning synthesis worker");

        let mut child = Command::new(program)
            .args(args)
            .arg("--model-dir")
            .arg(&loader.model_dir)
            .arg("--device")
            .arg(device.to_string())
            .env("OMP_NUM_THREADS", &threads)
            .env("MKL_NUM_THREADS", &threads)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EngineError::LoadFailed {
                device,
                reason: format!("failed to spawn {program}: {e}"),
            })?;

        let stdin = take_pipe(child.stdin.take(), device)?;
        let stdout = take_pipe(child.stdout.take(), device)?;
        let stderr = take_pipe(child.stderr.take(), device)?;

        let (tx, lines) = mpsc::channel();
        std::thread::spawn(move || {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        std::thread::spawn(move || {
            for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                tracing::debug!(target: "timbre_engine::worker", "{line}");
            }
        });

        let worker = Worker { child, stdin, lines };

        let handshake = worker.recv_timeout(loader.load_timeout).map_err(|_| EngineError::LoadFailed {
            device,
            reason: "worker exited before signaling ready".to_string(),
        })?;
        let Some(line) = handshake else {
            return Err(EngineError::LoadFailed {
                device,
                reason: format!("no ready handshake within {}s", loader.load_timeout.as_secs()),
            });
        };

        let ready: ReadyEvent = serde_json::from_str(&line).map_err(|e| EngineError::LoadFailed {
            device,
            reason: format!("bad handshake line: {e}"),
        })?;
        if ready.event != "ready" {
            return Err(EngineError::LoadFailed {
                device,
                reason: format!("unexpected handshake event `{}`", ready.event),
            });
        }

        tracing::info!(%device, "synthesis worker ready");

        Ok(Self {
            worker: Mutex::new(worker),
            sample_rate: ready.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE),
        })
    }

    fn call(&self, request: &WorkerRequest<'_>) -> crate::Result<WorkerReply> {
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        worker.send(request)?;
        let line = worker.recv()?;

        let reply: WorkerReply =
            serde_json::from_str(&line).map_err(|e| EngineError::Protocol(format!("bad worker reply: {e}")))?;
        if reply.ok {
            Ok(reply)
        } else {
            Err(EngineError::Synthesis(
                reply.error.unwrap_or_else(|| "worker reported failure".to_string()),
            ))
        }
    }

    fn collect_output(&self, reply: &WorkerReply) -> crate::Result<SynthesisOutput> {
        if reply.wavs.is_empty() {
            return Err(EngineError::Protocol("worker returned no audio".to_string()));
        }

        let mut sample_rate = reply.sample_rate.unwrap_or(self.sample_rate);
        let mut waveforms = Vec::with_capacity(reply.wavs.len());
        for path in &reply.wavs {
            let (samples, rate) = timbre_audio::read_wav(path)?;
            sample_rate = rate;
            waveforms.push(samples);
        }

        Ok(SynthesisOutput { waveforms, sample_rate })
    }
}

fn take_pipe<T>(pipe: Option<T>, device: Device) -> crate::Result<T> {
    pipe.ok_or_else(|| EngineError::LoadFailed {
        device,
        reason: "worker stdio was not piped".to_string(),
    })
}

impl VoiceCloneEngine for ProcessEngine {
    fn synthesize(&self, job: &CloneJob) -> crate::Result<SynthesisOutput> {
        let out_dir = tempfile::tempdir()?;
        let reply = self.call(&WorkerRequest::Clone {
            ref_audio: &job.ref_audio,
            ref_text: &job.ref_text,
            text: &job.text,
            language: &job.language,
            params: &job.params,
            out_dir: out_dir.path(),
        })?;
        self.collect_output(&reply)
    }

    fn derive_prompt(&self, ref_audio: &Path, ref_text: &str, x_vector_only: bool) -> crate::Result<VoiceClonePrompt> {
        let reply = self.call(&WorkerRequest::Prompt { ref_audio, ref_text, x_vector_only })?;
        let id = reply
            .prompt_id
            .ok_or_else(|| EngineError::Protocol("worker reply missing prompt_id".to_string()))?;
        Ok(VoiceClonePrompt::new(id, x_vector_only))
    }

    fn synthesize_with_prompt(
        &self,
        prompt: &VoiceClonePrompt,
        text: &str,
        language: &str,
        params: &GenerationParams,
    ) -> crate::Result<SynthesisOutput> {
        let out_dir = tempfile::tempdir()?;
        let reply = self.call(&WorkerRequest::Generate {
            prompt_id: prompt.id(),
            text,
            language,
            params,
            out_dir: out_dir.path(),
        })?;
        self.collect_output(&reply)
    }

    fn synthesize_design(&self, job: &DesignJob) -> crate::Result<SynthesisOutput> {
        let out_dir = tempfile::tempdir()?;
        let reply = self.call(&WorkerRequest::Design {
            text: &job.text,
            instruct: &job.instruct,
            language: &job.language,
            params: &job.params,
            out_dir: out_dir.path(),
        })?;
        self.collect_output(&reply)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
