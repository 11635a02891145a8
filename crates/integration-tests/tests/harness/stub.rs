//! In-process stand-in for the synthesis worker

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use timbre_core::GenerationParams;
use timbre_engine::{
    CloneJob, DesignJob, Device, EngineError, EngineLoader, ModelManager, SynthesisOutput, VoiceCloneEngine,
    VoiceClonePrompt,
};

pub const STUB_SAMPLE_RATE: u32 = 24000;

/// What the stub engine does with every synthesis call
#[derive(Debug, Clone, Copy)]
pub enum StubBehavior {
    /// Return a short sine burst
    Succeed,
    /// Fail with a synthesis error
    Fail,
    /// Sleep, then return a sine burst
    Delay(Duration),
}

/// Call counters shared between the loader and the tests
#[derive(Debug, Default)]
pub struct StubCounters {
    pub synth_calls: AtomicUsize,
    pub prompt_derivations: AtomicUsize,
}

impl StubCounters {
    pub fn synth_calls(&self) -> usize {
        self.synth_calls.load(Ordering::SeqCst)
    }

    pub fn prompt_derivations(&self) -> usize {
        self.prompt_derivations.load(Ordering::SeqCst)
    }
}

struct StubEngine {
    behavior: StubBehavior,
    counters: Arc<StubCounters>,
    busy: AtomicBool,
}

impl StubEngine {
    fn output() -> SynthesisOutput {
        let waveform = (0..1024)
            .map(|i| (i as f32 * 0.05).sin() * 0.4)
            .collect();
        SynthesisOutput {
            waveforms: vec![waveform],
            sample_rate: STUB_SAMPLE_RATE,
        }
    }

    /// Runs one serialized call, asserting no two overlap
    fn enter(&self) -> timbre_engine::Result<SynthesisOutput> {
        assert!(
            !self.busy.swap(true, Ordering::SeqCst),
            "stub engine entered concurrently"
        );
        let result = match self.behavior {
            StubBehavior::Succeed => Ok(Self::output()),
            StubBehavior::Fail => Err(EngineError::Synthesis("stub refuses to sing".to_string())),
            StubBehavior::Delay(pause) => {
                std::thread::sleep(pause);
                Ok(Self::output())
            }
        };
        self.busy.store(false, Ordering::SeqCst);
        self.counters.synth_calls.fetch_add(1, Ordering::SeqCst);
        result
    }
}

impl VoiceCloneEngine for StubEngine {
    fn synthesize(&self, _job: &CloneJob) -> timbre_engine::Result<SynthesisOutput> {
        self.enter()
    }

    fn derive_prompt(&self, _ref_audio: &Path, _ref_text: &str, x_vector_only: bool) -> timbre_engine::Result<VoiceClonePrompt> {
        self.counters.prompt_derivations.fetch_add(1, Ordering::SeqCst);
        Ok(VoiceClonePrompt::new("stub-prompt", x_vector_only))
    }

    fn synthesize_with_prompt(
        &self,
        _prompt: &VoiceClonePrompt,
        _text: &str,
        _language: &str,
        _params: &GenerationParams,
    ) -> timbre_engine::Result<SynthesisOutput> {
        self.enter()
    }

    fn synthesize_design(&self, _job: &DesignJob) -> timbre_engine::Result<SynthesisOutput> {
        self.enter()
    }

    fn sample_rate(&self) -> u32 {
        STUB_SAMPLE_RATE
    }
}

/// Loader that hands out stub engines on any device
pub struct StubLoader {
    behavior: StubBehavior,
    counters: Arc<StubCounters>,
}

impl StubLoader {
    pub fn new(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            counters: Arc::new(StubCounters::default()),
        })
    }

    pub fn counters(&self) -> Arc<StubCounters> {
        Arc::clone(&self.counters)
    }
}

impl EngineLoader for StubLoader {
    fn load(&self, _device: Device) -> timbre_engine::Result<Box<dyn VoiceCloneEngine>> {
        Ok(Box::new(StubEngine {
            behavior: self.behavior,
            counters: Arc::clone(&self.counters),
            busy: AtomicBool::new(false),
        }))
    }
}

/// Loader that cannot place the model on any device
pub struct FailingLoader;

impl EngineLoader for FailingLoader {
    fn load(&self, device: Device) -> timbre_engine::Result<Box<dyn VoiceCloneEngine>> {
        Err(EngineError::LoadFailed {
            device,
            reason: "stub device unavailable".to_string(),
        })
    }
}

/// A manager that has already loaded a stub engine on CPU
pub async fn ready_manager(behavior: StubBehavior) -> (Arc<ModelManager>, Arc<StubCounters>) {
    let manager = Arc::new(ModelManager::new());
    let loader = StubLoader::new(behavior);
    let counters = loader.counters();

    Arc::clone(&manager)
        .load(loader, Device::Cpu)
        .await
        .expect("stub load never fails");

    (manager, counters)
}
