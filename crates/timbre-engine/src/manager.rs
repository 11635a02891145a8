use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use timbre_core::GenerationParams;

use crate::{
    CloneJob, DesignJob, Device, EngineError, EngineLoader, SynthesisOutput, VoiceCloneEngine, VoiceClonePrompt,
};

enum State {
    Unloaded,
    Loading,
    Ready {
        engine: Arc<dyn VoiceCloneEngine>,
        device: Device,
    },
}

/// Owns the single loaded model and serializes access to it
///
/// Lifecycle is `Unloaded -> Loading -> Ready -> Unloaded`. Loading tries
/// the preferred device and, when that device is an accelerator, retries
/// exactly once on CPU before giving up. Synthesis calls fail fast until
/// Ready and run one at a time on the blocking pool; the gate is taken
/// inside the blocking closure, so a caller that stops waiting does not
/// release the engine early.
pub struct ModelManager {
    state: RwLock<State>,
    gate: Arc<Mutex<()>>,
}

impl Default for ModelManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelManager {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::Unloaded),
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.read_state(), State::Ready { .. })
    }

    /// Device the model ended up on, once Ready
    pub fn device(&self) -> Option<Device> {
        match &*self.read_state() {
            State::Ready { device, .. } => Some(*device),
            _ => None,
        }
    }

    /// Load the model off the async runtime
    pub async fn load(self: Arc<Self>, loader: Arc<dyn EngineLoader>, preferred: Device) -> crate::Result<Device> {
        tokio::task::spawn_blocking(move || self.load_blocking(loader.as_ref(), preferred))
            .await
            .map_err(|e| EngineError::Protocol(format!("load task panicked: {e}")))?
    }

    /// Load the model, blocking the calling thread until it is Ready or
    /// both device attempts have failed
    pub fn load_blocking(&self, loader: &dyn EngineLoader, preferred: Device) -> crate::Result<Device> {
        self.begin_loading()?;

        match self.try_device(loader, preferred) {
            Ok(device) => Ok(device),
            Err(err) if preferred.is_accelerator() => {
                tracing::warn!(device = %preferred, error = %err, "model load failed, retrying on cpu");
                self.try_device(loader, Device::Cpu).inspect_err(|_| self.reset_unloaded())
            }
            Err(err) => {
                self.reset_unloaded();
                Err(err)
            }
        }
    }

    /// Clone a voice; fails fast with `NotReady` unless the model is Ready
    pub async fn synthesize(&self, job: CloneJob) -> crate::Result<SynthesisOutput> {
        let engine = self.ready_engine()?;
        run_serialized(Arc::clone(&self.gate), move || engine.synthesize(&job)).await
    }

    /// Analyze a reference voice for reuse across generations
    pub async fn derive_prompt(
        &self,
        ref_audio: PathBuf,
        ref_text: String,
        x_vector_only: bool,
    ) -> crate::Result<VoiceClonePrompt> {
        let engine = self.ready_engine()?;
        run_serialized(Arc::clone(&self.gate), move || {
            engine.derive_prompt(&ref_audio, &ref_text, x_vector_only)
        })
        .await
    }

    /// Speak `text` with a previously derived prompt
    pub async fn synthesize_with_prompt(
        &self,
        prompt: VoiceClonePrompt,
        text: String,
        language: String,
        params: GenerationParams,
    ) -> crate::Result<SynthesisOutput> {
        let engine = self.ready_engine()?;
        run_serialized(Arc::clone(&self.gate), move || {
            engine.synthesize_with_prompt(&prompt, &text, &language, &params)
        })
        .await
    }

    /// Invent a voice from a description and speak with it
    pub async fn synthesize_design(&self, job: DesignJob) -> crate::Result<SynthesisOutput> {
        let engine = self.ready_engine()?;
        run_serialized(Arc::clone(&self.gate), move || engine.synthesize_design(&job)).await
    }

    /// Drop the engine; calls already running finish on their own handle,
    /// everything after this fails fast with `NotReady`
    pub fn unload(&self) {
        let mut state = self.write_state();
        if matches!(&*state, State::Ready { .. }) {
            tracing::info!("model unloaded");
        }
        *state = State::Unloaded;
    }

    fn begin_loading(&self) -> crate::Result<()> {
        let mut state = self.write_state();
        match &*state {
            State::Unloaded => {
                *state = State::Loading;
                Ok(())
            }
            State::Loading => Err(EngineError::Protocol("model load already in progress".to_string())),
            State::Ready { .. } => Err(EngineError::Protocol("model is already loaded".to_string())),
        }
    }

    fn try_device(&self, loader: &dyn EngineLoader, device: Device) -> crate::Result<Device> {
        let engine = loader.load(device)?;
        *self.write_state() = State::Ready {
            engine: Arc::from(engine),
            device,
        };
        tracing::info!(%device, "model ready");
        Ok(device)
    }

    fn reset_unloaded(&self) {
        *self.write_state() = State::Unloaded;
    }

    fn ready_engine(&self) -> crate::Result<Arc<dyn VoiceCloneEngine>> {
        match &*self.read_state() {
            State::Ready { engine, .. } => Ok(Arc::clone(engine)),
            _ => Err(EngineError::NotReady),
        }
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Run an engine call on the blocking pool under the synthesis gate
///
/// The gate is acquired inside the closure: if the awaiting future is
/// dropped at a timeout, the call still runs to completion and the next
/// caller still waits its turn.
async fn run_serialized<T: Send + 'static>(
    gate: Arc<Mutex<()>>,
    op: impl FnOnce() -> crate::Result<T> + Send + 'static,
) -> crate::Result<T> {
    tokio::task::spawn_blocking(move || {
        let _guard = gate.lock().unwrap_or_else(PoisonError::into_inner);
        op()
    })
    .await
    .map_err(|e| EngineError::Protocol(format!("synthesis task panicked: {e}")))?
}
