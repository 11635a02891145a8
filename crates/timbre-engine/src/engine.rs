use std::path::Path;

use crate::{CloneJob, DesignJob, Device, SynthesisOutput, VoiceClonePrompt};

/// A loaded synthesis model
///
/// Calls are blocking and not required to be reentrant; `ModelManager`
/// serializes them and moves them off the async runtime. Implementations
/// release their resources on drop.
pub trait VoiceCloneEngine: Send + Sync {
    /// Clone a reference voice and speak `job.text` with it
    fn synthesize(&self, job: &CloneJob) -> crate::Result<SynthesisOutput>;

    /// Analyze a reference voice once for reuse across many generations
    fn derive_prompt(&self, ref_audio: &Path, ref_text: &str, x_vector_only: bool) -> crate::Result<VoiceClonePrompt>;

    /// Speak `text` with a previously derived prompt
    fn synthesize_with_prompt(
        &self,
        prompt: &VoiceClonePrompt,
        text: &str,
        language: &str,
        params: &timbre_core::GenerationParams,
    ) -> crate::Result<SynthesisOutput>;

    /// Invent a voice from a description and speak `job.text` with it
    fn synthesize_design(&self, job: &DesignJob) -> crate::Result<SynthesisOutput>;

    /// Output sample rate the engine produces
    fn sample_rate(&self) -> u32;
}

impl std::fmt::Debug for dyn VoiceCloneEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceCloneEngine").finish_non_exhaustive()
    }
}

/// Factory that places a model on a device
///
/// The manager calls this once per device attempt; a returned error means
/// the model cannot run on that device.
pub trait EngineLoader: Send + Sync {
    fn load(&self, device: Device) -> crate::Result<Box<dyn VoiceCloneEngine>>;
}
