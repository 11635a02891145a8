use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the worker command is missing or a numeric
    /// budget is zero
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.model.runner.is_empty() {
            anyhow::bail!("model.runner must name a worker command");
        }

        if self.server.synthesis_timeout_secs == 0 {
            anyhow::bail!("server.synthesis_timeout_secs must be greater than 0");
        }

        if self.server.body_limit_bytes == 0 {
            anyhow::bail!("server.body_limit_bytes must be greater than 0");
        }

        if self.model.load_timeout_secs == 0 {
            anyhow::bail!("model.load_timeout_secs must be greater than 0");
        }

        if self.generation.max_new_tokens == 0 {
            anyhow::bail!("generation.max_new_tokens must be greater than 0");
        }

        if self.voices.dir.as_os_str().is_empty() {
            anyhow::bail!("voices.dir must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn load_str(raw: &str) -> anyhow::Result<Config> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(raw.as_bytes()).unwrap();
        Config::load(file.path())
    }

    #[test]
    fn empty_config_gets_defaults() {
        let config = load_str("").unwrap();
        assert_eq!(config.server.listen_address.port(), 8000);
        assert_eq!(config.server.synthesis_timeout_secs, 300);
        assert_eq!(config.model.device, "cuda");
        assert_eq!(config.model.model_dir, "Qwen/Qwen3-TTS-12Hz-1.7B-Base");
        assert_eq!(config.voices.dir, std::path::PathBuf::from("voices"));
        assert_eq!(config.audio.ffmpeg, "ffmpeg");
        assert_eq!(config.generation.max_new_tokens, 2048);
    }

    #[test]
    fn sections_override_defaults() {
        let config = load_str(
            r#"
            [server]
            listen_address = "127.0.0.1:9000"
            synthesis_timeout_secs = 30

            [model]
            runner = ["python", "worker.py"]
            device = "cuda:1"

            [generation]
            temperature = 0.7

            [generation.subtalker]
            top_k = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen_address.port(), 9000);
        assert_eq!(config.server.synthesis_timeout_secs, 30);
        assert_eq!(config.model.runner, vec!["python", "worker.py"]);
        assert_eq!(config.model.device, "cuda:1");
        assert!((config.generation.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.generation.subtalker.top_k, 20);
    }

    #[test]
    fn env_placeholders_expand() {
        temp_env::with_var("TIMBRE_TEST_DEVICE", Some("cpu"), || {
            let config = load_str(
                r#"
                [model]
                device = "{{ env.TIMBRE_TEST_DEVICE }}"
                "#,
            )
            .unwrap();
            assert_eq!(config.model.device, "cpu");
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = load_str("[server]\nlisten_adress = \"0.0.0.0:1\"").unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn empty_runner_fails_validation() {
        let err = load_str("[model]\nrunner = []").unwrap_err();
        assert!(err.to_string().contains("model.runner"));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let err = load_str("[server]\nsynthesis_timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("synthesis_timeout_secs"));
    }
}
