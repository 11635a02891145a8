use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Compute device a model can be loaded on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda(u32),
}

impl Device {
    /// Whether this device can be unavailable at runtime
    ///
    /// Accelerators get one CPU fallback attempt when loading fails; a
    /// CPU load failure is final.
    pub const fn is_accelerator(self) -> bool {
        matches!(self, Self::Cuda(_))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda(ordinal) => write!(f, "cuda:{ordinal}"),
        }
    }
}

/// Device string was not `cpu`, `cuda` or `cuda:N`
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized device `{0}`, expected `cpu`, `cuda` or `cuda:N`")]
pub struct DeviceParseError(pub String);

impl FromStr for Device {
    type Err = DeviceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda(0)),
            other => match other.strip_prefix("cuda:") {
                Some(ordinal) => ordinal
                    .parse()
                    .map(Self::Cuda)
                    .map_err(|_| DeviceParseError(s.to_string())),
                None => Err(DeviceParseError(s.to_string())),
            },
        }
    }
}
