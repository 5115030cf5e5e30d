// ABOUTME: .NET runtime identifiers derived from the remote machine architecture.
// ABOUTME: Maps `uname -m` output to a RID and rejects architectures it does not know.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeIdError {
    #[error("remote machine reported an empty architecture")]
    Empty,

    #[error("unsupported remote architecture '{0}' (expected aarch64, armv7l, x86_64 or i686)")]
    UnknownArchitecture(String),
}

/// A Linux runtime identifier such as `linux-arm64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeIdentifier {
    LinuxArm64,
    LinuxArm,
    LinuxX64,
    LinuxX86,
}

impl RuntimeIdentifier {
    /// Map a machine name as printed by `uname -m`.
    pub fn from_machine(machine: &str) -> Result<Self, RuntimeIdError> {
        let machine = machine.trim();
        if machine.is_empty() {
            return Err(RuntimeIdError::Empty);
        }

        match machine.to_ascii_lowercase().as_str() {
            "aarch64" | "arm64" | "armv8l" => Ok(Self::LinuxArm64),
            "armv7l" | "armv6l" | "armhf" | "arm" => Ok(Self::LinuxArm),
            "x86_64" | "amd64" => Ok(Self::LinuxX64),
            "i686" | "i386" => Ok(Self::LinuxX86),
            _ => Err(RuntimeIdError::UnknownArchitecture(machine.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinuxArm64 => "linux-arm64",
            Self::LinuxArm => "linux-arm",
            Self::LinuxX64 => "linux-x64",
            Self::LinuxX86 => "linux-x86",
        }
    }
}

impl fmt::Display for RuntimeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_raspberry_pi_variants() {
        assert_eq!(
            RuntimeIdentifier::from_machine("aarch64\n").unwrap(),
            RuntimeIdentifier::LinuxArm64
        );
        assert_eq!(
            RuntimeIdentifier::from_machine("armv7l").unwrap().as_str(),
            "linux-arm"
        );
    }

    #[test]
    fn maps_x86_64() {
        assert_eq!(
            RuntimeIdentifier::from_machine("x86_64").unwrap().to_string(),
            "linux-x64"
        );
    }

    #[test]
    fn unknown_architecture_is_an_error() {
        assert_eq!(
            RuntimeIdentifier::from_machine("riscv64"),
            Err(RuntimeIdError::UnknownArchitecture("riscv64".to_string()))
        );
    }

    #[test]
    fn empty_output_is_an_error() {
        assert_eq!(
            RuntimeIdentifier::from_machine("  "),
            Err(RuntimeIdError::Empty)
        );
    }
}
