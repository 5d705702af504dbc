// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! VM capacity configuration.

/// Capacity limits for one VM instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum call depth.
    pub frames_max: usize,

    /// Stack slots budgeted per frame.
    pub slots_per_frame: usize,
}

impl VmConfig {
    /// Capacity of the shared operand stack.
    pub fn stack_max(&self) -> usize {
        self.frames_max * self.slots_per_frame
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            frames_max: 64,
            slots_per_frame: crate::limits::UINT8_COUNT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        let config = VmConfig::default();
        assert_eq!(config.frames_max, 64);
        assert_eq!(config.stack_max(), 16_384);
    }
}
