//! Embedding policy and lifecycle vocabulary for module frames.

use std::fmt;

/// Device capabilities a module frame is allowed to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Accelerometer,
    Camera,
    Geolocation,
    Microphone,
}

impl Capability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accelerometer => "accelerometer",
            Self::Camera => "camera",
            Self::Geolocation => "geolocation",
            Self::Microphone => "microphone",
        }
    }
}

/// Relaxations applied to the otherwise fully isolated browsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxFlag {
    AllowSameOrigin,
    AllowScripts,
    AllowPopups,
    AllowForms,
    AllowModals,
}

impl SandboxFlag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllowSameOrigin => "allow-same-origin",
            Self::AllowScripts => "allow-scripts",
            Self::AllowPopups => "allow-popups",
            Self::AllowForms => "allow-forms",
            Self::AllowModals => "allow-modals",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePolicy {
    allow: &'static [Capability],
    sandbox: &'static [SandboxFlag],
}

/// The single policy every module frame is embedded with.
pub const MODULE_FRAME_POLICY: FramePolicy = FramePolicy {
    allow: &[
        Capability::Accelerometer,
        Capability::Camera,
        Capability::Geolocation,
        Capability::Microphone,
    ],
    sandbox: &[
        SandboxFlag::AllowSameOrigin,
        SandboxFlag::AllowScripts,
        SandboxFlag::AllowPopups,
        SandboxFlag::AllowForms,
        SandboxFlag::AllowModals,
    ],
};

impl FramePolicy {
    #[must_use]
    pub fn capabilities(&self) -> &'static [Capability] {
        self.allow
    }

    #[must_use]
    pub fn sandbox_flags(&self) -> &'static [SandboxFlag] {
        self.sandbox
    }

    #[must_use]
    pub fn permits(&self, flag: SandboxFlag) -> bool {
        self.sandbox.contains(&flag)
    }

    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        self.allow.contains(&capability)
    }

    /// Feature-policy rendering: `accelerometer; camera; ...`.
    #[must_use]
    pub fn allow_attribute(&self) -> String {
        self.allow
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Sandbox rendering: space separated flags.
    #[must_use]
    pub fn sandbox_attribute(&self) -> String {
        self.sandbox
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Coarse lifecycle of one mounted module frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLifecycle {
    Idle,
    Loading,
    Loaded,
    Revealed,
}

impl fmt::Display for FrameLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Revealed => "revealed",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Capability, MODULE_FRAME_POLICY, SandboxFlag};

    #[test]
    fn allow_attribute_lists_capabilities() {
        assert_eq!(
            MODULE_FRAME_POLICY.allow_attribute(),
            "accelerometer; camera; geolocation; microphone"
        );
    }

    #[test]
    fn sandbox_attribute_lists_flags() {
        assert_eq!(
            MODULE_FRAME_POLICY.sandbox_attribute(),
            "allow-same-origin allow-scripts allow-popups allow-forms allow-modals"
        );
    }

    #[test]
    fn policy_queries() {
        assert!(MODULE_FRAME_POLICY.permits(SandboxFlag::AllowModals));
        assert!(MODULE_FRAME_POLICY.allows(Capability::Camera));
        assert_eq!(MODULE_FRAME_POLICY.capabilities().len(), 4);
        assert_eq!(MODULE_FRAME_POLICY.sandbox_flags().len(), 5);
    }
}
