//! Capability allow-lists and sandbox restriction sets.
//!
//! The per-kind policy asymmetry is a hard requirement, not a default:
//! the camera kinds (barcode, MRZ) need camera/microphone access and a
//! tight sandbox; the document scanner gets NO camera but an elevated
//! sandbox with downloads and popups. Granting camera to the document
//! scanner, or withholding downloads/popups from it, breaks the
//! respective widget.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use crate::widget::WidgetKind;

// ============================================================================
// Capability
// ============================================================================

/// A hardware/browser feature a frame may be granted.
///
/// Rendered into the frame's `allow` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Live camera access.
    Camera,

    /// Microphone access.
    Microphone,
}

impl Capability {
    /// Returns the `allow` attribute directive for this capability.
    #[must_use]
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Camera => "camera *",
            Self::Microphone => "microphone *",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}

// ============================================================================
// CapabilityPolicy
// ============================================================================

/// Allow-list of capabilities granted to one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityPolicy {
    /// Granted capabilities, in attribute order.
    capabilities: Vec<Capability>,
}

impl CapabilityPolicy {
    /// Creates an empty policy (nothing granted).
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self {
            capabilities: Vec::new(),
        }
    }

    /// Returns the policy required by a widget kind.
    ///
    /// | Kind | Capabilities |
    /// |------|--------------|
    /// | Barcode | camera, microphone |
    /// | MRZ | camera, microphone |
    /// | DocumentScanner | *(none; camera must be absent)* |
    #[must_use]
    pub fn for_kind(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Barcode | WidgetKind::Mrz => Self {
                capabilities: vec![Capability::Camera, Capability::Microphone],
            },
            WidgetKind::DocumentScanner => Self::none(),
        }
    }

    /// Returns `true` if the capability is granted.
    #[inline]
    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Returns the granted capabilities.
    #[inline]
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Renders the frame `allow` attribute.
    ///
    /// Empty policies render to an empty string (no attribute).
    #[must_use]
    pub fn to_allow_attribute(&self) -> String {
        self.capabilities
            .iter()
            .map(Capability::as_directive)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ============================================================================
// SandboxFlag
// ============================================================================

/// A restriction lifted from a sandboxed frame.
///
/// Rendered into the frame's `sandbox` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SandboxFlag {
    /// Allow script execution.
    Scripts,

    /// Treat content as same-origin.
    SameOrigin,

    /// Allow file downloads.
    Downloads,

    /// Allow opening popups.
    Popups,
}

impl SandboxFlag {
    /// Returns the `sandbox` attribute token for this flag.
    #[must_use]
    pub const fn as_token(&self) -> &'static str {
        match self {
            Self::Scripts => "allow-scripts",
            Self::SameOrigin => "allow-same-origin",
            Self::Downloads => "allow-downloads",
            Self::Popups => "allow-popups",
        }
    }
}

impl fmt::Display for SandboxFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

// ============================================================================
// SandboxPolicy
// ============================================================================

/// Restriction set applied to one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SandboxPolicy {
    /// Lifted restrictions, in attribute order.
    flags: Vec<SandboxFlag>,
}

impl SandboxPolicy {
    /// Returns the policy required by a widget kind.
    ///
    /// | Kind | Sandbox |
    /// |------|---------|
    /// | Barcode | scripts, same-origin |
    /// | MRZ | scripts, same-origin |
    /// | DocumentScanner | scripts, same-origin, downloads, popups |
    #[must_use]
    pub fn for_kind(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Barcode | WidgetKind::Mrz => Self {
                flags: vec![SandboxFlag::Scripts, SandboxFlag::SameOrigin],
            },
            WidgetKind::DocumentScanner => Self {
                flags: vec![
                    SandboxFlag::Scripts,
                    SandboxFlag::SameOrigin,
                    SandboxFlag::Downloads,
                    SandboxFlag::Popups,
                ],
            },
        }
    }

    /// Returns `true` if the restriction is lifted.
    #[inline]
    #[must_use]
    pub fn permits(&self, flag: SandboxFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Returns the lifted restrictions.
    #[inline]
    #[must_use]
    pub fn flags(&self) -> &[SandboxFlag] {
        &self.flags
    }

    /// Renders the frame `sandbox` attribute.
    #[must_use]
    pub fn to_attribute(&self) -> String {
        self.flags
            .iter()
            .map(SandboxFlag::as_token)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// Tests
// ============================================================================
