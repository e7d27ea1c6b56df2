//! Frame hosting: policies, content resolution, mount/unmount.
//!
//! One [`FrameHost`] exists per embedded widget type. It constructs the
//! isolated frame exactly once for the lifetime of a mount, wires the
//! frame's content source from a precomputed base location, applies the
//! kind's capability and sandbox policy, and owns the bus subscription
//! whose token guarantees deterministic teardown.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `policy` | Capability allow-lists and sandbox restriction sets |
//! | `resources` | Content source resolution |
//! | `frame` | Resolved frame descriptors |
//! | `container` | The embedder's slot for frame elements |
//! | `controller` | [`FrameHost`] mount/unmount lifecycle |

// ============================================================================
// Submodules
// ============================================================================

mod container;
mod controller;
mod frame;
mod policy;
mod resources;

// ============================================================================
// Re-exports
// ============================================================================

pub use container::{FrameContainer, NullContainer};
pub use controller::{FrameHost, HostConfig};
pub use frame::{DEFAULT_FRAME_STYLE, FrameDescriptor};
pub use policy::{Capability, CapabilityPolicy, SandboxFlag, SandboxPolicy};
pub use resources::{ResourceLocator, WidgetResources};
