//! Prelude module for convenient imports
//!
//! ```ignore
//! use sl2_core::prelude::*;
//! ```
//!
//! This brings the following into scope:
//!
//! - Container types: `SaveContainer`, `PatchTarget`, `PatchReport`
//! - Game selection: `GameVariant`
//! - Configuration: `EditorConfig`
//! - Error handling: `Error`, `Result`

// Container and patching
pub use crate::container::{NameWarning, PatchReport, PatchTarget, SaveContainer, SlotPatch};
pub use crate::patch::FieldChange;

// Game profiles
pub use crate::profile::GameVariant;

// Configuration
pub use crate::config::{EditorConfig, EditorConfigBuilder};

// Error handling
pub use crate::error::{Error, Result};
