//! Text patching of target files.
//!
//! Each target is read, run through its edits in memory, and written back
//! only when the content changed. Targets are independent: a failure in one
//! is reported and the rest still run.

mod edit;
mod target;

pub use edit::{CompiledEdit, EditOutcome, EditReport, apply_edits};
pub use target::{ResolvedTarget, TargetOutcome, TargetReport, patch_target, write_atomic};
