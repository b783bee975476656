//! Diagnostics for the Lathe formatter.
//!
//! Two tiers: `F`-coded fatal input defects abort the render of their file;
//! `W`-coded warnings report best-effort repairs and layout degradations
//! without failing the run. See [`DiagCode`] for the code inventory.

mod code;
mod diagnostic;
mod queue;

pub use code::DiagCode;
pub use diagnostic::{Diagnostic, Label, Severity};
pub use queue::DiagnosticQueue;
