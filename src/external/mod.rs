//! Host environment abstractions
//!
//! Trait-based seams for the side effects the flows need from the machine
//! they run on: launching processes and opening a location for the user.

pub mod opener;
pub mod process;

pub use opener::{OpenError, PrintOpener, ResourceOpener, SystemOpener};
pub use process::{ExitReport, ProcessRunner, SpawnError, TokioProcessRunner};
