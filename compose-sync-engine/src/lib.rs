//! # compose-sync-engine
//!
//! The reconciliation pass: synchronize the checkout, detect changed
//! projects, classify every disk project against the remote inventory and
//! converge the remote.
//!
//! [`run_pass`] is the single entrypoint used by `compose-sync run`;
//! [`inspect`] is its read-only counterpart used by `compose-sync status`.

pub mod error;
pub mod index;
pub mod pipeline;
pub mod plan;
pub mod reconcile;
pub mod report;
pub mod tiebreak;

pub use error::EngineError;
pub use index::RemoteIndex;
pub use pipeline::{inspect, run_pass, InspectedProject, Inspection, PassOptions};
pub use plan::{classify, plan, Action, PlannedProject};
pub use reconcile::Reconciler;
pub use report::{FailureStage, ProjectOutcome, ProjectReport, RunCounts, RunReport, StartOutcome};
pub use tiebreak::select_preferred;
