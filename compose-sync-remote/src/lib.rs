//! # compose-sync-remote
//!
//! Remote inventory access for the orchestration API.
//!
//! [`RemoteInventory`] is the capability the engine depends on; [`ArcaneClient`]
//! implements it over blocking HTTP. There is no business logic here: requests
//! map to responses and non-2xx responses map to [`RemoteError::Status`].

pub mod client;
pub mod error;
pub mod inventory;
pub mod pagination;

pub use client::ArcaneClient;
pub use error::RemoteError;
pub use inventory::{NewProject, ProjectUpdate, RemoteInventory};
pub use pagination::{collect_pages, Pagination, ProjectPage, PAGE_SIZE};
