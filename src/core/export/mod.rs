//! Export workflow
//!
//! This module provides the three steps of a compliance export and the
//! coordinator that runs them in order:
//! - Submitting the export task ([`requester`])
//! - Polling the task until it finishes ([`poller`])
//! - Downloading the dataset archives ([`fetcher`])
//! - Summary and reporting ([`summary`])

pub mod coordinator;
pub mod fetcher;
pub mod poller;
pub mod requester;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::ExportCoordinator;
pub use fetcher::ArchiveFetcher;
pub use poller::{PollOutcome, PollPolicy, StatusPoller};
pub use requester::ExportRequester;
pub use summary::{ExportOutcome, ExportSummary};
