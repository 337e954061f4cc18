//! Core fee status logic
//!
//! - models/types: student records and the status update contract
//! - sort: column sort engine and header toggle
//! - roster: keyed record store with merge-by-id
//! - editor: rejection reason drafts, submitted on confirmation only
//! - module: the component state tying it together over a [`FeeStatusApi`]

pub mod editor;
pub mod error;
pub mod models;
pub mod module;
pub mod roster;
pub mod sort;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;

pub use editor::{KeyInput, ReasonEditor};
pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity};
pub use models::{DownloadRequest, Officer, StatusUpdate, Student};
pub use module::FeeStatusModule;
pub use roster::Roster;
pub use sort::{sort, sort_by_key_name, toggle, Column, SortDirection, SortKey, SortState};
pub use types::{Action, FeeStatus, Lenient, Scalar, StudentId};

/// API reference type
pub type ApiRef = Arc<dyn FeeStatusApi>;

// ==================== API Trait ====================

/// Remote FeeStatus API as seen by the module
#[async_trait]
pub trait FeeStatusApi: Send + Sync {
    /// `GET /api/FeeStatus/students`
    async fn fetch_students(&self) -> CoreResult<Vec<Student>>;

    /// `PATCH /api/FeeStatus/students/{id}`; resolves with the authoritative record
    async fn update_student(&self, id: &StudentId, update: &StatusUpdate) -> CoreResult<Student>;

    /// `POST /api/FeeStatus/signup`
    async fn signup(&self) -> CoreResult<()>;
}
