//! Fee status component state
//!
//! One `FeeStatusModule` lives from activation to teardown. It owns the
//! roster, the sort state and the reason drafts. Roster changes only ever
//! come from a completed request; failures are logged and leave state as
//! it was. Several status updates may be in flight at once, each merging
//! only its own record.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::editor::{KeyInput, ReasonEditor};
use crate::error::{CoreError, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity};
use crate::models::{DownloadRequest, Officer, StatusUpdate, Student};
use crate::roster::Roster;
use crate::sort::{sort, Column, SortState};
use crate::types::{Action, StudentId};
use crate::ApiRef;

/// Logger reference type
pub type LoggerRef = Arc<dyn ErrorLogger>;

#[derive(Debug, Default)]
struct ModuleState {
    roster: Roster,
    sort: SortState,
    editor: ReasonEditor,
}

/// The fee status component
pub struct FeeStatusModule {
    api: ApiRef,
    officer: Officer,
    logger: LoggerRef,
    state: RwLock<ModuleState>,
    activated: AtomicBool,
    alive: AtomicBool,
}

impl FeeStatusModule {
    /// Create a module over an API handle
    pub fn new(api: ApiRef, officer: Officer) -> Self {
        Self {
            api,
            officer,
            logger: Arc::new(DefaultErrorLogger),
            state: RwLock::new(ModuleState::default()),
            activated: AtomicBool::new(false),
            alive: AtomicBool::new(true),
        }
    }

    /// Replace the error sink
    pub fn with_logger(mut self, logger: LoggerRef) -> Self {
        self.logger = logger;
        self
    }

    /// Start with a given sort state instead of `(enrollmentNo, asc)`
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.state.get_mut().sort = sort;
        self
    }

    pub fn officer(&self) -> &Officer {
        &self.officer
    }

    /// `false` once torn down
    pub fn is_active(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    // ==================== Lifecycle ====================

    /// Load the roster. Runs at most once per module; returns whether the
    /// roster was populated by this call.
    pub async fn activate(&self) -> bool {
        if self.activated.swap(true, Ordering::SeqCst) {
            self.logger.log_warning(
                "module already activated, roster not reloaded",
                &ErrorContext::new("load_roster"),
            );
            return false;
        }

        let context = ErrorContext::new("load_roster");
        match self.api.fetch_students().await {
            Ok(students) => {
                // teardown may land while the write lock is contended
                let mut state = self.state.write().await;
                if !self.is_active() {
                    let context = context.with_data("discarded", serde_json::json!(students.len()));
                    self.report(&CoreError::NotActive, &context);
                    return false;
                }
                state.roster.replace_all(students);
                log::info!(target: "feestatus::module", "Loaded {} students", state.roster.len());
                true
            }
            Err(e) => {
                self.report(&e, &context);
                false
            }
        }
    }

    /// Route an error to the logger by its severity
    fn report(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Error => self.logger.log_error(error, context),
            ErrorSeverity::Warning => self.logger.log_warning(&error.to_string(), context),
            ErrorSeverity::Info | ErrorSeverity::Debug => self.logger.log_debug(&error.to_string(), context),
        }
    }

    /// Discard the module; responses resolving afterwards are dropped
    pub fn teardown(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            log::debug!(target: "feestatus::module", "Fee status module torn down");
        }
    }

    // ==================== Status Updates ====================

    /// Apply an officer decision without a value
    pub async fn set_action(&self, id: &StudentId, action: Action) -> Option<Student> {
        self.submit(id, StatusUpdate::action(action)).await
    }

    /// Reject with a reason
    pub async fn set_rejection_reason(&self, id: &StudentId, reason: &str) -> Option<Student> {
        self.submit(id, StatusUpdate::rejection(reason)).await
    }

    /// Feed one key of the reason field. Submits only when the key
    /// confirms the draft.
    pub async fn reason_key(&self, id: &StudentId, key: KeyInput) -> Option<Student> {
        let update = {
            let mut state = self.state.write().await;
            state.editor.key(id, key)
        }?;
        self.submit(id, update).await
    }

    /// Current reason draft for a student
    pub async fn reason_draft(&self, id: &StudentId) -> String {
        self.state.read().await.editor.draft(id).to_string()
    }

    async fn submit(&self, id: &StudentId, update: StatusUpdate) -> Option<Student> {
        let context = ErrorContext::new("update_status")
            .with_student(id)
            .with_data("action", serde_json::json!(update.action));

        if !self.is_active() {
            self.report(&CoreError::NotActive, &context);
            return None;
        }

        let record = match self.api.update_student(id, &update).await {
            Ok(record) => record,
            Err(e) => {
                self.report(&e, &context);
                return None;
            }
        };

        if record.id != *id {
            let error = CoreError::IdMismatch {
                requested: id.to_string(),
                returned: record.id.to_string(),
            };
            self.report(&error, &context);
            return None;
        }

        let mut state = self.state.write().await;
        if !self.is_active() {
            self.report(&CoreError::NotActive, &context);
            return None;
        }
        if !state.roster.merge(record.clone()) {
            self.report(&CoreError::StudentNotFound { id: id.to_string() }, &context);
            return None;
        }

        log::info!(
            target: "feestatus::module",
            "Student {} marked {}",
            id,
            update.action
        );
        Some(record)
    }

    // ==================== Sorting ====================

    pub async fn sort_state(&self) -> SortState {
        self.state.read().await.sort
    }

    /// Header click
    pub async fn handle_sort(&self, column: Column) -> SortState {
        let mut state = self.state.write().await;
        state.sort = state.sort.toggle(column);
        state.sort
    }

    /// Roster in display order
    pub async fn sorted(&self) -> Vec<Student> {
        let state = self.state.read().await;
        let records = state.roster.to_vec();
        sort(&records, state.sort.column, state.sort.direction)
    }

    // ==================== Lookup ====================

    pub async fn student(&self, id: &StudentId) -> Option<Student> {
        self.state.read().await.roster.get(id).cloned()
    }

    /// Resolve an id typed as text
    pub async fn resolve_id(&self, key: &str) -> Option<StudentId> {
        self.state.read().await.roster.resolve(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.roster.len()
    }

    /// Download affordance for a student's proof of payment
    pub async fn download_request(&self, id: &StudentId) -> Option<DownloadRequest> {
        let state = self.state.read().await;
        state.roster.get(id).and_then(DownloadRequest::for_student)
    }

    // ==================== Officer ====================

    /// Officer signup; the response carries nothing the module keeps
    pub async fn signup(&self) -> bool {
        match self.api.signup().await {
            Ok(()) => {
                log::info!(target: "feestatus::module", "Signup sent for {}", self.officer.name);
                true
            }
            Err(e) => {
                self.report(&e, &ErrorContext::new("signup"));
                false
            }
        }
    }
}
