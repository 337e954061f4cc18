//! In-process stand-in for the FeeStatus API server

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use feestatus_core::{Action, StatusUpdate, Student};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const PROOF_BYTES: &[u8] = b"%PDF-1.4 proof";

#[derive(Clone, Default)]
pub struct StubState {
    pub students: Arc<Mutex<Vec<Student>>>,
    pub patches: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    pub signups: Arc<AtomicUsize>,
}

impl StubState {
    pub fn signup_count(&self) -> usize {
        self.signups.load(Ordering::SeqCst)
    }
}

async fn list_students(State(state): State<StubState>) -> Json<Vec<Student>> {
    Json(state.students.lock().unwrap().clone())
}

async fn patch_student(
    State(state): State<StubState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Student>, StatusCode> {
    state.patches.lock().unwrap().push((id.clone(), body.clone()));
    let update: StatusUpdate = serde_json::from_value(body).map_err(|_| StatusCode::BAD_REQUEST)?;

    let mut students = state.students.lock().unwrap();
    let student = students
        .iter_mut()
        .find(|s| s.id.to_string() == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    student.remarks = Some(update.action);
    student.reason = match update.action {
        Action::Reject => update.value,
        Action::Accept => None,
    };
    Ok(Json(student.clone()))
}

async fn signup(State(state): State<StubState>) -> StatusCode {
    state.signups.fetch_add(1, Ordering::SeqCst);
    StatusCode::CREATED
}

async fn proof(Path(_name): Path<String>) -> &'static [u8] {
    PROOF_BYTES
}

/// Serve `router` on an ephemeral port; returns the base URL
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A well-behaved FeeStatus server seeded with `students`
pub async fn spawn(students: Vec<Student>) -> (String, StubState) {
    let state = StubState::default();
    *state.students.lock().unwrap() = students;
    let router = Router::new()
        .route("/api/FeeStatus/students", get(list_students))
        .route("/api/FeeStatus/students/:id", patch(patch_student))
        .route("/api/FeeStatus/signup", post(signup))
        .route("/uploads/:name", get(proof))
        .with_state(state.clone());
    (serve(router).await, state)
}

/// A unique scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("feestatus-{}-{}-{}", name, std::process::id(), nanos))
}
