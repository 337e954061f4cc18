//! HTTP client for the FeeStatus API
//!
//! - client: `HttpFeeStatusApi`, the reqwest implementation of `FeeStatusApi`
//! - download: proof-of-payment downloads
//!
//! Endpoints:
//! - `GET    /api/FeeStatus/students`
//! - `PATCH  /api/FeeStatus/students/{id}`
//! - `POST   /api/FeeStatus/signup`

pub mod download;
pub mod error;

use async_trait::async_trait;
use feestatus_config::ApiConfig;
use feestatus_core::{CoreResult, FeeStatusApi, StatusUpdate, Student, StudentId};
use serde::de::DeserializeOwned;

pub use download::ProofDownloader;
pub use error::ApiError;

const API_PREFIX: &str = "/api/FeeStatus";

/// reqwest-backed FeeStatus API client
#[derive(Debug, Clone)]
pub struct HttpFeeStatusApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFeeStatusApi {
    /// Build a client from the `api` config section
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Use an existing reqwest client
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn student_endpoint(&self, id: &StudentId) -> String {
        let id = id.to_string();
        self.endpoint(&format!("/students/{}", urlencoding::encode(&id)))
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode { message: e.to_string() })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Fetch the full roster. Records are decoded one by one; a record
    /// that does not decode is logged and skipped.
    pub async fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        let url = self.endpoint("/students");
        log::debug!(target: "feestatus::api", "GET {}", url);
        let response = self.client.get(&url).send().await?;
        let records: Vec<serde_json::Value> = Self::read_json(response).await?;
        Ok(decode_roster(records))
    }

    /// Send a status update for one student
    pub async fn patch_student(&self, id: &StudentId, update: &StatusUpdate) -> Result<Student, ApiError> {
        let url = self.student_endpoint(id);
        log::debug!(target: "feestatus::api", "PATCH {} action={}", url, update.action);
        let response = self.client.patch(&url).json(update).send().await?;
        Self::read_json(response).await
    }

    /// Officer signup
    pub async fn post_signup(&self) -> Result<(), ApiError> {
        let url = self.endpoint("/signup");
        log::debug!(target: "feestatus::api", "POST {}", url);
        let response = self.client.post(&url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

fn decode_roster(records: Vec<serde_json::Value>) -> Vec<Student> {
    let total = records.len();
    let students: Vec<Student> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let id = record
                .get("id")
                .map(|id| id.to_string())
                .unwrap_or_else(|| format!("#{}", index));
            match serde_json::from_value::<Student>(record) {
                Ok(student) => Some(student),
                Err(e) => {
                    log::warn!(target: "feestatus::api", "Skipping student record {}: {}", id, e);
                    None
                }
            }
        })
        .collect();
    if students.len() < total {
        log::warn!(
            target: "feestatus::api",
            "Decoded {} of {} student records",
            students.len(),
            total
        );
    }
    students
}

#[async_trait]
impl FeeStatusApi for HttpFeeStatusApi {
    async fn fetch_students(&self) -> CoreResult<Vec<Student>> {
        self.list_students().await.map_err(|e| e.into_core("load_roster"))
    }

    async fn update_student(&self, id: &StudentId, update: &StatusUpdate) -> CoreResult<Student> {
        self.patch_student(id, update)
            .await
            .map_err(|e| e.into_core("update_status"))
    }

    async fn signup(&self) -> CoreResult<()> {
        self.post_signup().await.map_err(|e| e.into_core("signup"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpFeeStatusApi {
        HttpFeeStatusApi::with_client(reqwest::Client::new(), base)
    }

    #[test]
    fn test_endpoints() {
        let api = api("https://localhost:7209/");
        assert_eq!(api.base_url(), "https://localhost:7209");
        assert_eq!(api.endpoint("/students"), "https://localhost:7209/api/FeeStatus/students");
        assert_eq!(
            api.student_endpoint(&StudentId::Number(2)),
            "https://localhost:7209/api/FeeStatus/students/2"
        );
    }

    #[test]
    fn test_student_id_is_percent_encoded() {
        let api = api("http://127.0.0.1:8080");
        assert_eq!(
            api.student_endpoint(&StudentId::Text("BCA/2021 7".to_string())),
            "http://127.0.0.1:8080/api/FeeStatus/students/BCA%2F2021%207"
        );
    }

    #[test]
    fn test_bad_record_does_not_empty_roster() {
        let records = vec![
            serde_json::json!({"id": 1, "fullName": "Bob", "remarks": "accept"}),
            serde_json::json!({"id": 2, "fullName": "Amy", "remarks": "on hold"}),
            serde_json::json!({"fullName": "No id"}),
            serde_json::json!({"id": 3, "fullName": "Cara", "Amount": "45,000"}),
        ];

        let students = decode_roster(records);

        let ids: Vec<StudentId> = students.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![StudentId::Number(1), StudentId::Number(3)]);
        assert_eq!(students[1].amount.as_ref().map(|a| a.to_string()), Some("45,000".to_string()));
    }

    #[test]
    fn test_new_from_config() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            accept_invalid_certs: true,
        };
        let api = HttpFeeStatusApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://127.0.0.1:9");
    }
}
