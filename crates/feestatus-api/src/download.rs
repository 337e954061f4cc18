//! Proof-of-payment downloads

use bytes::Bytes;
use feestatus_core::DownloadRequest;
use feestatus_utils::{sanitize_filename, url_extension};
use reqwest::Url;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::{ApiError, HttpFeeStatusApi};

/// Fetches uploaded proofs and stores them on disk
#[derive(Debug, Clone)]
pub struct ProofDownloader {
    client: reqwest::Client,
    base_url: String,
}

impl ProofDownloader {
    /// Share the API client's connection pool and base URL
    pub fn new(api: &HttpFeeStatusApi) -> Self {
        Self {
            client: api.client().clone(),
            base_url: api.base_url().to_string(),
        }
    }

    /// Absolute URL for a proof reference, resolved against the API base URL
    pub fn resolve_url(&self, reference: &str) -> Result<Url, ApiError> {
        let base = Url::parse(&format!("{}/", self.base_url)).map_err(|e| ApiError::InvalidUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;
        let reference = reference.trim();
        base.join(reference).map_err(|e| ApiError::InvalidUrl {
            url: reference.to_string(),
            message: e.to_string(),
        })
    }

    /// Sanitized stem and lower-cased extension of the stored file
    fn name_parts(request: &DownloadRequest) -> (String, Option<String>) {
        (
            sanitize_filename(&request.filename),
            url_extension(&request.url).map(str::to_lowercase),
        )
    }

    /// File name the proof is stored under: the suggested name, plus the
    /// reference's extension when it has one
    pub fn target_name(request: &DownloadRequest) -> String {
        let (stem, ext) = Self::name_parts(request);
        file_name(&stem, ext.as_deref(), 0)
    }

    /// Fetch the proof bytes
    pub async fn fetch(&self, request: &DownloadRequest) -> Result<Bytes, ApiError> {
        let url = self.resolve_url(&request.url)?;
        log::debug!(target: "feestatus::download", "GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.bytes().await?)
    }

    /// Download into `dir`, creating it if needed. Existing files are kept;
    /// a numbered name is used instead. Returns the written path.
    pub async fn download(&self, request: &DownloadRequest, dir: &Path) -> Result<PathBuf, ApiError> {
        let bytes = self.fetch(request).await?;

        tokio::fs::create_dir_all(dir).await?;
        let (stem, ext) = Self::name_parts(request);
        let path = free_path(dir, &stem, ext.as_deref()).await?;
        let partial = dir.join(format!(".{}.part", file_name(&stem, ext.as_deref(), 0)));

        if let Err(e) = write_file(&partial, &bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }
        tokio::fs::rename(&partial, &path).await?;

        log::info!(
            target: "feestatus::download",
            "Saved {} bytes to {}",
            bytes.len(),
            path.display()
        );
        Ok(path)
    }
}

fn file_name(stem: &str, ext: Option<&str>, n: usize) -> String {
    match (n, ext) {
        (0, Some(ext)) => format!("{}.{}", stem, ext),
        (0, None) => stem.to_string(),
        (n, Some(ext)) => format!("{}_{}.{}", stem, n, ext),
        (n, None) => format!("{}_{}", stem, n),
    }
}

/// First of `stem.ext`, `stem_1.ext`, ... not present in `dir`
async fn free_path(dir: &Path, stem: &str, ext: Option<&str>) -> Result<PathBuf, ApiError> {
    let mut n = 0;
    loop {
        let path = dir.join(file_name(stem, ext, n));
        if !tokio::fs::try_exists(&path).await? {
            return Ok(path);
        }
        n += 1;
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downloader(base: &str) -> ProofDownloader {
        let api = HttpFeeStatusApi::with_client(reqwest::Client::new(), base);
        ProofDownloader::new(&api)
    }

    fn resolve(d: &ProofDownloader, reference: &str) -> String {
        d.resolve_url(reference).unwrap().to_string()
    }

    #[test]
    fn test_resolve_url() {
        let d = downloader("https://localhost:7209");
        assert_eq!(resolve(&d, "/uploads/a.pdf"), "https://localhost:7209/uploads/a.pdf");
        assert_eq!(resolve(&d, " uploads/a.pdf "), "https://localhost:7209/uploads/a.pdf");
        assert_eq!(resolve(&d, "https://cdn.example.edu/a.pdf"), "https://cdn.example.edu/a.pdf");
    }

    #[test]
    fn test_resolve_url_scheme_relative_and_case() {
        let d = downloader("https://localhost:7209");
        assert_eq!(resolve(&d, "//cdn.example.edu/a.pdf"), "https://cdn.example.edu/a.pdf");
        assert_eq!(resolve(&d, "HTTPS://CDN.Example.edu/a.pdf"), "https://cdn.example.edu/a.pdf");
    }

    #[test]
    fn test_resolve_url_keeps_base_path() {
        let d = downloader("http://127.0.0.1:8080/fees/");
        assert_eq!(resolve(&d, "uploads/a.pdf"), "http://127.0.0.1:8080/fees/uploads/a.pdf");
    }

    #[test]
    fn test_invalid_base_url() {
        let d = downloader("not a url");
        assert!(matches!(d.resolve_url("/uploads/a.pdf"), Err(ApiError::InvalidUrl { .. })));
    }

    #[test]
    fn test_target_name() {
        let request = DownloadRequest {
            url: "/uploads/scan.PNG".to_string(),
            filename: "Amy Shah_ProofOfPayment".to_string(),
        };
        assert_eq!(ProofDownloader::target_name(&request), "Amy_Shah_ProofOfPayment.png");

        let request = DownloadRequest {
            url: "/files/42".to_string(),
            filename: "Bob_ProofOfPayment".to_string(),
        };
        assert_eq!(ProofDownloader::target_name(&request), "Bob_ProofOfPayment");
    }

    #[test]
    fn test_numbered_file_names() {
        assert_eq!(file_name("Bob_ProofOfPayment", Some("pdf"), 2), "Bob_ProofOfPayment_2.pdf");
        assert_eq!(file_name("Bob_ProofOfPayment", None, 1), "Bob_ProofOfPayment_1");
    }
}
