// Analysis Client - one multipart POST per submission, no retries

use crate::error::{AnalysisError, ConfigError};
use crate::industry::IndustrySegment;
use futures::future::{BoxFuture, FutureExt};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::{debug, error, info};
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// A financial statement picked by the user. Contents are opaque to the client.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
        }
    }

    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, contents })
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("bytes", &self.contents.len())
            .finish()
    }
}

/// The single network exchange. Implementations must surface every failure
/// as an `AnalysisError` and never retry.
pub trait AnalysisClient: Send + Sync {
    fn analyze(
        &self,
        file: UploadFile,
        industry: IndustrySegment,
    ) -> BoxFuture<'static, Result<Value, AnalysisError>>;
}

#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: reqwest::Client,
    upload_url: Url,
}

impl HttpAnalysisClient {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            http: reqwest::Client::new(),
            upload_url: upload_url(base_url)?,
        })
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }
}

impl AnalysisClient for HttpAnalysisClient {
    fn analyze(
        &self,
        file: UploadFile,
        industry: IndustrySegment,
    ) -> BoxFuture<'static, Result<Value, AnalysisError>> {
        let http = self.http.clone();
        let url = self.upload_url.clone();

        async move {
            info!(
                "POST {} industry={} file='{}' ({} bytes)",
                url,
                industry,
                file.file_name,
                file.len()
            );

            let part = Part::bytes(file.contents).file_name(file.file_name);
            let form = Form::new().part("file", part);

            let response = http
                .post(url)
                .query(&[("industry", industry.as_str())])
                .multipart(form)
                .send()
                .await
                .map_err(|e| {
                    error!("Analysis request failed: {}", e);
                    AnalysisError::Network(e)
                })?;

            let status = response.status();
            if !status.is_success() {
                error!("Analysis service answered {}", status);
                return Err(AnalysisError::Status(status));
            }

            let body = response.bytes().await?;
            debug!("Analysis response: {} bytes", body.len());
            parse_response(&body)
        }
        .boxed()
    }
}

/// Validate and join `/upload` onto the configured base URL.
pub fn upload_url(base_url: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let base = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
    }
    if base.query().is_some() {
        return Err(invalid("base URL must not carry a query".to_string()));
    }

    let joined = format!("{}/upload", base.as_str().trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| invalid(e.to_string()))
}

/// Accept any JSON object as a result, except the service's `{"error": "..."}` reply.
pub fn parse_response(body: &[u8]) -> Result<Value, AnalysisError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        error!("Analysis response is not JSON: {}", e);
        AnalysisError::Body(e.to_string())
    })?;

    let Some(obj) = value.as_object() else {
        return Err(AnalysisError::Body("expected a JSON object".to_string()));
    };

    // The service answers its own failures with 200 and {"error": "..."};
    // these go down the same failure path as a transport error.
    if let Some(message) = obj.get("error").and_then(Value::as_str) {
        error!("Analysis service reported: {}", message);
        return Err(AnalysisError::Service(message.to_string()));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_upload_url_joins_once() {
        assert_eq!(
            upload_url("http://localhost:8000").unwrap().as_str(),
            "http://localhost:8000/upload"
        );
        assert_eq!(
            upload_url("https://api.example.com/").unwrap().as_str(),
            "https://api.example.com/upload"
        );
        assert_eq!(
            upload_url("https://example.com/finhealth/").unwrap().as_str(),
            "https://example.com/finhealth/upload"
        );
    }

    #[test]
    fn test_upload_url_rejects_bad_base() {
        assert!(upload_url("localhost:8000").is_err());
        assert!(upload_url("ftp://example.com").is_err());
        assert!(upload_url("not a url").is_err());
        assert!(upload_url("http://example.com?x=1").is_err());
    }

    #[test]
    fn test_parse_response_accepts_objects() {
        let value = parse_response(br#"{"revenue": 10}"#).unwrap();
        assert_eq!(value["revenue"], 10);

        let empty = parse_response(b"{}").unwrap();
        assert!(empty.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_parse_response_failures() {
        assert!(matches!(parse_response(b"<html>"), Err(AnalysisError::Body(_))));
        assert!(matches!(parse_response(b"[1,2]"), Err(AnalysisError::Body(_))));
        assert!(matches!(
            parse_response(br#"{"error": "Unsupported file format."}"#),
            Err(AnalysisError::Service(msg)) if msg == "Unsupported file format."
        ));
    }

    #[test]
    fn test_non_string_error_key_is_not_a_failure() {
        assert!(parse_response(br#"{"error": null, "revenue": 5}"#).is_ok());
    }

    #[test]
    fn test_upload_file_from_path() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"type,category,amount\nrevenue,sales,100\n").unwrap();

        let file = UploadFile::from_path(tmp.path()).unwrap();
        assert_eq!(file.len(), 39);
        assert!(!file.file_name.is_empty());
        assert!(UploadFile::from_path(Path::new("/definitely/not/here.csv")).is_err());
    }

    #[test]
    fn test_debug_hides_contents() {
        let file = UploadFile::new("q1.csv", vec![0u8; 4096]);
        let debug = format!("{:?}", file);
        assert!(debug.contains("q1.csv"));
        assert!(debug.contains("4096"));
    }
}
