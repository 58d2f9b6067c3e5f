use crate::model::ScoreRecord;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "https://assessments.reliscore.com/api/cric-scores/";

/// Built-in dataset used when the server source is switched off.
pub const STATIC_RECORDS: [(&str, i64); 7] = [
    ("Pakistan", 231),
    ("Pakistan", 127),
    ("India", 31),
    ("India", 71),
    ("Australia", 31),
    ("India", 22),
    ("Pakistan", 81),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Static,
    Remote,
}

impl DataSource {
    pub fn from_remote_flag(use_remote: bool) -> Self {
        if use_remote {
            DataSource::Remote
        } else {
            DataSource::Static
        }
    }

    pub fn is_remote(self) -> bool {
        self == DataSource::Remote
    }

    pub fn toggled(self) -> Self {
        match self {
            DataSource::Static => DataSource::Remote,
            DataSource::Remote => DataSource::Static,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DataSource::Static => "built-in",
            DataSource::Remote => "server",
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed score data: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn static_records() -> Vec<ScoreRecord> {
    STATIC_RECORDS
        .iter()
        .map(|&(country, score)| ScoreRecord::new(country, score))
        .collect()
}

/// Parses a body of the form `[["Pakistan", 231], ["India", 31], ...]`.
pub fn parse_records(body: &str) -> Result<Vec<ScoreRecord>, LoadError> {
    Ok(serde_json::from_str(body)?)
}

pub struct DataClient {
    client: Client,
    url: String,
}

impl DataClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_records(&self) -> Result<Vec<ScoreRecord>, LoadError> {
        debug!(url = %self.url, "fetching scores");
        let resp = self.client.get(&self.url).send().await?.error_for_status()?;
        let body = resp.text().await?;
        let records = parse_records(&body)?;
        info!(url = %self.url, records = records.len(), "fetched scores");
        Ok(records)
    }

    pub async fn load(&self, source: DataSource) -> Result<Vec<ScoreRecord>, LoadError> {
        match source {
            DataSource::Static => Ok(static_records()),
            DataSource::Remote => self.fetch_records().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let resp = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            let _ = sock.shutdown().await;
        });
        format!("http://{}/api/cric-scores/", addr)
    }

    fn local_client(url: String) -> DataClient {
        let client = Client::builder().no_proxy().build().unwrap();
        DataClient::with_client(client, url)
    }

    #[test]
    fn test_static_records_match_builtin_dataset() {
        let records = static_records();
        assert_eq!(records.len(), 7);
        assert_eq!(records[0], ScoreRecord::new("Pakistan", 231));
        assert_eq!(records[4], ScoreRecord::new("Australia", 31));
        assert_eq!(records[6], ScoreRecord::new("Pakistan", 81));
    }

    #[test]
    fn test_parse_records() {
        let records = parse_records(r#"[["England", 12], ["England", 40], ["India", 9]]"#).unwrap();
        assert_eq!(
            records,
            vec![
                ScoreRecord::new("England", 12),
                ScoreRecord::new("England", 40),
                ScoreRecord::new("India", 9),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_records(r#"{"Pakistan": [231]}"#).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        assert!(matches!(parse_records("not json"), Err(LoadError::Parse(_))));
        assert!(matches!(parse_records(r#"[["India"]]"#), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_toggle_flips_source() {
        assert_eq!(DataSource::from_remote_flag(false), DataSource::Static);
        assert_eq!(DataSource::Static.toggled(), DataSource::Remote);
        assert_eq!(DataSource::Remote.toggled(), DataSource::Static);
    }

    #[tokio::test]
    async fn test_static_load_ignores_network() {
        let client = DataClient::new("http://127.0.0.1:1/unused");
        let first = client.load(DataSource::Static).await.unwrap();
        let second = client.load(DataSource::Static).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_remote_records() {
        let url = serve_once("200 OK", r#"[["Pakistan", 10], ["Kenya", 3]]"#).await;
        let records = local_client(url).load(DataSource::Remote).await.unwrap();
        assert_eq!(records, vec![ScoreRecord::new("Pakistan", 10), ScoreRecord::new("Kenya", 3)]);
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_parse_error() {
        let url = serve_once("200 OK", r#"{"error": "nope"}"#).await;
        let err = local_client(url).fetch_records().await.unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_http_error() {
        let url = serve_once("500 Internal Server Error", "[]").await;
        let err = local_client(url).fetch_records().await.unwrap_err();
        assert!(matches!(err, LoadError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_refused_connection_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = local_client(format!("http://{}/", addr)).fetch_records().await.unwrap_err();
        assert!(matches!(err, LoadError::Http(_)));
    }
}
