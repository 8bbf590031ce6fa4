use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

/// Result of loading a page source.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub html: String,
    pub url: String,
    pub status: u16,
    pub content_type: String,
}

/// Error while loading a page source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{0} does not name a local file")]
    NotLocal(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load a page from an `http(s)` URL, a `file://` URL or a local path
/// (blocking).
pub fn fetch_page(source: &str) -> Result<FetchResult, FetchError> {
    if is_remote(source) {
        return fetch_url(source);
    }
    if source.starts_with("file://") {
        let url = Url::parse(source).map_err(|e| FetchError::InvalidUrl {
            input: source.to_string(),
            source: e,
        })?;
        let path = url
            .to_file_path()
            .map_err(|_| FetchError::NotLocal(source.to_string()))?;
        return read_file(&path);
    }
    read_file(Path::new(source))
}

fn read_file(path: &Path) -> Result<FetchResult, FetchError> {
    let html = std::fs::read_to_string(path).map_err(|e| FetchError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let url = Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("file://{}", absolute.display()));
    log::debug!("read {} bytes from {}", html.len(), path.display());
    Ok(FetchResult {
        html,
        url,
        status: 200,
        content_type: "text/html".into(),
    })
}

/// Fetch a URL and return the HTML content (blocking).
pub fn fetch_url(url_str: &str) -> Result<FetchResult, FetchError> {
    let parsed = Url::parse(url_str).map_err(|e| FetchError::InvalidUrl {
        input: url_str.to_string(),
        source: e,
    })?;

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("cyber-portfolio/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(15))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;

    let response = client
        .get(parsed.as_str())
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .send()?;

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: final_url,
            status,
        });
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    let html = response.text()?;
    log::debug!("fetched {} ({} bytes, {})", final_url, html.len(), content_type);

    Ok(FetchResult {
        html,
        url: final_url,
        status,
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let err = fetch_page("definitely/not/here/index.html").unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
        assert!(err.to_string().contains("index.html"));
    }

    #[test]
    fn malformed_url_is_rejected_before_any_request() {
        let err = fetch_url("http://[::1").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn reads_local_file() {
        let dir = std::env::temp_dir().join(format!("cyber-portfolio-fetch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("index.html");
        std::fs::write(&path, "<html><body><p>hi</p></body></html>").unwrap();

        let res = fetch_page(path.to_str().unwrap()).unwrap();
        assert!(res.html.contains("<p>hi</p>"));
        assert!(res.url.starts_with("file://"));
        assert_eq!(res.status, 200);

        let again = fetch_page(&res.url).unwrap();
        assert_eq!(again.html, res.html);
        std::fs::remove_dir_all(&dir).ok();
    }
}
