//! Reading and writing marketplace documents.
//!
//! Documents are read as YAML, which also accepts JSON. They are written as
//! pretty JSON when the path ends in `.json` and as YAML otherwise.

use std::fmt;
use std::path::{Path, PathBuf};

use mkt_client::PlatformError;
use mkt_model::{InputError, SerializedMarketplace};
use url::Url;

use crate::error::{Result, SeedError};

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Path(PathBuf),
    Url(Url),
}

impl DocumentSource {
    /// `http://` and `https://` inputs are URLs; anything else is a path.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let lowered = trimmed.to_ascii_lowercase();
        if (lowered.starts_with("http://") || lowered.starts_with("https://"))
            && let Ok(url) = Url::parse(trimmed)
        {
            return Self::Url(url);
        }
        Self::Path(PathBuf::from(trimmed))
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Loads and parses a document from a local path or an HTTP(S) URL.
pub async fn load_document(input: &str) -> Result<SerializedMarketplace> {
    let source = DocumentSource::parse(input);
    let contents = match &source {
        DocumentSource::Path(path) => read_local(path)?,
        DocumentSource::Url(url) => fetch(url).await?,
    };
    let document = parse_document(&source.to_string(), &contents)?;
    tracing::info!(
        source = %source,
        records = document.record_count(),
        "loaded document"
    );
    Ok(document)
}

pub fn parse_document(source_name: &str, contents: &str) -> Result<SerializedMarketplace> {
    serde_yaml::from_str(contents).map_err(|e| {
        InputError::MalformedDocument {
            source_name: source_name.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn read_local(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(InputError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    std::fs::read_to_string(path).map_err(|e| SeedError::io(path, e))
}

async fn fetch(url: &Url) -> Result<String> {
    let url_text = url.to_string();
    tracing::debug!(url = %url_text, "fetching document");
    let response = reqwest::get(url.clone())
        .await
        .map_err(|e| PlatformError::network("GET", &url_text, e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(PlatformError::status("GET", url_text, status.as_u16(), None, None).into());
    }
    response
        .text()
        .await
        .map_err(|e| PlatformError::network("GET", &url_text, e.to_string()).into())
}

/// Writes `document` as JSON or YAML depending on the file extension.
pub fn write_document(path: &Path, document: &SerializedMarketplace) -> Result<()> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let contents = if is_json {
        serde_json::to_string_pretty(document)
            .map(|text| text + "\n")
            .map_err(|e| e.to_string())
    } else {
        serde_yaml::to_string(document).map_err(|e| e.to_string())
    }
    .map_err(|message| SeedError::Serialize { message })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| SeedError::io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| SeedError::io(path, e))?;
    tracing::info!(path = %path.display(), records = document.record_count(), "wrote document");
    Ok(())
}
