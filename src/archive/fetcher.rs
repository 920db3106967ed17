use crate::error::{ProcessingError, Result};
use crate::utils::constants::YEAR_PLACEHOLDER;
use crate::utils::filename::archive_file_name;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Source of yearly export archives.
///
/// `Ok(None)` signals that no archive is published for the year. Errors are
/// reported to the caller, which decides whether they are fatal.
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    async fn fetch(&self, year: i32) -> Result<Option<Vec<u8>>>;

    fn describe(&self, year: i32) -> String;
}

/// Downloads archives over HTTP from a `{year}` URL template.
pub struct HttpArchiveFetcher {
    client: Client,
    url_template: String,
}

impl HttpArchiveFetcher {
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url_template))
    }

    pub fn with_client(client: Client, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    pub fn url_for(&self, year: i32) -> String {
        self.url_template
            .replace(YEAR_PLACEHOLDER, &year.to_string())
    }
}

#[async_trait]
impl ArchiveFetcher for HttpArchiveFetcher {
    async fn fetch(&self, year: i32) -> Result<Option<Vec<u8>>> {
        let url = self.url_for(year);
        info!("Downloading archive for {} from {}", year, url);

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            debug!("No archive published for {}", year);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProcessingError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        info!("Downloaded {} bytes for {}", bytes.len(), year);
        Ok(Some(bytes.to_vec()))
    }

    fn describe(&self, year: i32) -> String {
        self.url_for(year)
    }
}

/// Reads `exports_{year}_M.zip` files from a local directory.
pub struct DirectoryArchiveFetcher {
    dir: PathBuf,
}

impl DirectoryArchiveFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, year: i32) -> PathBuf {
        self.dir.join(archive_file_name(year))
    }
}

#[async_trait]
impl ArchiveFetcher for DirectoryArchiveFetcher {
    async fn fetch(&self, year: i32) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(year);
        match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self, year: i32) -> String {
        self.path_for(year).display().to_string()
    }
}

/// Serves archives already held in memory, keyed by year.
#[derive(Default)]
pub struct StaticArchiveFetcher {
    archives: HashMap<i32, Vec<u8>>,
}

impl StaticArchiveFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_archive(mut self, year: i32, bytes: Vec<u8>) -> Self {
        self.archives.insert(year, bytes);
        self
    }
}

#[async_trait]
impl ArchiveFetcher for StaticArchiveFetcher {
    async fn fetch(&self, year: i32) -> Result<Option<Vec<u8>>> {
        Ok(self.archives.get(&year).cloned())
    }

    fn describe(&self, year: i32) -> String {
        format!("in-memory archive {}", year)
    }
}
