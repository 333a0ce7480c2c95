use std::path::PathBuf;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::SourceResult;

/// Where the raw export comes from.
pub trait SourceProvider: Send + Sync {
    /// Human-readable location, used in logs and reports.
    fn location(&self) -> String;

    /// Fetch the complete export body.
    fn fetch(&self) -> SourceResult<Vec<u8>>;
}

/// Export published at an HTTP(S) URL.
pub struct HttpExport {
    url: String,
    client: Client,
}

impl HttpExport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }
}

impl SourceProvider for HttpExport {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> SourceResult<Vec<u8>> {
        let response = self.client.get(&self.url).send()?.error_for_status()?;
        let body = response.bytes()?;
        debug!(url = %self.url, bytes = body.len(), "fetched export");
        Ok(body.to_vec())
    }
}

/// Export stored in a local file.
pub struct FileExport {
    path: PathBuf,
}

impl FileExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SourceProvider for FileExport {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> SourceResult<Vec<u8>> {
        let body = std::fs::read(&self.path)?;
        debug!(path = %self.path.display(), bytes = body.len(), "read export");
        Ok(body)
    }
}

/// Export held in memory. Intended for tests and embedding.
pub struct InMemoryExport {
    body: Vec<u8>,
}

impl InMemoryExport {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self { body: body.into() }
    }
}

impl SourceProvider for InMemoryExport {
    fn location(&self) -> String {
        "memory".into()
    }

    fn fetch(&self) -> SourceResult<Vec<u8>> {
        Ok(self.body.clone())
    }
}

/// Pick a provider for `location`: URLs go over HTTP, anything else is a
/// file path.
pub fn provider_for(location: &str) -> Box<dyn SourceProvider> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpExport::new(location))
    } else {
        Box::new(FileExport::new(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn provider_selection() {
        assert_eq!(
            provider_for("https://shop.example/export.csv").location(),
            "https://shop.example/export.csv"
        );
        assert_eq!(provider_for("/tmp/export.csv").location(), "/tmp/export.csv");
    }

    #[test]
    fn file_export_reads_body() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Variation.number;VariationSalesPrice.price\n1;2.5\n")
            .unwrap();

        let provider = FileExport::new(file.path());
        let body = provider.fetch().unwrap();
        assert!(body.starts_with(b"Variation.number"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let provider = FileExport::new("/definitely/not/here.csv");
        assert!(matches!(
            provider.fetch(),
            Err(crate::error::SourceError::Io(_))
        ));
    }

    #[test]
    fn in_memory_export_returns_body() {
        let provider = InMemoryExport::new("a;b\n");
        assert_eq!(provider.fetch().unwrap(), b"a;b\n");
    }
}
