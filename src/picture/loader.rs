use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{FetchError, GlobeError};
use crate::picture::ColorField;

/// Where a dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Url(String),
    File(PathBuf),
}

impl DatasetSource {
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            DatasetSource::Url(source.to_string())
        } else {
            DatasetSource::File(PathBuf::from(source))
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Url(url) => write!(f, "{url}"),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load dataset text from a local file
pub async fn load_from_file(path: &Path) -> Result<String, FetchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FetchError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Download dataset text over HTTP
pub async fn download_dataset(url: &str) -> Result<String, FetchError> {
    log::info!("Downloading dataset from: {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response.text().await.map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })
}

/// Fetch and parse a dataset. Fails without partial results on any error.
pub async fn load_color_field(source: &DatasetSource) -> Result<ColorField, GlobeError> {
    let text = match source {
        DatasetSource::Url(url) => download_dataset(url).await?,
        DatasetSource::File(path) => load_from_file(path).await?,
    };

    let field = ColorField::parse(&text)?;
    log::info!(
        "Loaded dataset {}: {} samples in {} latitude rows",
        source,
        field.sample_count(),
        field.row_count()
    );
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sources_are_told_apart_by_scheme() {
        assert_eq!(
            DatasetSource::parse("https://example.com/a.csv"),
            DatasetSource::Url("https://example.com/a.csv".to_string())
        );
        assert_eq!(
            DatasetSource::parse("assets/pictures/compressed05_05.csv"),
            DatasetSource::File(PathBuf::from("assets/pictures/compressed05_05.csv"))
        );
    }

    #[tokio::test]
    async fn loads_field_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "0,0,1,0,0\n0,90,0,1,0\n45,0,0,0,1\n").unwrap();

        let source = DatasetSource::File(file.path().to_path_buf());
        let field = load_color_field(&source).await.unwrap();
        assert_eq!(field.sample_count(), 3);
        assert_eq!(field.color_at(2.0, 5.0), 0xFF0000);
    }

    #[tokio::test]
    async fn malformed_file_is_invalid_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1,2,3,4\n").unwrap();

        let source = DatasetSource::File(file.path().to_path_buf());
        let err = load_color_field(&source).await.unwrap_err();
        assert!(matches!(err, GlobeError::InvalidData(_)));
    }

    #[tokio::test]
    async fn missing_file_is_fetch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = DatasetSource::File(dir.path().join("nope.csv"));
        let err = load_color_field(&source).await.unwrap_err();
        assert!(matches!(err, GlobeError::FetchFailed(FetchError::Read { .. })));
    }
}
