use std::{io, num::ParseFloatError, path::PathBuf};

use thiserror::Error;

/// The dataset text could not be turned into a color field.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid field count: {count} on line {line}")]
    InvalidFieldCount { line: usize, count: usize },

    #[error("invalid number {value:?} in field {field} on line {line}")]
    InvalidNumber {
        line: usize,
        field: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("dataset contains no samples")]
    Empty,
}

/// The dataset could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to make request: HTTP {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to download from {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode pixel from {url}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("coords {lat:.6},{lon:.6}: unexpected dimensions: {width}x{height}")]
    Dimensions {
        lat: f64,
        lon: f64,
        width: u32,
        height: u32,
    },

    #[error("fetch worker failed")]
    Worker(#[from] tokio::task::JoinError),

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum GlobeError {
    #[error("invalid data")]
    InvalidData(#[from] DataError),

    #[error("fetch failed")]
    FetchFailed(#[from] FetchError),

    #[error("{0}")]
    Usage(String),

    #[error("io error")]
    Io(#[from] io::Error),

    #[error("image error")]
    Image(#[from] image::ImageError),

    #[error("wgpu::CreateSurfaceError")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("wgpu::RequestAdapterError")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("wgpu::RequestDeviceError")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("winit::error::EventLoopError")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("winit::error::OsError")]
    Window(#[from] winit::error::OsError),
}

impl GlobeError {
    pub fn usage(msg: impl Into<String>) -> Self {
        GlobeError::Usage(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn invalid_data_keeps_its_cause() {
        let err: GlobeError = DataError::InvalidFieldCount { line: 1, count: 4 }.into();
        assert!(matches!(err, GlobeError::InvalidData(_)));
        let source = err.source().expect("data error is the source");
        assert_eq!(source.to_string(), "invalid field count: 4 on line 1");
    }

    #[test]
    fn fetch_read_error_names_the_path() {
        let err = FetchError::Read {
            path: PathBuf::from("missing.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "failed to read missing.csv");
    }
}
