use std::path::Path;

use crate::error::{FetchError, GlobeError};
use crate::picture::fetch::{self, FETCH_WORKERS};
use crate::picture::{ColorField, LookupMode, SNAPSHOT_SIZE, render_orthographic};

fn read_field(input: &Path) -> Result<ColorField, GlobeError> {
    let text = std::fs::read_to_string(input).map_err(|source| FetchError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    Ok(ColorField::parse(&text)?)
}

/// Write a copy of `input` without row-wise redundant samples.
pub fn compress_file(input: &Path, output: &Path) -> Result<(), GlobeError> {
    let field = read_field(input)?;
    let compressed = field.compressed();
    std::fs::write(output, compressed.to_csv())?;

    log::info!(
        "Compressed {} samples to {} ({} rows) into {}",
        field.sample_count(),
        compressed.sample_count(),
        compressed.row_count(),
        output.display()
    );
    Ok(())
}

/// Write an orthographic PNG of `input`.
pub fn render_file(input: &Path, output: &Path) -> Result<(), GlobeError> {
    let field = read_field(input)?;
    let img = render_orthographic(&field, LookupMode::Wrapped, SNAPSHOT_SIZE);
    img.save(output)?;

    log::info!("Rendered {} to {}", input.display(), output.display());
    Ok(())
}

/// Sample one pixel per grid point from `url` and write the dataset to `output`.
///
/// A failed request stops the sweep; whatever was fetched by then is still written.
pub async fn fetch_file(
    output: &Path,
    lat_step: f64,
    lon_step: f64,
    url: &str,
) -> Result<(), GlobeError> {
    let coords = fetch::grid(lat_step, lon_step);
    log::info!("Fetching {} pixels with {} workers", coords.len(), FETCH_WORKERS);

    let report = fetch::fetch_pixels(&reqwest::Client::new(), url, coords).await;
    if let Some(err) = &report.error {
        log::error!("Error fetching: {err}. Saving partial results.");
    }

    let samples = report.pixels.iter().map(|p| (p.lat, p.sample));
    let field = match (ColorField::from_samples(samples), report.error) {
        (Ok(field), _) => field,
        (Err(_), Some(err)) => return Err(err.into()),
        (Err(err), None) => return Err(err.into()),
    };
    std::fs::write(output, field.to_csv())?;

    log::info!("Wrote {} samples to {}", field.sample_count(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_writes_a_smaller_parseable_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(
            &input,
            "0,0,1,0,0\n0,10,1,0,0\n0,20,1,0,0\n0,30,0,1,0\n10,0,0,0,1\n",
        )
        .unwrap();

        compress_file(&input, &output).unwrap();

        let written = ColorField::parse(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written.sample_count(), 4);
        assert_eq!(written.row_count(), 2);
    }

    #[test]
    fn render_writes_a_snapshot_png() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.png");
        std::fs::write(&input, "45,90,1,0,0\n-45,90,0,0,1\n").unwrap();

        render_file(&input, &output).unwrap();

        let img = image::open(&output).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (SNAPSHOT_SIZE, SNAPSHOT_SIZE));
        assert_eq!(img.get_pixel(100, 40).0, [0xff, 0, 0, 0xff]);
        assert_eq!(img.get_pixel(100, 160).0, [0, 0, 0xff, 0xff]);
    }

    #[test]
    fn missing_input_is_a_fetch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = compress_file(&dir.path().join("nope.csv"), &dir.path().join("out.csv")).unwrap_err();
        assert!(matches!(err, GlobeError::FetchFailed(FetchError::Read { .. })));
    }

    #[test]
    fn malformed_input_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        std::fs::write(&input, "1,2,3\n").unwrap();
        let err = render_file(&input, &dir.path().join("out.png")).unwrap_err();
        assert!(matches!(err, GlobeError::InvalidData(_)));
    }

    #[tokio::test]
    async fn fetch_with_nothing_reachable_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("pixels.csv");
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/{{lat}},{{lon}}", listener.local_addr().unwrap());
        drop(listener);

        let err = fetch_file(&output, 90.0, 180.0, &url).await.unwrap_err();
        assert!(matches!(err, GlobeError::FetchFailed(FetchError::Transport { .. })));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn failed_fetch_still_writes_partial_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("pixels.csv");
        let url = fetch::tests::pixel_server(&["90.000000"]).await;

        fetch_file(&output, 45.0, 90.0, &url).await.unwrap();

        let written = ColorField::parse(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert!(written.sample_count() > 0);
        assert!(written.sample_count() < 25);
        assert!(written.latitudes().iter().all(|&lat| lat < 90.0));
    }
}
