use std::sync::Arc;

use tokio::task::JoinSet;

use crate::error::FetchError;
use crate::picture::color_field::Sample;

/// Number of pixel requests kept in flight.
pub const FETCH_WORKERS: usize = 10;

/// Static map endpoint returning a single pixel centered on `{lat},{lon}`.
pub const DEFAULT_PIXEL_URL: &str = "http://maps.googleapis.com/maps/api/staticmap?center={lat},{lon}&zoom=1&size=1x1&maptype=roadmap&sensor=false";

/// One sampled grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchedPixel {
    pub lat: f64,
    pub sample: Sample,
}

/// Pixels gathered before the sweep finished or stopped.
#[derive(Debug)]
pub struct FetchReport {
    /// Grid order, latitude-major.
    pub pixels: Vec<FetchedPixel>,
    /// First failure; no further requests were started after it.
    pub error: Option<FetchError>,
}

/// Coordinates from -90 to 90 latitude and -180 to 180 longitude, both inclusive.
pub fn grid(lat_step: f64, lon_step: f64) -> Vec<(f64, f64)> {
    let lats = axis(-90.0, 90.0, lat_step);
    let lons = axis(-180.0, 180.0, lon_step);
    lats.iter()
        .flat_map(|&lat| lons.iter().map(move |&lon| (lat, lon)))
        .collect()
}

fn axis(start: f64, end: f64, step: f64) -> Vec<f64> {
    if !(step.is_finite() && step > 0.0) {
        return Vec::new();
    }
    let count = ((end - start) / step + 1e-9).floor() as usize;
    (0..=count).map(|i| start + i as f64 * step).collect()
}

pub fn pixel_url(template: &str, lat: f64, lon: f64) -> String {
    template
        .replace("{lat}", &format!("{lat:.6}"))
        .replace("{lon}", &format!("{lon:.6}"))
}

/// Decode a 1x1 image into a sample with channels in `0..=1`.
pub fn decode_pixel(url: &str, lat: f64, lon: f64, bytes: &[u8]) -> Result<Sample, FetchError> {
    let img = image::load_from_memory(bytes).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })?;

    if img.width() != 1 || img.height() != 1 {
        return Err(FetchError::Dimensions {
            lat,
            lon,
            width: img.width(),
            height: img.height(),
        });
    }

    let [r, g, b] = img.to_rgb16().get_pixel(0, 0).0;
    let channel = |c: u16| f64::from(c) / f64::from(u16::MAX);
    Ok(Sample {
        lon,
        r: channel(r),
        g: channel(g),
        b: channel(b),
    })
}

async fn fetch_pixel(
    client: reqwest::Client,
    template: Arc<str>,
    index: usize,
    lat: f64,
    lon: f64,
) -> Result<(usize, FetchedPixel), FetchError> {
    let url = pixel_url(&template, lat, lon);
    let transport = |source| FetchError::Transport {
        url: url.clone(),
        source,
    };

    let response = client.get(&url).send().await.map_err(transport)?;
    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.clone(),
            status: response.status(),
        });
    }
    let bytes = response.bytes().await.map_err(transport)?;

    let sample = decode_pixel(&url, lat, lon, &bytes)?;
    log::debug!("{lat:.6},{lon:.6}: {:.3} {:.3} {:.3}", sample.r, sample.g, sample.b);
    Ok((index, FetchedPixel { lat, sample }))
}

/// Request every coordinate with at most [`FETCH_WORKERS`] requests in flight.
///
/// The first failure stops new requests; requests already running are still collected.
pub async fn fetch_pixels(
    client: &reqwest::Client,
    template: &str,
    coords: Vec<(f64, f64)>,
) -> FetchReport {
    let template: Arc<str> = Arc::from(template);
    let mut pending = coords.into_iter().enumerate();
    let mut tasks = JoinSet::new();
    let mut fetched = Vec::new();
    let mut error = None;

    let mut spawn_next = |tasks: &mut JoinSet<Result<(usize, FetchedPixel), FetchError>>| {
        if let Some((index, (lat, lon))) = pending.next() {
            tasks.spawn(fetch_pixel(client.clone(), template.clone(), index, lat, lon));
        }
    };

    for _ in 0..FETCH_WORKERS {
        spawn_next(&mut tasks);
    }

    while let Some(joined) = tasks.join_next().await {
        match joined.map_err(FetchError::from).and_then(|result| result) {
            Ok(pixel) => {
                fetched.push(pixel);
                if error.is_none() {
                    spawn_next(&mut tasks);
                }
            }
            Err(err) => {
                log::warn!("Stopping fetch: {err}");
                error.get_or_insert(err);
            }
        }
    }

    fetched.sort_by_key(|&(index, _)| index);
    FetchReport {
        pixels: fetched.into_iter().map(|(_, pixel)| pixel).collect(),
        error,
    }
}
