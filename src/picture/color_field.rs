use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// How a (lat, lon) query is resolved against the stored samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// Nearest latitude row, then the first sample in that row, red channel only.
    /// Matches the web viewer the datasets were originally compressed for.
    Legacy,
    /// Nearest latitude row, then nearest longitude within it.
    #[default]
    Nearest,
    /// Nearest sample overall, with latitude and longitude distances wrapping around.
    Wrapped,
}

/// One stored sample within a latitude row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub lon: f64,
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Sample {
    pub fn same_color(&self, other: &Sample) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }
}

/// Sampled surface colors grouped by latitude.
///
/// Latitudes keep the order in which they were first seen, and every latitude owns a
/// non-empty row of samples in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorField {
    latitudes: Vec<f64>,
    rows: Vec<Vec<Sample>>,
}

impl ColorField {
    /// Parse newline-delimited `lat,lon,r,g,b` rows. The first empty line ends the data.
    pub fn parse(text: &str) -> Result<Self, DataError> {
        let mut field = ColorField {
            latitudes: Vec::new(),
            rows: Vec::new(),
        };

        for (index, line) in text.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                break;
            }

            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 5 {
                return Err(DataError::InvalidFieldCount {
                    line: index + 1,
                    count: fields.len(),
                });
            }

            let mut values = [0.0f64; 5];
            for (i, raw) in fields.iter().enumerate() {
                values[i] = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|source| DataError::InvalidNumber {
                        line: index + 1,
                        field: i + 1,
                        value: raw.to_string(),
                        source,
                    })?;
            }

            let [lat, lon, r, g, b] = values;
            field.push(lat, Sample { lon, r, g, b });
        }

        if field.latitudes.is_empty() {
            return Err(DataError::Empty);
        }
        Ok(field)
    }

    /// Group `(lat, sample)` pairs into rows, keeping their order.
    pub fn from_samples<I>(samples: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (f64, Sample)>,
    {
        let mut field = ColorField {
            latitudes: Vec::new(),
            rows: Vec::new(),
        };
        for (lat, sample) in samples {
            field.push(lat, sample);
        }
        if field.latitudes.is_empty() {
            return Err(DataError::Empty);
        }
        Ok(field)
    }

    fn push(&mut self, lat: f64, sample: Sample) {
        match self.latitudes.iter().position(|&l| l == lat) {
            Some(idx) => self.rows[idx].push(sample),
            None => {
                self.latitudes.push(lat);
                self.rows.push(vec![sample]);
            }
        }
    }

    #[cfg(test)]
    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    #[cfg(test)]
    pub fn row(&self, lat: f64) -> Option<&[Sample]> {
        self.latitudes
            .iter()
            .position(|&l| l == lat)
            .map(|idx| self.rows[idx].as_slice())
    }

    /// Total number of samples.
    pub fn sample_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Color at the given coordinates in degrees, using the default lookup.
    #[cfg(test)]
    pub fn color_at(&self, lat: f64, lon: f64) -> u32 {
        self.color_at_with(LookupMode::default(), lat, lon)
    }

    /// Color at the given coordinates in degrees, packed as `0xRRGGBB`.
    pub fn color_at_with(&self, mode: LookupMode, lat: f64, lon: f64) -> u32 {
        match mode {
            LookupMode::Legacy => {
                let sample = self.legacy_sample(lat, lon);
                pack_rgb(sample.r, sample.r, sample.r)
            }
            LookupMode::Nearest => {
                let sample = self.nearest_in_row(lat, lon);
                pack_rgb(sample.r, sample.g, sample.b)
            }
            LookupMode::Wrapped => {
                let sample = self.nearest_wrapped(lat, lon);
                pack_rgb(sample.r, sample.g, sample.b)
            }
        }
    }

    fn nearest_row(&self, lat: f64) -> &[Sample] {
        let mut best = 0;
        for (i, &candidate) in self.latitudes.iter().enumerate() {
            if (candidate - lat).abs() < (self.latitudes[best] - lat).abs() {
                best = i;
            }
        }
        &self.rows[best]
    }

    fn nearest_in_row(&self, lat: f64, lon: f64) -> &Sample {
        let row = self.nearest_row(lat);
        let mut best = &row[0];
        for sample in &row[1..] {
            if (sample.lon - lon).abs() < (best.lon - lon).abs() {
                best = sample;
            }
        }
        best
    }

    fn legacy_sample(&self, lat: f64, lon: f64) -> &Sample {
        let row = self.nearest_row(lat);
        let mut best_lon = 0.0;
        let mut best = &row[0];
        for (i, sample) in row.iter().enumerate() {
            if i == 0 || (sample.lon - lon).abs() < (best_lon - lon).abs() {
                // Records the query rather than the candidate, so nothing after the
                // first sample can ever compare closer.
                best_lon = lon;
                best = sample;
            }
        }
        best
    }

    fn nearest_wrapped(&self, lat: f64, lon: f64) -> &Sample {
        let mut best: Option<(&Sample, f64)> = None;
        for (&row_lat, row) in self.latitudes.iter().zip(&self.rows) {
            for sample in row {
                let dist = lat_lon_distance(row_lat, sample.lon, lat, lon);
                if best.is_none_or(|(_, d)| dist < d) {
                    best = Some((sample, dist));
                }
            }
        }
        // Construction guarantees at least one sample.
        best.map(|(s, _)| s).unwrap_or(&self.rows[0][0])
    }

    /// Sorted copy with redundant row-wise samples removed.
    ///
    /// Only valid for latitude-then-longitude lookups: a sample is dropped when both of
    /// its longitude neighbours carry exactly the same color.
    pub fn compressed(&self) -> ColorField {
        let mut order: Vec<usize> = (0..self.latitudes.len()).collect();
        order.sort_by(|&a, &b| self.latitudes[a].total_cmp(&self.latitudes[b]));

        let mut latitudes = Vec::with_capacity(order.len());
        let mut rows = Vec::with_capacity(order.len());
        for idx in order {
            let mut row = self.rows[idx].clone();
            row.sort_by(|a, b| a.lon.total_cmp(&b.lon));

            let mut kept: Vec<Sample> = Vec::with_capacity(row.len());
            for (i, sample) in row.iter().enumerate() {
                let interior = i > 0 && i + 1 < row.len();
                if interior
                    && kept.last().is_some_and(|prev| prev.same_color(sample))
                    && row[i + 1].same_color(sample)
                {
                    continue;
                }
                kept.push(*sample);
            }

            latitudes.push(self.latitudes[idx]);
            rows.push(kept);
        }

        ColorField { latitudes, rows }
    }

    /// Serialize back to dataset text, one row per sample.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for (lat, row) in self.latitudes.iter().zip(&self.rows) {
            for s in row {
                out.push_str(&format!("{},{},{},{},{}\n", lat, s.lon, s.r, s.g, s.b));
            }
        }
        out
    }
}

/// Distance between two coordinates in degrees, wrapping at the poles and antimeridian.
pub fn lat_lon_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat_dist = (lat1 - lat2)
        .abs()
        .min((180.0 + lat1 - lat2).abs())
        .min((180.0 + lat2 - lat1).abs());
    let lon_dist = (lon1 - lon2)
        .abs()
        .min((360.0 + lon1 - lon2).abs())
        .min((360.0 + lon2 - lon1).abs());
    (lat_dist * lat_dist + lon_dist * lon_dist).sqrt()
}

fn channel(fraction: f64) -> u32 {
    (fraction * 255.0).round().clamp(0.0, 255.0) as u32
}

pub fn pack_rgb(r: f64, g: f64, b: f64) -> u32 {
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

pub fn unpack_rgb(packed: u32) -> [u8; 3] {
    [
        ((packed >> 16) & 0xff) as u8,
        ((packed >> 8) & 0xff) as u8,
        (packed & 0xff) as u8,
    ]
}
