use image::{Rgba, RgbaImage};

use crate::picture::{ColorField, LookupMode, unpack_rgb};

pub const SNAPSHOT_SIZE: u32 = 200;

/// Orthographic view of the dataset, north up, looking at the hemisphere around
/// longitude 90. Pixels off the disc are left transparent.
pub fn render_orthographic(field: &ColorField, mode: LookupMode, size: u32) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);
    let half = size as f64 / 2.0;

    for image_y in 0..size {
        let raw_y = 1.0 - image_y as f64 / half;
        let lat = raw_y.asin().to_degrees();
        for image_x in 0..size {
            let raw_x = image_x as f64 / half - 1.0;
            let lon = (raw_x / lat.to_radians().cos()).acos().to_degrees();
            if lon.is_nan() {
                continue;
            }
            let [r, g, b] = unpack_rgb(field.color_at_with(mode, lat, lon));
            img.put_pixel(image_x, image_y, Rgba([r, g, b, 0xff]));
        }
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disc_is_painted_and_corners_stay_clear() {
        let field = ColorField::parse("0,0,0,0,1\n").unwrap();
        let img = render_orthographic(&field, LookupMode::Nearest, 20);

        assert_eq!(img.get_pixel(10, 10), &Rgba([0, 0, 0xff, 0xff]));
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(19, 19)[3], 0);
    }

    #[test]
    fn north_is_up() {
        let field = ColorField::parse("80,90,1,0,0\n-80,90,0,1,0\n").unwrap();
        let img = render_orthographic(&field, LookupMode::Nearest, 40);

        assert_eq!(img.get_pixel(20, 1), &Rgba([0xff, 0, 0, 0xff]));
        assert_eq!(img.get_pixel(20, 39), &Rgba([0, 0xff, 0, 0xff]));
    }
}
