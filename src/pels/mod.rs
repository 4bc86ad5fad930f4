//! Bitmap decoding for training inputs: one grayscale intensity per
//! picture element, normalized to [0, 1], in row-major order from the
//! top-left. Pel files are the flat numeric text form of the same data.

use std::{fs, path::Path};

use image::DynamicImage;

use crate::prelude::*;

/// Decodes the image at `path` into normalized intensities.
pub fn load_intensities<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let img = image::open(path).map_err(|e| Error::LoadErr(e.to_string()))?;
    Ok(intensities(&img))
}

/// One finite intensity per pixel, luma-converted and scaled by 1/255.
pub fn intensities(img: &DynamicImage) -> Vec<f64> {
    img.to_luma8()
        .pixels()
        .map(|p| p.0[0] as f64 / 255.0)
        .collect()
}

/// Writes intensities as flat numeric text, one value per line.
pub fn write_pel_file<P: AsRef<Path>>(path: P, values: &[f64]) -> Result<()> {
    let mut text = String::new();
    for v in values {
        text.push_str(&v.to_string());
        text.push('\n');
    }
    fs::write(path, text).map_err(|e| Error::LoadErr(e.to_string()))
}

/// Reads a flat numeric text file back into an intensity vector.
pub fn read_pel_file<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path).map_err(|e| Error::LoadErr(e.to_string()))?;
    text.split_whitespace()
        .map(|token| {
            token
                .parse()
                .map_err(|_| Error::ParseErr(format!("bad number {token:?}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    fn gradient_image() -> DynamicImage {
        // 3x2, top row dark to bright, bottom row uniform
        let raw = vec![0u8, 128, 255, 51, 51, 51];
        DynamicImage::ImageLuma8(GrayImage::from_raw(3, 2, raw).unwrap())
    }

    #[test]
    fn intensities_are_normalized_row_major() {
        let values = intensities(&gradient_image());

        assert_eq!(values.len(), 6);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[2], 1.0);
        assert_eq!(values[3], 51.0 / 255.0);
        assert!(values.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
    }

    #[test]
    fn pel_file_round_trips() {
        let path = std::env::temp_dir().join("gradnet_pels_round_trip.txt");
        let values = intensities(&gradient_image());

        write_pel_file(&path, &values).unwrap();
        let restored = read_pel_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(values, restored);
    }

    #[test]
    fn read_pel_file_rejects_garbage() {
        let path = std::env::temp_dir().join("gradnet_pels_garbage.txt");
        fs::write(&path, "0.5 oops 1.0").unwrap();

        let err = read_pel_file(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(err, Err(Error::ParseErr(_))));
    }

    #[test]
    fn load_surfaces_missing_image() {
        assert!(matches!(
            load_intensities("no-such-image.bmp"),
            Err(Error::LoadErr(_))
        ));
    }
}
