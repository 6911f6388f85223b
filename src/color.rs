use image::{Rgb, RgbImage};
use ndarray::ArrayView2;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{BandSample, SpectralCube};
use crate::error::Result;

/// Number of distinct colours a rendered band is quantised to.
const RAMP_STEPS: usize = 256;

// ---------------------------------------------------------------------------
// Colour ramp generator
// ---------------------------------------------------------------------------

/// `n` colours sweeping the hue circle from blue (low) to red (high).
pub fn heat_ramp(n: usize) -> Vec<Rgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    let last = (n - 1).max(1) as f32;
    (0..n)
        .map(|i| {
            let hue = 240.0 * (1.0 - i as f32 / last);
            let hsl = Hsl::new(hue, 0.85, 0.5);
            let rgb: Srgb = hsl.into_color();
            Rgb([
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            ])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Quicklook rendering
// ---------------------------------------------------------------------------

/// Render one band as a false-colour image, min-max stretched over the band.
pub fn render_band<T: BandSample>(cube: &SpectralCube<T>, band: usize) -> Result<RgbImage> {
    let plane = cube.band(band)?;
    let (lo, hi) = min_max(&plane);
    let ramp = heat_ramp(RAMP_STEPS);
    let (height, width) = plane.dim();

    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let t = stretch(plane[[y as usize, x as usize]].to_f64(), lo, hi);
        ramp[(t * (RAMP_STEPS - 1) as f64).round() as usize]
    }))
}

/// Map three bands onto the red, green and blue channels, each stretched
/// independently.
pub fn composite<T: BandSample>(cube: &SpectralCube<T>, bands: [usize; 3]) -> Result<RgbImage> {
    let planes = [cube.band(bands[0])?, cube.band(bands[1])?, cube.band(bands[2])?];
    let ranges: Vec<(f64, f64)> = planes.iter().map(|p| min_max(p)).collect();
    let (height, width) = planes[0].dim();

    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        Rgb(std::array::from_fn(|ch| {
            let (lo, hi) = ranges[ch];
            let v = planes[ch][[y as usize, x as usize]].to_f64();
            (stretch(v, lo, hi) * 255.0).round() as u8
        }))
    }))
}

fn min_max<T: BandSample>(plane: &ArrayView2<'_, T>) -> (f64, f64) {
    plane
        .iter()
        .map(|v| v.to_f64())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

/// Flat planes map to 0.
fn stretch(v: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
