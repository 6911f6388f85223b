use std::fmt;
use std::path::PathBuf;

use image::DynamicImage;
use ndarray::{s, Array3, ArrayView1, ArrayView2, ArrayView3, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{CubeError, Result};

// ---------------------------------------------------------------------------
// BandSample – the intensity type stored in the cube
// ---------------------------------------------------------------------------

/// An unsigned greyscale intensity a band image can be decoded into.
///
/// Colour sources are collapsed to luma on decode, so every band contributes
/// exactly one plane regardless of the file's channel layout.
pub trait BandSample: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Largest representable intensity.
    const MAX: f32;

    /// Decode a raster into a row-major single-channel buffer.
    fn luma_plane(image: DynamicImage) -> Vec<Self>;

    fn to_f64(self) -> f64;
}

impl BandSample for u8 {
    const MAX: f32 = u8::MAX as f32;

    fn luma_plane(image: DynamicImage) -> Vec<Self> {
        image.into_luma8().into_raw()
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl BandSample for u16 {
    const MAX: f32 = u16::MAX as f32;

    fn luma_plane(image: DynamicImage) -> Vec<Self> {
        image.into_luma16().into_raw()
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

// ---------------------------------------------------------------------------
// BandEntry – one source image and what we know about it
// ---------------------------------------------------------------------------

/// A single band source, as listed in a manifest or found in a directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandEntry {
    /// Image file holding the band.
    pub path: PathBuf,
    /// Acquisition wavelength, if known (unit is whatever the manifest uses).
    #[serde(default)]
    pub wavelength: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
}

impl BandEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BandEntry {
            path: path.into(),
            wavelength: None,
            label: None,
        }
    }
}

impl fmt::Display for BandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.label, self.wavelength) {
            (Some(label), _) => write!(f, "{label}"),
            (None, Some(wl)) => write!(f, "{wl:.1}"),
            (None, None) => write!(f, "{}", self.path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// SpectralCube – the assembled rows × columns × bands volume
// ---------------------------------------------------------------------------

/// A hyperspectral image: one greyscale plane per band, indexed `[row, col, band]`.
///
/// The cube is immutable once built; every accessor hands out read-only views.
#[derive(Debug, Clone)]
pub struct SpectralCube<T: BandSample = u8> {
    data: Array3<T>,
    bands: Vec<BandEntry>,
}

impl<T: BandSample> SpectralCube<T> {
    /// Wrap an already assembled volume. Bands get synthetic labels.
    pub fn from_array(data: Array3<T>) -> Result<Self> {
        let band_count = data.dim().2;
        if band_count == 0 {
            return Err(CubeError::Empty {
                path: PathBuf::new(),
            });
        }
        let bands = (0..band_count)
            .map(|b| BandEntry {
                path: PathBuf::new(),
                wavelength: None,
                label: Some(format!("band {b}")),
            })
            .collect();
        Ok(SpectralCube { data, bands })
    }

    /// Loader-internal constructor; `bands` must match the band axis.
    pub(crate) fn from_parts(data: Array3<T>, bands: Vec<BandEntry>) -> Self {
        debug_assert_eq!(data.dim().2, bands.len());
        SpectralCube { data, bands }
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn band_count(&self) -> usize {
        self.data.dim().2
    }

    /// `(height, width, band_count)`.
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Read-only view of the whole volume.
    pub fn data(&self) -> ArrayView3<'_, T> {
        self.data.view()
    }

    /// Band sources in band order.
    pub fn bands(&self) -> &[BandEntry] {
        &self.bands
    }

    /// The `height × width` plane of a single band.
    pub fn band(&self, band: usize) -> Result<ArrayView2<'_, T>> {
        if band >= self.band_count() {
            return Err(CubeError::InvalidBand {
                band,
                band_count: self.band_count(),
            });
        }
        Ok(self.data.index_axis(Axis(2), band))
    }

    /// All band samples of one pixel, or `None` outside the cube.
    pub fn spectrum(&self, row: usize, col: usize) -> Option<ArrayView1<'_, T>> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        Some(self.data.slice(s![row, col, ..]))
    }

    /// Spectral axis: wavelengths when every band has one, band indices otherwise.
    pub fn wavelengths(&self) -> Vec<f64> {
        spectral_axis(&self.bands)
    }
}

pub(crate) fn spectral_axis(bands: &[BandEntry]) -> Vec<f64> {
    let known: Option<Vec<f64>> = bands.iter().map(|b| b.wavelength).collect();
    known.unwrap_or_else(|| (0..bands.len()).map(|b| b as f64).collect())
}
