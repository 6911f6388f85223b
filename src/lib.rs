//! # spectral-cube
//!
//! Stitches per-band greyscale images into a hyperspectral cube
//! (rows × columns × bands) and serves the sliding `s × s × bands`
//! neighbourhoods used for spatial-spectral feature extraction.
//!
//! ## Example
//!
//! ```rust,ignore
//! use spectral_cube::{load_dir, SpectralCube};
//!
//! let cube: SpectralCube = load_dir("scene/bands".as_ref())?;
//! let n = cube.window_count(11)?;
//! let first = cube.window(0, 11)?;
//! let sequence = first.to_sequence(); // (121, bands)
//! ```

pub mod color;
pub mod data;
pub mod error;
pub mod export;

pub use data::loader::{
    list_band_files, load, load_bands, load_dir, load_dir_with, load_manifest, read_manifest,
    BandOrder,
};
pub use data::model::{BandEntry, BandSample, SpectralCube};
pub use data::window::{Window, Windows};
pub use error::{CubeError, Result};
