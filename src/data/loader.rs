use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use image::{ImageError, ImageReader};
use ndarray::{Array3, ArrayView2, Axis};

use super::model::{BandEntry, BandSample, SpectralCube};
use crate::error::{CubeError, Result};

// ---------------------------------------------------------------------------
// Band ordering
// ---------------------------------------------------------------------------

/// How directory entries are turned into band order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BandOrder {
    /// Sort entries by path, so `band_002.png` precedes `band_010.png`.
    #[default]
    Lexicographic,
    /// Keep whatever order the OS lists the directory in. This differs
    /// between platforms and filesystems.
    Filesystem,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a cube from either a band directory or a band manifest file.
pub fn load<T: BandSample>(path: &Path) -> Result<SpectralCube<T>> {
    if path.is_dir() {
        load_dir(path)
    } else if path.is_file() {
        load_manifest(path)
    } else {
        Err(CubeError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Load every file in `dir` as one band, in lexicographic order.
pub fn load_dir<T: BandSample>(dir: &Path) -> Result<SpectralCube<T>> {
    load_dir_with(dir, BandOrder::default())
}

pub fn load_dir_with<T: BandSample>(dir: &Path, order: BandOrder) -> Result<SpectralCube<T>> {
    let entries = list_band_files(dir, order)?;
    if entries.is_empty() {
        return Err(CubeError::Empty {
            path: dir.to_path_buf(),
        });
    }
    load_bands(entries)
}

/// Load a manifest (`.json` or `.csv`) and then the bands it lists, in listed order.
pub fn load_manifest<T: BandSample>(path: &Path) -> Result<SpectralCube<T>> {
    let entries = read_manifest(path)?;
    if entries.is_empty() {
        return Err(CubeError::Empty {
            path: path.to_path_buf(),
        });
    }
    load_bands(entries)
}

/// Build a cube from an explicit, ordered list of band images.
///
/// Two passes: headers are read first so the volume is allocated once and a
/// size mismatch is caught before any pixel data is decoded; then each band is
/// decoded straight into its slice. On error no cube is produced.
pub fn load_bands<T: BandSample>(entries: Vec<BandEntry>) -> Result<SpectralCube<T>> {
    let Some(first) = entries.first() else {
        return Err(CubeError::Empty {
            path: PathBuf::new(),
        });
    };

    log::info!("Loading spectral cube from {} band images...", entries.len());

    let (height, width) = read_dimensions(&first.path)?;
    for entry in &entries[1..] {
        let (h, w) = read_dimensions(&entry.path)?;
        check_dimensions(&entry.path, (height, width), (h, w))?;
    }

    let mut data = Array3::<T>::default((height, width, entries.len()));
    for (b, entry) in entries.iter().enumerate() {
        let plane = decode_plane::<T>(&entry.path, (height, width))?;
        let view = ArrayView2::from_shape((height, width), &plane)?;
        data.index_axis_mut(Axis(2), b).assign(&view);
        log::debug!("Band {b} <- {}", entry.path.display());
    }

    log::info!(
        "Spectral cube loaded: {height}x{width} with {} bands",
        entries.len()
    );
    Ok(SpectralCube::from_parts(data, entries))
}

// ---------------------------------------------------------------------------
// Directory listing
// ---------------------------------------------------------------------------

/// List the band files of a directory. Sub-directories are skipped.
pub fn list_band_files(dir: &Path, order: BandOrder) -> Result<Vec<BandEntry>> {
    let listing = fs::read_dir(dir).map_err(|e| io_error(dir, e))?;

    let mut paths = Vec::new();
    for entry in listing {
        let path = entry.map_err(|e| io_error(dir, e))?.path();
        if path.is_dir() {
            log::debug!("Skipping sub-directory {}", path.display());
            continue;
        }
        paths.push(path);
    }

    match order {
        BandOrder::Lexicographic => paths.sort(),
        BandOrder::Filesystem => log::warn!(
            "Using filesystem order for bands in {}; band order is platform-dependent",
            dir.display()
        ),
    }

    Ok(paths.into_iter().map(BandEntry::new).collect())
}

// ---------------------------------------------------------------------------
// Manifests
// ---------------------------------------------------------------------------

/// Parse a band manifest. Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `[{ "path": "b0.tif", "wavelength": 450.0, "label": "blue" }, ...]`
/// * `.csv`  – header row `path,wavelength,label`; only `path` is required
///
/// Relative paths are resolved against the manifest's own directory.
pub fn read_manifest(path: &Path) -> Result<Vec<BandEntry>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut entries = match ext.as_str() {
        "json" => read_json_manifest(path)?,
        "csv" => read_csv_manifest(path)?,
        other => return Err(CubeError::UnsupportedManifest(other.to_string())),
    };

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for entry in &mut entries {
        if entry.path.is_relative() {
            entry.path = base.join(&entry.path);
        }
    }
    Ok(entries)
}

fn read_json_manifest(path: &Path) -> Result<Vec<BandEntry>> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&text).map_err(|source| CubeError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_csv_manifest(path: &Path) -> Result<Vec<BandEntry>> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    csv::Reader::from_reader(file)
        .deserialize()
        .collect::<std::result::Result<Vec<BandEntry>, csv::Error>>()
        .map_err(|source| CubeError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

// -- Raster helpers --

fn open_image(path: &Path) -> Result<ImageReader<BufReader<File>>> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(path, ImageError::IoError(e)))
}

/// `(height, width)` from the file header, without decoding pixels.
fn read_dimensions(path: &Path) -> Result<(usize, usize)> {
    let (w, h) = open_image(path)?
        .into_dimensions()
        .map_err(|e| decode_error(path, e))?;
    Ok((h as usize, w as usize))
}

fn decode_plane<T: BandSample>(path: &Path, expected: (usize, usize)) -> Result<Vec<T>> {
    let image = open_image(path)?
        .decode()
        .map_err(|e| decode_error(path, e))?;
    check_dimensions(
        path,
        expected,
        (image.height() as usize, image.width() as usize),
    )?;
    Ok(T::luma_plane(image))
}

fn check_dimensions(path: &Path, expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
    if expected == actual {
        return Ok(());
    }
    Err(CubeError::DimensionMismatch {
        path: path.to_path_buf(),
        expected_height: expected.0,
        expected_width: expected.1,
        actual_height: actual.0,
        actual_width: actual.1,
    })
}

fn decode_error(path: &Path, source: ImageError) -> CubeError {
    CubeError::Decode {
        path: path.to_path_buf(),
        source,
    }
}

fn io_error(path: &Path, source: io::Error) -> CubeError {
    if source.kind() == io::ErrorKind::NotFound {
        CubeError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        CubeError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
