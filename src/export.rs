use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, Int64Array, ListBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use ndarray::ArrayView1;
use parquet::arrow::ArrowWriter;

use crate::data::model::{BandSample, SpectralCube};
use crate::data::window::Window;
use crate::error::{CubeError, Result};

// ---------------------------------------------------------------------------
// Parquet export of pixel spectra
// ---------------------------------------------------------------------------

/// Schema written by every export:
/// - `x`: List<Float64> – spectral axis (wavelengths, or band indices)
/// - `y`: List<Float64> – pixel intensities, same length as `x`
/// - `row`, `col`: Int64 – pixel position in the cube
pub fn spectra_schema() -> Arc<Schema> {
    let item = || Arc::new(Field::new("item", DataType::Float64, true));
    Arc::new(Schema::new(vec![
        Field::new("x", DataType::List(item()), false),
        Field::new("y", DataType::List(item()), false),
        Field::new("row", DataType::Int64, false),
        Field::new("col", DataType::Int64, false),
    ]))
}

/// Write one row per pixel of `window`, with `x` taken from the cube the
/// window was cut from. Returns the number of rows written.
pub fn write_window<T: BandSample>(path: &Path, window: &Window<'_, T>) -> Result<usize> {
    let (row0, col0) = window.anchor();
    let size = window.size();
    let pixels = (0..size).flat_map(|r| (0..size).map(move |c| (r, c)));
    let rows = pixels.filter_map(|(r, c)| window.spectrum(r, c).map(|sp| (row0 + r, col0 + c, sp)));
    write_rows(path, &window.wavelengths(), rows)
}

/// Write one row per pixel of the whole cube, row-major.
pub fn write_cube<T: BandSample>(path: &Path, cube: &SpectralCube<T>) -> Result<usize> {
    let (height, width, _) = cube.dim();
    let rows = (0..height)
        .flat_map(|r| (0..width).map(move |c| (r, c)))
        .filter_map(|(r, c)| cube.spectrum(r, c).map(|sp| (r, c, sp)));
    write_rows(path, &cube.wavelengths(), rows)
}

fn write_rows<'a, T: BandSample>(
    path: &Path,
    x: &[f64],
    rows: impl Iterator<Item = (usize, usize, ArrayView1<'a, T>)>,
) -> Result<usize> {
    let mut x_builder = ListBuilder::new(Float64Builder::new());
    let mut y_builder = ListBuilder::new(Float64Builder::new());
    let mut row_ids: Vec<i64> = Vec::new();
    let mut col_ids: Vec<i64> = Vec::new();

    for (row, col, spectrum) in rows {
        x_builder.values().append_slice(x);
        x_builder.append(true);

        let values = y_builder.values();
        for &v in spectrum.iter() {
            values.append_value(v.to_f64());
        }
        y_builder.append(true);

        row_ids.push(row as i64);
        col_ids.push(col as i64);
    }

    let n_rows = row_ids.len();
    let schema = spectra_schema();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(x_builder.finish()),
        Arc::new(y_builder.finish()),
        Arc::new(Int64Array::from(row_ids)),
        Arc::new(Int64Array::from(col_ids)),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns)?;

    let file = File::create(path).map_err(|source| CubeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    log::info!("Wrote {n_rows} spectra to {}", path.display());
    Ok(n_rows)
}
