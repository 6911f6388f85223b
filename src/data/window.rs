use ndarray::{s, Array2, Array3, ArrayView1, ArrayView2, ArrayView3, Axis};

use super::model::{spectral_axis, BandEntry, BandSample, SpectralCube};
use crate::error::{CubeError, Result};

// ---------------------------------------------------------------------------
// Window – an s × s × bands neighbourhood
// ---------------------------------------------------------------------------

/// A square neighbourhood of the cube spanning every band.
///
/// Borrows the cube read-only; call [`Window::to_owned`] for an independent copy.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a, T: BandSample> {
    view: ArrayView3<'a, T>,
    bands: &'a [BandEntry],
    row: usize,
    col: usize,
}

impl<'a, T: BandSample> Window<'a, T> {
    /// Top-left `(row, col)` of the window in cube coordinates.
    pub fn anchor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Side length `s`.
    pub fn size(&self) -> usize {
        self.view.dim().0
    }

    pub fn band_count(&self) -> usize {
        self.view.dim().2
    }

    /// `(s, s, band_count)`.
    pub fn dim(&self) -> (usize, usize, usize) {
        self.view.dim()
    }

    pub fn view(&self) -> ArrayView3<'a, T> {
        self.view
    }

    /// Band sources of the cube this window was cut from.
    pub fn bands(&self) -> &'a [BandEntry] {
        self.bands
    }

    /// Spectral axis of the source cube, see [`SpectralCube::wavelengths`].
    pub fn wavelengths(&self) -> Vec<f64> {
        spectral_axis(self.bands)
    }

    pub fn band(&self, band: usize) -> Option<ArrayView2<'a, T>> {
        (band < self.band_count()).then(|| self.view.index_axis_move(Axis(2), band))
    }

    /// Pixel spectrum at window-relative `(row, col)`.
    pub fn spectrum(&self, row: usize, col: usize) -> Option<ArrayView1<'a, T>> {
        let size = self.size();
        (row < size && col < size).then(|| self.view.slice_move(s![row, col, ..]))
    }

    pub fn to_owned(&self) -> Array3<T> {
        self.view.to_owned()
    }

    /// Flatten into the `(s², bands)` pixel sequence a recurrent feature
    /// extractor consumes: pixels in row-major order, intensities scaled to `[0, 1]`.
    pub fn to_sequence(&self) -> Array2<f32> {
        let (size, _, bands) = self.view.dim();
        Array2::from_shape_fn((size * size, bands), |(p, b)| {
            self.view[[p / size, p % size, b]].to_f64() as f32 / T::MAX
        })
    }
}

// ---------------------------------------------------------------------------
// Window queries on the cube
// ---------------------------------------------------------------------------

impl<T: BandSample> SpectralCube<T> {
    /// Width of the anchor grid, `width - size`. Shared precondition of every
    /// window query: the window must be strictly smaller than both axes.
    fn anchor_grid_width(&self, size: usize) -> Result<usize> {
        if size >= self.height() || size >= self.width() {
            return Err(CubeError::InvalidWindowSize {
                size,
                height: self.height(),
                width: self.width(),
            });
        }
        Ok(self.width() - size)
    }

    /// Number of window anchors: `(height - size) * (width - size)`.
    ///
    /// `size == 0` counts every pixel of a band plane.
    pub fn window_count(&self, size: usize) -> Result<usize> {
        let grid_width = self.anchor_grid_width(size)?;
        Ok((self.height() - size) * grid_width)
    }

    /// The `size × size × bands` window for a row-major linear anchor index.
    ///
    /// `index` is unravelled over a grid `width - size` anchors wide. Only the
    /// slice bounds are checked, not `index < window_count(size)`.
    pub fn window(&self, index: usize, size: usize) -> Result<Window<'_, T>> {
        let grid_width = self.anchor_grid_width(size)?;
        let row = index / grid_width;
        let col = index % grid_width;

        if row > self.height() - size || col > self.width() - size {
            return Err(CubeError::InvalidIndex {
                index,
                row,
                col,
                size,
                height: self.height(),
                width: self.width(),
            });
        }

        let view = self
            .data()
            .slice_move(s![row..row + size, col..col + size, ..]);
        Ok(Window {
            view,
            bands: self.bands(),
            row,
            col,
        })
    }

    /// Every window of the given size, in linear index order.
    pub fn windows(&self, size: usize) -> Result<Windows<'_, T>> {
        let count = self.window_count(size)?;
        Ok(Windows {
            cube: self,
            size,
            next: 0,
            count,
        })
    }
}

/// Iterator returned by [`SpectralCube::windows`].
#[derive(Debug, Clone)]
pub struct Windows<'a, T: BandSample> {
    cube: &'a SpectralCube<T>,
    size: usize,
    next: usize,
    count: usize,
}

impl<'a, T: BandSample> Iterator for Windows<'a, T> {
    type Item = Window<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let window = self.cube.window(self.next, self.size).ok()?;
        self.next += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl<T: BandSample> ExactSizeIterator for Windows<'_, T> {}
