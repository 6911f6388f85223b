use ndarray::{s, Array3};
use spectral_cube::{CubeError, SpectralCube};

fn gradient_cube(height: usize, width: usize, bands: usize) -> SpectralCube {
    let data = Array3::from_shape_fn((height, width, bands), |(r, c, b)| {
        ((r * width + c) * bands + b) as u8
    });
    SpectralCube::from_array(data).expect("Failed to build cube")
}

#[test]
fn test_window_count_formula_for_every_valid_size() {
    let cube = gradient_cube(9, 14, 2);
    for size in 0..9 {
        assert_eq!(cube.window_count(size).unwrap(), (9 - size) * (14 - size));
    }
    assert!(matches!(
        cube.window_count(9),
        Err(CubeError::InvalidWindowSize { .. })
    ));
}

#[test]
fn test_windows_iterate_in_linear_index_order() {
    let cube = gradient_cube(7, 8, 3);
    let size = 3;
    let windows = cube.windows(size).unwrap();
    assert_eq!(windows.len(), 20);

    for (idx, window) in windows.enumerate() {
        let direct = cube.window(idx, size).unwrap();
        assert_eq!(window.anchor(), direct.anchor());
        let (row, col) = window.anchor();
        assert_eq!(
            window.view(),
            cube.data().slice(s![row..row + size, col..col + size, ..])
        );
    }
}

#[test]
fn test_sequence_shape_for_feature_extraction() {
    let cube = gradient_cube(15, 15, 5);
    let window = cube.window(17, 11).unwrap();
    let seq = window.to_sequence();

    assert_eq!(seq.dim(), (121, 5));
    assert!(seq.iter().all(|&v| (0.0..=1.0).contains(&v)));
    // First sequence entry is the window's top-left pixel spectrum.
    let (row, col) = window.anchor();
    let top_left: Vec<f32> = cube
        .spectrum(row, col)
        .unwrap()
        .iter()
        .map(|&v| v as f32 / 255.0)
        .collect();
    assert_eq!(seq.row(0).to_vec(), top_left);
}

#[test]
fn test_concurrent_readers_share_the_cube() {
    let cube = gradient_cube(12, 12, 4);
    let size = 5;
    let total = cube.window_count(size).unwrap();

    let sums: Vec<u64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cube = &cube;
                scope.spawn(move || {
                    (t..total)
                        .step_by(4)
                        .map(|idx| {
                            let w = cube.window(idx, size).unwrap();
                            w.view().iter().map(|&v| v as u64).sum::<u64>()
                        })
                        .sum::<u64>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let sequential: u64 = cube
        .windows(size)
        .unwrap()
        .map(|w| w.view().iter().map(|&v| v as u64).sum::<u64>())
        .sum();
    assert_eq!(sums.iter().sum::<u64>(), sequential);
}
