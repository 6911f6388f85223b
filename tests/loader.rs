use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use spectral_cube::{
    load, load_bands, load_dir, load_dir_with, load_manifest, BandEntry, BandOrder, CubeError,
    SpectralCube,
};

/// Write a band whose pixel (x, y) holds `base + y * width + x` (wrapping).
fn write_band(dir: &Path, name: &str, width: u32, height: u32, base: u8) -> PathBuf {
    let path = dir.join(name);
    let img = GrayImage::from_fn(width, height, |x, y| {
        Luma([base.wrapping_add((y * width + x) as u8)])
    });
    img.save(&path).expect("Failed to write band");
    path
}

#[test]
fn test_load_stacks_one_band_per_file() {
    let dir = tempfile::tempdir().unwrap();
    for (i, name) in ["b0.png", "b1.png", "b2.png", "b3.png"].iter().enumerate() {
        write_band(dir.path(), name, 6, 4, i as u8 * 50);
    }

    let cube: SpectralCube = load_dir(dir.path()).expect("Failed to load cube");

    assert_eq!(cube.dim(), (4, 6, 4));
    assert_eq!(cube.band_count(), 4);
    // pixel (row 2, col 3) = 2 * 6 + 3 = 15, offset per band
    assert_eq!(cube.spectrum(2, 3).unwrap().to_vec(), vec![15, 65, 115, 165]);
}

#[test]
fn test_lexicographic_order_assigns_bands_by_name() {
    let dir = tempfile::tempdir().unwrap();
    write_band(dir.path(), "band_10.png", 3, 3, 10);
    write_band(dir.path(), "band_02.png", 3, 3, 2);
    write_band(dir.path(), "band_01.png", 3, 3, 1);

    let cube: SpectralCube = load_dir_with(dir.path(), BandOrder::Lexicographic).unwrap();

    let names: Vec<_> = cube
        .bands()
        .iter()
        .map(|b| b.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["band_01.png", "band_02.png", "band_10.png"]);
    assert_eq!(cube.spectrum(0, 0).unwrap().to_vec(), vec![1, 2, 10]);
}

#[test]
fn test_filesystem_order_loads_every_band() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..3u8 {
        write_band(dir.path(), &format!("b{i}.png"), 4, 2, i);
    }

    let cube: SpectralCube = load_dir_with(dir.path(), BandOrder::Filesystem).unwrap();
    assert_eq!(cube.band_count(), 3);

    let mut first_pixels = cube.spectrum(0, 0).unwrap().to_vec();
    first_pixels.sort();
    assert_eq!(first_pixels, vec![0, 1, 2]);
}

#[test]
fn test_missing_directory_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_dir::<u8>(&dir.path().join("missing"));
    assert!(matches!(result, Err(CubeError::NotFound { .. })));

    let result = load::<u8>(&dir.path().join("missing"));
    assert!(matches!(result, Err(CubeError::NotFound { .. })));
}

#[test]
fn test_empty_directory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_dir::<u8>(dir.path());
    assert!(matches!(result, Err(CubeError::Empty { .. })));
}

#[test]
fn test_corrupt_band_fails_to_decode() {
    let dir = tempfile::tempdir().unwrap();
    write_band(dir.path(), "a.png", 4, 4, 0);
    fs::write(dir.path().join("b.png"), b"definitely not a png").unwrap();

    match load_dir::<u8>(dir.path()) {
        Err(CubeError::Decode { path, .. }) => assert!(path.ends_with("b.png")),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_mismatched_band_size_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_band(dir.path(), "a.png", 8, 5, 0);
    write_band(dir.path(), "b.png", 8, 5, 0);
    write_band(dir.path(), "c.png", 7, 5, 0);

    match load_dir::<u8>(dir.path()) {
        Err(CubeError::DimensionMismatch {
            path,
            expected_height,
            expected_width,
            actual_height,
            actual_width,
        }) => {
            assert!(path.ends_with("c.png"));
            assert_eq!((expected_height, expected_width), (5, 8));
            assert_eq!((actual_height, actual_width), (5, 7));
        }
        other => panic!("expected dimension mismatch, got {other:?}"),
    }
}

#[test]
fn test_colour_sources_collapse_to_one_band() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rgb.png");
    RgbImage::from_pixel(3, 2, Rgb([200, 200, 200]))
        .save(&path)
        .unwrap();

    let cube: SpectralCube = load_bands(vec![BandEntry::new(&path)]).unwrap();
    assert_eq!(cube.dim(), (2, 3, 1));
    assert_eq!(cube.spectrum(1, 2).unwrap()[0], 200);
}

#[test]
fn test_sixteen_bit_bands_keep_full_depth() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deep.png");
    let img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_fn(4, 3, |x, y| Luma([1000 * (y as u16) + x as u16 + 300]));
    img.save(&path).unwrap();

    let cube: SpectralCube<u16> = load_bands(vec![BandEntry::new(&path)]).unwrap();
    assert_eq!(cube.dim(), (3, 4, 1));
    assert_eq!(cube.spectrum(2, 3).unwrap()[0], 2303);
}

#[test]
fn test_manifest_controls_order_and_wavelengths() {
    let dir = tempfile::tempdir().unwrap();
    let bands = dir.path().join("bands");
    fs::create_dir(&bands).unwrap();
    write_band(&bands, "a.png", 5, 5, 10);
    write_band(&bands, "b.png", 5, 5, 20);

    let manifest = dir.path().join("scene.json");
    fs::write(
        &manifest,
        r#"[
            {"path": "bands/b.png", "wavelength": 650.0},
            {"path": "bands/a.png", "wavelength": 450.0}
        ]"#,
    )
    .unwrap();

    let cube: SpectralCube = load_manifest(&manifest).unwrap();
    assert_eq!(cube.spectrum(0, 0).unwrap().to_vec(), vec![20, 10]);
    assert_eq!(cube.wavelengths(), vec![650.0, 450.0]);

    // `load` dispatches on the path kind.
    let via_load: SpectralCube = load(&manifest).unwrap();
    assert_eq!(via_load.dim(), cube.dim());
    let via_dir: SpectralCube = load(&bands).unwrap();
    assert_eq!(via_dir.spectrum(0, 0).unwrap().to_vec(), vec![10, 20]);
}

#[test]
fn test_csv_manifest_and_empty_manifest() {
    let dir = tempfile::tempdir().unwrap();
    write_band(dir.path(), "x.png", 2, 2, 0);

    let csv = dir.path().join("bands.csv");
    fs::write(&csv, "path,label\nx.png,only\n").unwrap();
    let cube: SpectralCube = load_manifest(&csv).unwrap();
    assert_eq!(cube.bands()[0].label.as_deref(), Some("only"));

    let empty = dir.path().join("empty.json");
    fs::write(&empty, "[]").unwrap();
    assert!(matches!(
        load_manifest::<u8>(&empty),
        Err(CubeError::Empty { .. })
    ));
}

#[test]
fn test_scenario_twenty_by_twenty_three_bands() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..3u8 {
        write_band(dir.path(), &format!("band{i}.png"), 20, 20, i);
    }

    let cube: SpectralCube = load_dir(dir.path()).unwrap();
    assert_eq!(cube.dim(), (20, 20, 3));
    assert_eq!(cube.window_count(11).unwrap(), 81);

    let first = cube.window(0, 11).unwrap();
    assert_eq!(first.anchor(), (0, 0));
    assert_eq!(first.dim(), (11, 11, 3));

    let last = cube.window(80, 11).unwrap();
    assert_eq!(last.anchor(), (8, 8));
    assert_eq!(last.dim(), (11, 11, 3));
    let expected = cube.spectrum(18, 18).unwrap();
    assert_eq!(last.spectrum(10, 10).unwrap(), expected);
}
