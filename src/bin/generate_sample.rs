//! Write a synthetic hyperspectral scene: one greyscale PNG per band under
//! `OUT_DIR/bands/`, plus `OUT_DIR/manifest.json` listing the bands with their
//! wavelengths.
//!
//! Usage:
//!   generate_sample [OUT_DIR] [--bands n] [--size px] [--depth 8|16]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::{GrayImage, ImageBuffer, Luma};
use spectral_cube::BandEntry;

/// First and last simulated wavelength, in nanometres.
const WAVELENGTH_RANGE: (f64, f64) = (400.0, 1000.0);

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Reflectance of a material at `wavelength`, roughly in `[0, 1]`.
fn reflectance(peaks: &[(f64, f64, f64)], wavelength: f64) -> f64 {
    0.05 + peaks
        .iter()
        .map(|&(mu, sigma, amp)| gaussian(wavelength, mu, sigma, amp))
        .sum::<f64>()
}

/// Sensor noise source: splitmix64 feeding a Box-Muller transform.
struct NoiseGen(u64);

impl NoiseGen {
    fn next_unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    fn normal(&mut self, std_dev: f64) -> f64 {
        let u1 = self.next_unit().max(f64::MIN_POSITIVE);
        let u2 = self.next_unit();
        std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

struct Options {
    out_dir: PathBuf,
    bands: usize,
    size: u32,
    depth: u8,
}

fn parse_args() -> Result<Options> {
    let mut opts = Options {
        out_dir: PathBuf::from("sample_cube"),
        bands: 16,
        size: 64,
        depth: 8,
    };
    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--bands" => opts.bands = argv.next().context("--bands expects a value")?.parse()?,
            "--size" => opts.size = argv.next().context("--size expects a value")?.parse()?,
            "--depth" => opts.depth = argv.next().context("--depth expects a value")?.parse()?,
            flag if flag.starts_with("--") => bail!("Unknown option {flag}"),
            dir => opts.out_dir = PathBuf::from(dir),
        }
    }
    if opts.bands == 0 || opts.size == 0 {
        bail!("--bands and --size must be positive");
    }
    if !matches!(opts.depth, 8 | 16) {
        bail!("--depth must be 8 or 16");
    }
    Ok(opts)
}

/// Material index for a pixel: three vertical strips with a disc on top.
fn material_at(x: u32, y: u32, size: u32) -> usize {
    let c = size as f64 / 2.0;
    let (dx, dy) = (x as f64 - c, y as f64 - c);
    if (dx * dx + dy * dy).sqrt() < size as f64 / 6.0 {
        return 3;
    }
    (x * 3 / size) as usize
}

fn write_band(path: &Path, depth: u8, size: u32, sample: impl Fn(u32, u32) -> f64) -> Result<()> {
    if depth == 16 {
        let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(size, size, |x, y| {
            Luma([(sample(x, y) * u16::MAX as f64).clamp(0.0, u16::MAX as f64) as u16])
        });
        img.save(path)?;
    } else {
        let img = GrayImage::from_fn(size, size, |x, y| {
            Luma([(sample(x, y) * 255.0).clamp(0.0, 255.0) as u8])
        });
        img.save(path)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let opts = parse_args()?;
    let mut noise_gen = NoiseGen(42);

    let materials: [Vec<(f64, f64, f64)>; 4] = [
        // vegetation-like: green bump, red edge
        vec![(550.0, 30.0, 0.15), (850.0, 120.0, 0.6)],
        // soil-like: slow rise
        vec![(900.0, 300.0, 0.45)],
        // water-like: dark, blue peak
        vec![(450.0, 40.0, 0.2)],
        // painted target
        vec![(620.0, 25.0, 0.8), (480.0, 20.0, 0.3)],
    ];

    let band_dir = opts.out_dir.join("bands");
    fs::create_dir_all(&band_dir)
        .with_context(|| format!("creating {}", band_dir.display()))?;

    let (wl_lo, wl_hi) = WAVELENGTH_RANGE;
    let step = if opts.bands > 1 {
        (wl_hi - wl_lo) / (opts.bands - 1) as f64
    } else {
        0.0
    };

    let mut manifest = Vec::with_capacity(opts.bands);
    for b in 0..opts.bands {
        let wavelength = wl_lo + b as f64 * step;
        let name = format!("band_{b:03}.png");

        let noise: Vec<f64> = (0..opts.size * opts.size)
            .map(|_| noise_gen.normal(0.01))
            .collect();
        log::debug!("Band {b}: {wavelength:.1} nm");
        write_band(&band_dir.join(&name), opts.depth, opts.size, |x, y| {
            let m = material_at(x, y, opts.size);
            reflectance(&materials[m], wavelength) + noise[(y * opts.size + x) as usize]
        })
        .with_context(|| format!("writing {name}"))?;

        manifest.push(BandEntry {
            path: Path::new("bands").join(&name),
            wavelength: Some(wavelength),
            label: Some(format!("{wavelength:.0} nm")),
        });
    }

    let manifest_path = opts.out_dir.join("manifest.json");
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("writing {}", manifest_path.display()))?;

    println!(
        "Wrote {} bands ({}x{} px, {}-bit) to {}",
        opts.bands,
        opts.size,
        opts.size,
        opts.depth,
        manifest_path.display()
    );
    Ok(())
}
