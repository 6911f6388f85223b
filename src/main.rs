//! Load a spectral cube and report how many windows it yields.
//!
//! Usage:
//!   spectral-cube <DIR|MANIFEST> [OPTIONS]
//!
//! Options:
//!   --window <s>        Window size (default 11)
//!   --depth <8|16>      Sample depth to decode bands into (default 8)
//!   --fs-order          Use filesystem listing order instead of sorted names
//!   --export <file>     Write the spectra of window `--index` to Parquet
//!   --index <idx>       Linear window index for --export (default 0)
//!   --preview <file>    Render band `--band` as a false-colour PNG
//!   --band <b>          Band for --preview (default 0)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use spectral_cube::{color, export, load, load_dir_with, BandOrder, BandSample, SpectralCube};

const USAGE: &str = "usage: spectral-cube <DIR|MANIFEST> [--window s] [--depth 8|16] [--fs-order] \
                     [--export file.parquet --index idx] [--preview file.png --band b]";

/// Default neighbourhood size for spatial-spectral features.
const DEFAULT_WINDOW: usize = 11;

#[derive(Debug)]
struct Args {
    source: PathBuf,
    window: usize,
    depth: u8,
    order: BandOrder,
    export: Option<PathBuf>,
    index: usize,
    preview: Option<PathBuf>,
    band: usize,
}

fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut source = None;
    let mut args = Args {
        source: PathBuf::new(),
        window: DEFAULT_WINDOW,
        depth: 8,
        order: BandOrder::Lexicographic,
        export: None,
        index: 0,
        preview: None,
        band: 0,
    };

    while let Some(arg) = argv.next() {
        let mut value = |flag: &str| argv.next().with_context(|| format!("{flag} expects a value"));
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--window" => args.window = value("--window")?.parse().context("--window")?,
            "--depth" => args.depth = value("--depth")?.parse().context("--depth")?,
            "--fs-order" => args.order = BandOrder::Filesystem,
            "--export" => args.export = Some(value("--export")?.into()),
            "--index" => args.index = value("--index")?.parse().context("--index")?,
            "--preview" => args.preview = Some(value("--preview")?.into()),
            "--band" => args.band = value("--band")?.parse().context("--band")?,
            flag if flag.starts_with("--") => bail!("Unknown option {flag}\n{USAGE}"),
            path => {
                if source.replace(PathBuf::from(path)).is_some() {
                    bail!("Only one band source may be given\n{USAGE}");
                }
            }
        }
    }

    if !matches!(args.depth, 8 | 16) {
        bail!("--depth must be 8 or 16, got {}", args.depth);
    }
    args.source = source.with_context(|| format!("Missing band source\n{USAGE}"))?;
    Ok(Some(args))
}

fn run<T: BandSample>(args: &Args) -> Result<()> {
    let loaded = if args.source.is_dir() {
        load_dir_with::<T>(&args.source, args.order)
    } else {
        load::<T>(&args.source)
    };
    let cube: SpectralCube<T> = loaded
        .with_context(|| format!("loading spectral cube from {}", args.source.display()))?;

    log::info!(
        "Cube {}x{} with {} bands: {}",
        cube.height(),
        cube.width(),
        cube.band_count(),
        cube.bands()
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let count = cube.window_count(args.window)?;
    println!("{count}");

    if let Some(out) = &args.export {
        let window = cube.window(args.index, args.window)?;
        export::write_window(out, &window)
            .with_context(|| format!("exporting window {} to {}", args.index, out.display()))?;
    }

    if let Some(out) = &args.preview {
        color::render_band(&cube, args.band)?
            .save(out)
            .with_context(|| format!("writing preview {}", out.display()))?;
        log::info!("Wrote band {} preview to {}", args.band, out.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    match args.depth {
        16 => run::<u16>(&args),
        _ => run::<u8>(&args),
    }
}
