//! Runs one half-resolution downsample over an image file.
//!
//! Writes `downsampled.png` and `meta.json` into `--out`. Settings come from
//! an optional JSON config file; command-line flags override it.
//!
//!   cargo run -p hr-cli --bin hr_downsample -- --input photo.png --out out
//!   RUST_LOG=debug cargo run -p hr-cli --bin hr_downsample -- --input photo.png --blend bilinear

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use halfres::{
    AddressMode, BlendStrategy, DispatchReport, DownsampleConfig, DownsampleKernel, Execution,
    ExtentPolicy, Image, Rgba,
};
use image::RgbaImage;
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "hr_downsample")]
#[command(about = "Downsample an image to half resolution with a 2x2 kernel")]
struct Cli {
    /// Input image (any format the `image` crate can decode).
    #[arg(long)]
    input: PathBuf,

    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// JSON file with a `DownsampleConfig`; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    address: Option<AddressArg>,

    /// Border color as `r,g,b,a`. Implies `--address border`.
    #[arg(long, value_parser = parse_rgba)]
    border_color: Option<Rgba>,

    #[arg(long, value_enum)]
    blend: Option<BlendArg>,

    #[arg(long, value_enum)]
    extent: Option<ExtentArg>,

    /// Run thread groups on the calling thread.
    #[arg(long, default_value_t = false)]
    serial: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum AddressArg {
    Clamp,
    Wrap,
    Border,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum BlendArg {
    Box,
    Bilinear,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ExtentArg {
    Floor,
    Ceil,
}

#[derive(Debug, Clone, Serialize)]
struct Meta {
    input: String,
    output: Option<String>,
    config: DownsampleConfig,
    report: DispatchReport,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run(&Cli::parse())?;
    Ok(())
}

fn run(cli: &Cli) -> Result<Meta> {
    let cfg = resolve_config(cli)?;
    let kernel = DownsampleKernel::new(cfg).context("building downsample kernel")?;

    ensure_file_exists(&cli.input, "input")?;
    let src = load_input_rgba(&cli.input)?;
    info!(
        "loaded {} ({}x{})",
        cli.input.display(),
        src.width(),
        src.height()
    );

    let (dst_w, dst_h) = kernel.destination_extent(src.width(), src.height());
    let mut dst = Image::new_fill(dst_w, dst_h, Rgba::TRANSPARENT);
    let report = kernel
        .dispatch(&src.as_view(), &mut dst.as_view_mut())
        .context("dispatching downsample kernel")?;
    info!(
        "{}x{} -> {}x{} with {} invocations in {} groups",
        report.src.0,
        report.src.1,
        report.dst.0,
        report.dst.1,
        report.invocations,
        report.grid.group_count()
    );

    fs::create_dir_all(&cli.out)
        .with_context(|| format!("creating output directory {}", cli.out.display()))?;

    let output = if dst.is_empty() {
        warn!("destination is empty; no image written");
        None
    } else {
        let path = cli.out.join("downsampled.png");
        save_rgba8(&path, &dst)?;
        info!("wrote {}", path.display());
        Some(path.display().to_string())
    };

    let meta = Meta {
        input: cli.input.display().to_string(),
        output,
        config: kernel.config().clone(),
        report,
    };
    write_json(cli.out.join("meta.json"), &meta)?;
    Ok(meta)
}

fn resolve_config(cli: &Cli) -> Result<DownsampleConfig> {
    let mut cfg = match &cli.config {
        Some(path) => {
            ensure_file_exists(path, "config")?;
            read_json::<DownsampleConfig>(path)?
        }
        None => DownsampleConfig::default(),
    };

    match (cli.address, cli.border_color) {
        (Some(AddressArg::Clamp), Some(_)) | (Some(AddressArg::Wrap), Some(_)) => {
            bail!("--border-color requires --address border");
        }
        (Some(AddressArg::Clamp), None) => cfg.address = AddressMode::Clamp,
        (Some(AddressArg::Wrap), None) => cfg.address = AddressMode::Wrap,
        (Some(AddressArg::Border), color) | (None, color @ Some(_)) => {
            let color = color.or(match cfg.address {
                AddressMode::Border(c) => Some(c),
                _ => None,
            });
            cfg.address = AddressMode::Border(color.unwrap_or(Rgba::TRANSPARENT));
        }
        (None, None) => {}
    }

    if let Some(blend) = cli.blend {
        cfg.blend = match blend {
            BlendArg::Box => BlendStrategy::Box,
            BlendArg::Bilinear => BlendStrategy::Bilinear,
        };
    }
    if let Some(extent) = cli.extent {
        cfg.extent = match extent {
            ExtentArg::Floor => ExtentPolicy::Floor,
            ExtentArg::Ceil => ExtentPolicy::Ceil,
        };
    }
    if cli.serial {
        cfg.execution = Execution::Serial;
    }

    Ok(cfg)
}

fn parse_rgba(s: &str) -> Result<Rgba, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid color component: {e}"))?;
    let channels: [f32; 4] = parts
        .try_into()
        .map_err(|p: Vec<f32>| format!("expected 4 components r,g,b,a, got {}", p.len()))?;
    Ok(Rgba::from_array(channels))
}

fn load_input_rgba(path: &Path) -> Result<Image<Rgba>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let rgba = dyn_img.to_rgba32f();
    let (w, h) = rgba.dimensions();
    let data = rgba
        .into_raw()
        .chunks_exact(4)
        .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
        .collect();

    Image::from_vec(w as usize, h as usize, data)
        .with_context(|| format!("constructing image from {}", path.display()))
}

fn save_rgba8(path: &Path, img: &Image<Rgba>) -> Result<()> {
    let bytes = img
        .data()
        .iter()
        .flat_map(|c| c.to_array())
        .map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect();
    let out = RgbaImage::from_raw(img.width() as u32, img.height() as u32, bytes)
        .context("constructing RgbaImage from raw bytes")?;
    out.save(path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use halfres::{AddressMode, BlendStrategy, Execution, ExtentPolicy, Rgba};
    use image::RgbaImage;

    use super::{Cli, parse_rgba, resolve_config, run};

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["hr_downsample", "--input", "in.png"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn parse_rgba_accepts_four_components() {
        assert_eq!(parse_rgba("1, 0.5,0,1"), Ok(Rgba::new(1.0, 0.5, 0.0, 1.0)));
        assert!(parse_rgba("1,0,0").is_err());
        assert!(parse_rgba("1,0,x,1").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = resolve_config(&cli(&[
            "--address", "wrap", "--blend", "bilinear", "--extent", "ceil", "--serial",
        ]))
        .expect("valid config");

        assert_eq!(cfg.address, AddressMode::Wrap);
        assert_eq!(cfg.blend, BlendStrategy::Bilinear);
        assert_eq!(cfg.extent, ExtentPolicy::Ceil);
        assert_eq!(cfg.execution, Execution::Serial);
    }

    #[test]
    fn border_color_implies_border_address() {
        let cfg = resolve_config(&cli(&["--border-color", "0,0,1,1"])).expect("valid config");
        assert_eq!(cfg.address, AddressMode::Border(Rgba::new(0.0, 0.0, 1.0, 1.0)));

        let cfg = resolve_config(&cli(&["--address", "border"])).expect("valid config");
        assert_eq!(cfg.address, AddressMode::Border(Rgba::TRANSPARENT));
    }

    #[test]
    fn border_color_with_clamp_is_an_error() {
        assert!(resolve_config(&cli(&["--address", "clamp", "--border-color", "0,0,0,1"])).is_err());
    }

    #[test]
    fn pipeline_writes_half_size_png_and_meta() {
        let dir = std::env::temp_dir().join(format!("hr_downsample_run_{}", std::process::id()));
        let out = dir.join("out");
        fs::create_dir_all(&dir).expect("create temp dir");

        let input = dir.join("in.png");
        RgbaImage::from_fn(4, 4, |x, y| image::Rgba([(x * 60) as u8, (y * 60) as u8, 0, 255]))
            .save(&input)
            .expect("write input png");

        let cli = Cli::try_parse_from([
            "hr_downsample",
            "--input",
            input.to_str().expect("utf-8 path"),
            "--out",
            out.to_str().expect("utf-8 path"),
        ])
        .expect("valid arguments");
        let meta = run(&cli).expect("pipeline succeeds");
        assert_eq!(meta.report.invocations, 4);

        let written = image::open(out.join("downsampled.png")).expect("read output png");
        assert_eq!((written.width(), written.height()), (2, 2));
        // Top-left 2x2 block averages (0, 60) on both axes.
        assert_eq!(written.to_rgba8().get_pixel(0, 0).0, [30, 30, 0, 255]);

        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(out.join("meta.json")).expect("read meta.json"))
                .expect("parse meta.json");
        assert_eq!(json["report"]["invocations"], 4);
        assert_eq!(json["report"]["dst"], serde_json::json!([2, 2]));

        fs::remove_dir_all(&dir).expect("remove temp dir");
    }
}
