use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

use textbehind::{
    Canvas, CommandSegmenter, CompositeResult, Compositor, EditorSession, EngineConfig,
    ExportSource, Exporter, FontLibrary, OutputEncoding, OutputFormat, PLATFORM_PRESETS,
    PlatformPreset, PrecomputedSegmenter, SegmentationFallback, Segmenter, TextLayer,
};

#[derive(Parser, Debug)]
#[command(name = "textbehind", version, about = "Put text behind the subject of a photo")]
struct Cli {
    /// Engine config JSON (all fields optional).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose one image file.
    Compose(ComposeArgs),
    /// Compose, then write one file per preset (or a direct export without presets).
    Export(ExportArgs),
    /// List the built-in platform presets.
    Presets(PresetsArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Source photograph.
    #[arg(long)]
    image: PathBuf,

    /// Text layers as a JSON array.
    #[arg(long)]
    layers: PathBuf,

    /// Precomputed foreground cutout (PNG with transparent background).
    #[arg(long, conflicts_with = "segment_cmd")]
    cutout: Option<PathBuf>,

    /// Program that reads the source on stdin and writes the cutout to stdout.
    #[arg(long)]
    segment_cmd: Option<String>,

    /// Extra argument for `--segment-cmd` (repeatable).
    #[arg(long = "segment-arg", allow_hyphen_values = true)]
    segment_args: Vec<String>,

    /// Compose without occlusion when segmentation fails instead of aborting.
    #[arg(long)]
    no_occlusion_fallback: bool,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Do not scan system font directories.
    #[arg(long)]
    no_system_fonts: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,

    /// JPEG quality 0-100 (defaults to the configured quality).
    #[arg(long)]
    quality: Option<u8>,
}

#[derive(Args, Debug)]
struct ComposeArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output file.
    #[arg(long)]
    out: PathBuf,

    /// Output width (defaults to the source width).
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Output height (defaults to the source height).
    #[arg(long, requires = "width")]
    height: Option<u32>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Preset id (repeatable); see `textbehind presets`.
    #[arg(long = "preset")]
    presets: Vec<String>,
}

#[derive(Args, Debug)]
struct PresetsArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    #[value(alias = "jpg")]
    Jpeg,
}

impl From<FormatChoice> for OutputFormat {
    fn from(v: FormatChoice) -> Self {
        match v {
            FormatChoice::Png => OutputFormat::Png,
            FormatChoice::Jpeg => OutputFormat::Jpeg,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default().with_env_overrides(),
    };
    textbehind::logging::init_logging(&cfg.logging);

    match cli.cmd {
        Command::Compose(args) => cmd_compose(cfg, args).await,
        Command::Export(args) => cmd_export(cfg, args).await,
        Command::Presets(args) => cmd_presets(args),
    }
}

async fn cmd_compose(cfg: EngineConfig, args: ComposeArgs) -> anyhow::Result<()> {
    let encoding = encoding_of(cfg.default_jpeg_quality, &args.scene);
    let (compositor, composite) = build_composite(cfg, &args.scene).await?;
    let canvas = match (args.width, args.height) {
        (Some(w), Some(h)) => Canvas::new(w, h),
        _ => Canvas::new(composite.width(), composite.height()),
    };
    let encoded = compositor.compose(&composite.inputs(), canvas, encoding)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &encoded.bytes)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    println!(
        "{} ({}x{}, {})",
        args.out.display(),
        encoded.width,
        encoded.height,
        encoded.format
    );
    Ok(())
}

async fn cmd_export(cfg: EngineConfig, args: ExportArgs) -> anyhow::Result<()> {
    let presets = args
        .presets
        .iter()
        .map(|id| {
            PlatformPreset::find(id)
                .copied()
                .with_context(|| format!("unknown preset '{id}' (see `textbehind presets`)"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let encoding = encoding_of(cfg.default_jpeg_quality, &args.scene);
    let (compositor, composite) = build_composite(cfg, &args.scene).await?;
    let exporter = Exporter::new(compositor);
    let source = ExportSource::Composite(&composite);

    let results = if presets.is_empty() {
        vec![("direct", exporter.export(source, None, encoding))]
    } else {
        exporter.export_presets(source, &presets, encoding)
    };

    let mut failed = 0usize;
    for (id, res) in results {
        match res {
            Ok(artifact) => {
                let path = artifact.write_to_dir(&args.out_dir)?;
                println!("{} ({}x{})", path.display(), artifact.width, artifact.height);
            }
            Err(e) => {
                failed += 1;
                eprintln!("{id}: {e}");
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} export(s) failed");
    }
    Ok(())
}

fn cmd_presets(args: PresetsArgs) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(PLATFORM_PRESETS)?);
        return Ok(());
    }
    for p in PLATFORM_PRESETS {
        println!(
            "{:<20} {:>4}x{:<4}  {}  ({})",
            p.id, p.width, p.height, p.name, p.description
        );
    }
    Ok(())
}

fn encoding_of(default_quality: u8, scene: &SceneArgs) -> OutputEncoding {
    OutputEncoding::new(scene.format.into(), scene.quality, default_quality)
}

async fn build_composite(
    mut cfg: EngineConfig,
    scene: &SceneArgs,
) -> anyhow::Result<(Arc<Compositor>, CompositeResult)> {
    cfg.fonts.font_dirs.extend(scene.font_dirs.iter().cloned());
    if scene.no_system_fonts {
        cfg.fonts.load_system_fonts = false;
    }
    if scene.no_occlusion_fallback {
        cfg.segmentation_fallback = SegmentationFallback::NoOcclusion;
    }

    let segmenter: Box<dyn Segmenter> = match (&scene.cutout, &scene.segment_cmd) {
        (Some(path), _) => Box::new(PrecomputedSegmenter::from_path(path)),
        (None, Some(cmd)) => Box::new(CommandSegmenter::new(cmd).args(&scene.segment_args)),
        (None, None) => anyhow::bail!("pass --cutout or --segment-cmd"),
    };

    let fonts = Arc::new(FontLibrary::new(&cfg.fonts));
    let compositor = Arc::new(Compositor::new(fonts, &cfg));
    let mut session = EditorSession::new(compositor.clone(), &cfg);
    session.load_image(read_file(&scene.image)?)?;
    session
        .import_layers(read_layers(&scene.layers)?)
        .with_context(|| format!("layers in '{}'", scene.layers.display()))?;

    let status = session.process(segmenter.as_ref()).await?;
    tracing::info!(?status, "processed");
    let composite = session
        .composite()
        .cloned()
        .context("processing produced no composite")?;
    Ok((compositor, composite))
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read '{}'", path.display()))
}

fn read_layers(path: &Path) -> anyhow::Result<Vec<TextLayer>> {
    let raw = read_file(path)?;
    serde_json::from_slice(&raw).with_context(|| format!("parse layers '{}'", path.display()))
}
