use clap::{ArgAction, Parser, Subcommand};
use image_conv::config::{self, AppConfig};
use image_conv::imaging::{ImageBackend, OutputFormat, RustBackend, media_type_of};
use image_conv::output::{self, ResizeReport};
use image_conv::session::{Download, Event, FileSelection, Session, Step};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info};

#[derive(Parser)]
#[command(name = "image-conv")]
#[command(about = "Resize and convert images")]
#[command(long_about = "\
Resize and convert images

Load an image, choose a size (directly or from a preset) and an output
format, and write the converted file as conv-<width>x<height>.<ext>.

Formats:
  jpeg      quality 92, backdrop under transparent areas
  png       lossless
  webp      lossy, quality 80
  original  same format as the input (png if unknown)

With the aspect lock on, giving only --width or only --height derives the
other from the source proportions. Giving both uses both as-is.

Run 'image-conv gen-config' to generate a documented image-conv.toml.")]
#[command(version)]
struct Cli {
    /// Config file (optional; stock defaults apply when missing)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ResizeArgs {
    /// Image to convert
    input: PathBuf,

    /// Target width in pixels
    #[arg(long)]
    width: Option<String>,

    /// Target height in pixels
    #[arg(long)]
    height: Option<String>,

    /// Start from a configured preset size
    #[arg(long)]
    preset: Option<String>,

    /// Output format: jpeg, png, webp, original
    #[arg(long, default_value_t = OutputFormat::Original)]
    format: OutputFormat,

    /// Do not derive the other dimension from the source aspect ratio
    #[arg(long)]
    no_keep_aspect: bool,

    /// Directory to write the result to (overrides config)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Resize and convert one image
    Resize(ResizeArgs),
    /// Show name, size, resolution and type of an image
    Info {
        /// Image to inspect
        input: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List configured size presets
    Presets,
    /// Print a stock image-conv.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let app_config = config::load_config(&cli.config)?;
    debug!(path = %cli.config.display(), presets = app_config.presets.len(), "config loaded");
    let backend = RustBackend::new();

    match cli.command {
        Command::Resize(args) => run_resize(&app_config, &backend, args)?,
        Command::Info { input, json } => {
            let session = load(Session::new(app_config.render_settings()), &backend, &input)?;
            if let Some(info) = session.file_info() {
                if json {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    output::print_file_info(&info);
                }
            }
        }
        Command::Presets => output::print_presets(&app_config.presets, None),
        Command::GenConfig => {}
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Feed one event to the session, turning an error notice into a CLI error.
fn apply(
    session: Session,
    backend: &impl ImageBackend,
    event: Event,
) -> Result<(Session, Option<Download>), Box<dyn Error>> {
    let Step {
        session,
        notice,
        download,
    } = session.handle(event, backend);
    if let Some(notice) = notice {
        if notice.is_error() {
            return Err(notice.message.into());
        }
        info!("{}", output::format_notice(&notice));
    }
    Ok((session, download))
}

/// Select, read and decode `path` into the session.
fn load(session: Session, backend: &impl ImageBackend, path: &Path) -> Result<Session, Box<dyn Error>> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bytes = std::fs::read(path)?;
    let media_type = media_type_of(&bytes);

    let (session, _) = apply(
        session,
        backend,
        Event::FileSelected(FileSelection::new(&name, media_type, bytes.len() as u64)),
    )?;
    let generation = session.load_generation();
    let pixels = backend.decode(&bytes);
    let (session, _) = apply(session, backend, Event::Decoded { generation, pixels })?;
    Ok(session)
}

fn run_resize(
    app_config: &AppConfig,
    backend: &impl ImageBackend,
    args: ResizeArgs,
) -> Result<(), Box<dyn Error>> {
    let mut session = load(Session::new(app_config.render_settings()), backend, &args.input)?;

    let mut events = Vec::new();
    if let Some(name) = &args.preset {
        let preset = app_config
            .find_preset(name)
            .ok_or_else(|| format!("Unknown preset: {name}"))?;
        events.push(Event::PresetChosen(preset.clone()));
    }
    let both_given = args.width.is_some() && args.height.is_some();
    events.push(Event::AspectLockToggled(!args.no_keep_aspect && !both_given));
    events.extend(args.width.map(Event::WidthEdited));
    events.extend(args.height.map(Event::HeightEdited));
    events.push(Event::FormatChosen(args.format));
    events.push(Event::Resize);
    events.push(Event::Download);

    let mut saved = None;
    for event in events {
        let (next, download) = apply(session, backend, event)?;
        session = next;
        saved = saved.or(download);
    }
    let download = saved.ok_or("Resize produced no output")?;

    let dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&app_config.output.directory));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(&download.filename);
    std::fs::write(&path, &download.bytes)?;
    info!(path = %path.display(), bytes = download.bytes.len(), "output written");

    let (Some(info), Some(artifact)) = (session.file_info(), session.artifact()) else {
        return Err("Resize produced no output".into());
    };
    let report = ResizeReport::new(
        info,
        &path,
        download.mime,
        artifact.width,
        artifact.height,
        download.bytes.len() as u64,
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_resize_report(&report);
    }
    Ok(())
}
