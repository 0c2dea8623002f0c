use merloc::ExtractOptions;
use merloc::raster::{RasterOptions, render_with_positions};
use merloc_source::{InkImageType, InkOptions, RepoContext, ink_url, sanitize_node_labels};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Extract(merloc::Error),
    Raster(merloc::raster::RasterError),
    Source(merloc_source::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Extract(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Source(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<merloc::Error> for CliError {
    fn from(value: merloc::Error) -> Self {
        Self::Extract(value)
    }
}

impl From<merloc::raster::RasterError> for CliError {
    fn from(value: merloc::raster::RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<merloc_source::Error> for CliError {
    fn from(value: merloc_source::Error) -> Self {
        Self::Source(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Positions,
    Raster,
    Sanitize,
    InkUrl,
    Context,
}

#[derive(Debug)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    width: Option<u32>,
    height: Option<u32>,
    config: Option<String>,
    background: Option<String>,
    no_background: bool,
    image_type: InkImageType,
    out: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::Positions,
            input: None,
            pretty: false,
            width: None,
            height: None,
            config: None,
            background: None,
            no_background: false,
            image_type: InkImageType::Png,
            out: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContextOut<'a> {
    file_tree: &'a str,
    readme: &'a str,
    estimated_tokens: usize,
}

fn usage() -> &'static str {
    "merloc-cli\n\
\n\
USAGE:\n\
  merloc-cli [positions] [--width <px>] [--height <px>] [--config <file.json>] [--pretty] [<svg>|-]\n\
  merloc-cli raster [--width <px>] [--height <px>] [--config <file.json>] [--background <css-color>] [--out <path>] [--pretty] [<svg>|-]\n\
  merloc-cli sanitize [<mmd>|-]\n\
  merloc-cli ink-url [--type png|svg|webp|jpeg] [--background <color> | --no-background] [<mmd>|-]\n\
  merloc-cli context [--pretty] <dir>\n\
\n\
NOTES:\n\
  - If <svg>/<mmd> is omitted or '-', input is read from stdin.\n\
  - Output size defaults to 1920x1080; --config reads {\"width\": .., \"height\": ..} and flags override it.\n\
  - positions prints the located nodes/clusters as JSON: [{id, label, x, y}, ...].\n\
  - raster writes a PNG next to the input file (or ./out.png for stdin) and prints positions JSON.\n\
  - Set RUST_LOG (e.g. RUST_LOG=merloc_core=debug) for diagnostics on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_px(raw: &str) -> Result<u32, CliError> {
    match raw.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(CliError::Usage(usage())),
    }
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "positions" => args.command = Command::Positions,
            "raster" => args.command = Command::Raster,
            "sanitize" => args.command = Command::Sanitize,
            "ink-url" => args.command = Command::InkUrl,
            "context" => args.command = Command::Context,
            "--pretty" => args.pretty = true,
            "--no-background" => args.no_background = true,
            "--width" => args.width = Some(parse_px(next_value(&mut it)?)?),
            "--height" => args.height = Some(parse_px(next_value(&mut it)?)?),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--background" => {
                let bg = next_value(&mut it)?.trim();
                if !bg.is_empty() {
                    args.background = Some(bg.to_string());
                }
            }
            "--type" => {
                args.image_type = next_value(&mut it)?
                    .parse::<InkImageType>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    use std::io::Write;
    writeln!(out)?;
    Ok(())
}

fn extract_options(args: &Args) -> Result<ExtractOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(path) => serde_json::from_str::<ExtractOptions>(&std::fs::read_to_string(path)?)?,
        None => ExtractOptions::default(),
    };
    if let Some(w) = args.width {
        options.width = w;
    }
    if let Some(h) = args.height {
        options.height = h;
    }
    if options.width == 0 || options.height == 0 {
        return Err(CliError::Usage("output width and height must be positive"));
    }
    Ok(options)
}

fn default_png_out_path(input: Option<&str>) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension("png"),
        _ => PathBuf::from("out.png"),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Positions => {
            let options = extract_options(&args)?;
            let svg = read_input(args.input.as_deref())?;
            let positions = merloc::extract_positions(&svg, &options)?;
            write_json(&positions, args.pretty)
        }
        Command::Raster => {
            let options = RasterOptions {
                extract: extract_options(&args)?,
                background: if args.no_background {
                    None
                } else {
                    Some(args.background.clone().unwrap_or_else(|| "white".to_string()))
                },
            };
            if args.out.as_deref() == Some("-") {
                return Err(CliError::Usage(
                    "raster writes positions JSON to stdout; --out must name a file",
                ));
            }
            let svg = read_input(args.input.as_deref())?;
            let rendered = render_with_positions(&svg, &options)?;
            let out = args
                .out
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(|| default_png_out_path(args.input.as_deref()));
            std::fs::write(&out, &rendered.png)?;
            tracing::info!(path = %out.display(), bytes = rendered.png.len(), "wrote PNG");
            write_json(&rendered.positions, args.pretty)
        }
        Command::Sanitize => {
            let src = read_input(args.input.as_deref())?;
            print!("{}", sanitize_node_labels(&src));
            Ok(())
        }
        Command::InkUrl => {
            let src = read_input(args.input.as_deref())?;
            let defaults = InkOptions::default();
            let options = InkOptions {
                image_type: args.image_type,
                background: if args.no_background {
                    None
                } else {
                    args.background.clone().or(defaults.background)
                },
            };
            println!("{}", ink_url(src.trim(), &options)?);
            Ok(())
        }
        Command::Context => {
            let Some(dir) = args.input.as_deref().filter(|d| *d != "-") else {
                return Err(CliError::Usage(usage()));
            };
            let context = RepoContext::collect(Path::new(dir))?;
            let out = ContextOut {
                file_tree: &context.file_tree,
                readme: &context.readme,
                estimated_tokens: context.estimated_tokens(),
            };
            write_json(&out, args.pretty)
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
