//! uwu-markdown - live markdown preview with interactive code blocks
//!
//! Entry point for the command-line front end. Handles CLI argument
//! parsing, logging initialization, and renders a document into a
//! standalone HTML page.

use anyhow::Context;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use uwu_markdown::config::{Config, FallbackMode};
use uwu_markdown::editor::{ClipboardWriter, SystemClipboard};
use uwu_markdown::markdown::{HtmlExportOptions, PreviewExporter, RenderPipeline};
use uwu_markdown::state::{JsonFileStore, SessionPersistence};
use uwu_markdown::{AppError, AppResult, RenderedPreview};

/// Application name for logging
const APP_NAME: &str = "uwu-markdown";

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    no_toc: bool,
    static_welcome: bool,
    session: Option<String>,
    new_session: bool,
    copy_block: Option<usize>,
}

impl Args {
    fn uses_session(&self) -> bool {
        self.session.is_some() || self.new_session
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging();

    let args = parse_args();
    log::debug!("Starting {} with {:?}", APP_NAME, args);

    let config = load_config(&args).context("Failed to load configuration")?;
    let mut persistence = open_session(&args).context("Failed to open session storage")?;

    let (text, title) = read_document(&args, persistence.as_mut())?;

    // A fresh session stores whatever was read; a named one only stores FILE
    if let Some(persistence) = persistence.as_mut() {
        if args.input.is_some() || args.new_session {
            persistence
                .save(&text, title.as_deref())
                .context("Failed to store session")?;
        }
        if args.new_session {
            eprintln!("Session: {}", persistence.session_id());
        }
    }

    let pipeline = RenderPipeline::new(&config);
    let preview = pipeline.prepare(&text);
    log::info!(
        "Rendered {:?} preview with {} code block(s)",
        preview.state,
        preview.fragment.blocks().len()
    );

    if let Some(index) = args.copy_block {
        copy_block(&preview, index).context("Failed to copy code block")?;
    }

    let exporter = PreviewExporter::new().with_highlighter(pipeline.highlighter());
    let options = HtmlExportOptions {
        title: Some(title.unwrap_or_else(|| config.editor.default_title.clone())),
        include_toc: config.features.table_of_contents,
        ..Default::default()
    };

    match args.output.as_deref() {
        Some(path) => exporter
            .export_html_file(&preview, path, &options)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", exporter.export_html(&preview, &options)),
    }

    Ok(())
}

/// Initialize the logging system
fn init_logging() {
    // Set default log level if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,uwu_markdown=debug");
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();
}

/// Load the config file, then apply command line overrides
fn load_config(args: &Args) -> AppResult<Config> {
    let mut config = match args.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    if args.no_toc {
        config.features.table_of_contents = false;
    }
    if args.static_welcome {
        config.features.fallback = FallbackMode::StaticWelcome;
    }
    if args.uses_session() {
        config.features.persistence = true;
    }

    config.validate()?;
    Ok(config)
}

/// Session storage for `--session ID` or `--new-session`
fn open_session(args: &Args) -> AppResult<Option<SessionPersistence>> {
    if !args.uses_session() {
        return Ok(None);
    }

    let store = Box::new(JsonFileStore::open_default()?);
    let persistence = match args.session.as_deref() {
        Some(id) => SessionPersistence::new(store, id),
        None => SessionPersistence::with_new_session(store),
    };
    log::info!("Using session {}", persistence.session_id());
    Ok(Some(persistence))
}

/// Put the raw text of code block `index` on the system clipboard
fn copy_block(preview: &RenderedPreview, index: usize) -> AppResult<()> {
    let blocks = preview.fragment.blocks();
    let block = blocks.get(index).ok_or(AppError::NoSuchBlock {
        index,
        count: blocks.len(),
    })?;

    if let Err(e) = SystemClipboard::new().write_text(&block.raw_text) {
        log::warn!("{}", e.user_message());
        return Err(e.into());
    }
    log::info!("Copied {} ({} bytes)", block.id, block.raw_text.len());
    Ok(())
}

/// Document text and title from FILE, the session store, or stdin
fn read_document(
    args: &Args,
    persistence: Option<&mut SessionPersistence>,
) -> anyhow::Result<(String, Option<String>)> {
    if let Some(path) = args.input.as_deref() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(String::from);
        return Ok((text, title));
    }

    if let Some(persistence) = persistence.filter(|_| !args.new_session) {
        let restored = persistence.restore().context("Failed to restore session")?;
        if restored.content.is_none() {
            log::warn!("Session {} has no stored content", persistence.session_id());
        }
        return Ok((restored.content.unwrap_or_default(), restored.title));
    }

    let mut text = String::new();
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        stdin
            .lock()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
    }
    Ok((text, None))
}

/// Parse command line arguments
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-o" | "--output" => {
                parsed.output = Some(PathBuf::from(value_for(&args, i, "--output")));
                i += 1;
            }
            "--config" => {
                parsed.config = Some(PathBuf::from(value_for(&args, i, "--config")));
                i += 1;
            }
            "--session" => {
                parsed.session = Some(value_for(&args, i, "--session").to_string());
                i += 1;
            }
            "--copy-block" => {
                let value = value_for(&args, i, "--copy-block");
                match value.parse() {
                    Ok(index) => parsed.copy_block = Some(index),
                    Err(_) => {
                        eprintln!("Error: --copy-block expects a block number, got '{}'", value);
                        std::process::exit(1);
                    }
                }
                i += 1;
            }
            "--new-session" => parsed.new_session = true,
            "--no-toc" => parsed.no_toc = true,
            "--static-welcome" => parsed.static_welcome = true,
            arg if arg.starts_with('-') && arg != "-" => {
                eprintln!("Unknown option: {}", arg);
                eprintln!("Use --help for usage information");
                std::process::exit(1);
            }
            "-" => parsed.input = None,
            path => {
                if parsed.input.is_some() {
                    eprintln!("Error: only one input file may be given");
                    std::process::exit(1);
                }
                parsed.input = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    if parsed.session.is_some() && parsed.new_session {
        eprintln!("Error: --session and --new-session cannot be combined");
        std::process::exit(1);
    }

    parsed
}

/// Argument following option `i`, or exit with an error
fn value_for<'a>(args: &'a [String], i: usize, option: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires an argument", option);
            std::process::exit(1);
        }
    }
}

/// Print help message
fn print_help() {
    println!(
        r#"uwu-markdown - live markdown preview with interactive code blocks

USAGE:
    uwu-markdown [OPTIONS] [FILE]

Reads FILE (or stdin when FILE is omitted or '-') and writes a standalone
HTML page with collapsible, copyable code blocks and a heading outline.

OPTIONS:
    -h, --help              Show this help message
    -v, --version           Show version information
    -o, --output PATH       Write the page to PATH instead of stdout
        --config PATH       Load configuration from PATH
        --no-toc            Leave out the table of contents
        --static-welcome    Use the static welcome page for empty input
        --session ID        Load the stored document for ID when no FILE
                            is given, otherwise store FILE under ID
        --new-session       Store the document under a new random session
                            ID and print that ID to stderr
        --copy-block N      Copy the raw text of code block N (from 0)
                            to the system clipboard

EXAMPLES:
    uwu-markdown README.md -o readme.html
    cat notes.md | uwu-markdown --no-toc
    uwu-markdown --session work -o work.html
    uwu-markdown draft.md --new-session -o draft.html
    uwu-markdown snippet.md --copy-block 0 -o /dev/null
"#
    );
}

/// Print version information
fn print_version() {
    println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
}
