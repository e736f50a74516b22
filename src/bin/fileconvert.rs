//! CLI binary for fileconvert.
//!
//! `serve` runs the HTTP service; `convert` runs a single transform on a
//! local file, which is handy for checking what an endpoint will return.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fileconvert::{
    convert_file, serve, ConversionId, ErrorStatusPolicy, ServerConfig, TransformRegistry,
};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default address (0.0.0.0:8000)
  fileconvert serve

  # Allow two front-ends, cap uploads at 20 MB
  fileconvert serve --allow-origin http://localhost:3000 \
                    --allow-origin https://app.example.com \
                    --max-upload-bytes 20971520

  # Convert a file locally, no server involved
  fileconvert convert --to pdf report.docx -o report.pdf
  fileconvert convert --to csv sales.xlsx

  # Call a running server
  curl -F file=@photo.png http://localhost:8000/convert-to-jpg/ -o converted.jpg

ENVIRONMENT VARIABLES:
  FILECONVERT_BIND              Listen address
  FILECONVERT_ALLOW_ORIGINS     Comma-separated CORS origins
  FILECONVERT_STATIC_DIR        Directory served under /static
  FILECONVERT_MAX_UPLOAD_BYTES  Request body cap (unset = unlimited)
  FILECONVERT_ERROR_STATUS      uniform | classified
  RUST_LOG                      Overrides the log filter
"#;

#[derive(Parser, Debug)]
#[command(
    name = "fileconvert",
    version,
    about = "File format conversion over HTTP: images, DOCX, PDF, Markdown, CSV, XLSX",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true, env = "FILECONVERT_VERBOSE")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true, env = "FILECONVERT_QUIET")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP conversion service.
    Serve(ServeArgs),
    /// Convert one local file.
    Convert(ConvertArgs),
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "FILECONVERT_BIND", default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// Origin allowed to make credentialed cross-origin requests (repeatable).
    #[arg(
        long = "allow-origin",
        env = "FILECONVERT_ALLOW_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    allow_origins: Vec<String>,

    /// Directory served under /static.
    #[arg(long, env = "FILECONVERT_STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Do not mount /static at all.
    #[arg(long, conflicts_with = "static_dir")]
    no_static: bool,

    /// Reject request bodies larger than this many bytes.
    #[arg(long, env = "FILECONVERT_MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,

    /// HTTP status for failed conversions.
    #[arg(long, env = "FILECONVERT_ERROR_STATUS", value_enum, default_value = "uniform")]
    error_status: ErrorStatusArg,
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Input file.
    input: PathBuf,

    /// Target format.
    #[arg(long, value_enum)]
    to: TargetArg,

    /// Output file. Default: the endpoint's download name in the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ErrorStatusArg {
    Uniform,
    Classified,
}

impl From<ErrorStatusArg> for ErrorStatusPolicy {
    fn from(v: ErrorStatusArg) -> Self {
        match v {
            ErrorStatusArg::Uniform => ErrorStatusPolicy::Uniform,
            ErrorStatusArg::Classified => ErrorStatusPolicy::Classified,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TargetArg {
    Jpeg,
    Png,
    Pdf,
    Docx,
    Csv,
    Xlsx,
}

impl From<TargetArg> for ConversionId {
    fn from(v: TargetArg) -> Self {
        match v {
            TargetArg::Jpeg => ConversionId::ImageToJpeg,
            TargetArg::Png => ConversionId::ImageToPng,
            TargetArg::Pdf => ConversionId::DocxToPdf,
            TargetArg::Docx => ConversionId::MarkdownToDocx,
            TargetArg::Csv => ConversionId::SpreadsheetToCsv,
            TargetArg::Xlsx => ConversionId::CsvToSpreadsheet,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Serve(args) => {
            let config = build_config(&args)?;
            serve(config).await.context("Server failed")?;
        }
        Command::Convert(args) => {
            let conversion = ConversionId::from(args.to);
            let output = args
                .output
                .unwrap_or_else(|| PathBuf::from(conversion.output_format().filename()));

            let registry = TransformRegistry::builtin();
            let input = args.input;
            let out = output.clone();
            let result = tokio::task::spawn_blocking(move || {
                convert_file(&registry, conversion, &input, &out)
            })
            .await
            .context("Conversion task panicked")?
            .context("Conversion failed")?;

            if !cli.quiet {
                eprintln!(
                    "{}  {}  {}  →  {}",
                    green("✔"),
                    conversion,
                    dim(&format!("{} bytes, {}", result.output.len(), result.content_type)),
                    bold(&output.display().to_string()),
                );
            }
        }
    }

    Ok(())
}

fn build_config(args: &ServeArgs) -> Result<ServerConfig> {
    let mut builder = ServerConfig::builder()
        .bind_addr(args.bind)
        .allowed_origins(args.allow_origins.iter().map(|o| o.trim().to_string()))
        .static_dir((!args.no_static).then(|| args.static_dir.clone()))
        .error_status(args.error_status.into());
    if let Some(max) = args.max_upload_bytes {
        builder = builder.max_upload_bytes(max);
    }
    builder.build().context("Invalid server configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_flags_map_onto_config() {
        let cli = Cli::parse_from([
            "fileconvert",
            "serve",
            "--bind",
            "127.0.0.1:9001",
            "--allow-origin",
            "http://a.test,http://b.test",
            "--no-static",
            "--error-status",
            "classified",
        ]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = build_config(&args).unwrap();
        assert_eq!(config.bind_addr.port(), 9001);
        assert_eq!(config.allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.static_dir, None);
        assert_eq!(config.error_status, ErrorStatusPolicy::Classified);
    }

    #[test]
    fn convert_targets_map_to_ids() {
        assert_eq!(ConversionId::from(TargetArg::Xlsx), ConversionId::CsvToSpreadsheet);
        assert_eq!(ConversionId::from(TargetArg::Pdf), ConversionId::DocxToPdf);
    }
}
