use anyhow::Context;
use clap::{ArgAction, Parser};
use htmltopdf::cdp::{CdpEngine, CdpOptions};
use htmltopdf::{deliver, InputSource, Orientation, OutputSink, PageFormat, RenderOverrides, RenderRequest, Renderer};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Render an HTML document to PDF with headless Chrome
#[derive(Parser, Debug)]
#[command(name = "htmltopdf", version, about)]
struct Cli {
    /// Lay pages out in landscape orientation
    #[arg(short, long)]
    landscape: bool,

    /// Paper size
    #[arg(short = 's', long = "pagesize", value_enum, ignore_case = true, default_value_t = PageFormat::Letter)]
    page_size: PageFormat,

    /// File with static HTML rendered as the footer of every page
    #[arg(short, long, value_name = "FILE")]
    footer: Option<PathBuf>,

    /// HTML document to render [default: standard input]
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Where to write the PDF [default: standard output]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Navigation timeout in milliseconds [default: 60000]
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Chrome or Chromium executable to launch
    #[arg(long, value_name = "PATH")]
    chrome: Option<PathBuf>,

    /// Launch Chrome without its sandbox (needed in some containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // Logs go to stderr; stdout may carry the PDF
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let footer_html = match &cli.footer {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading footer {}", path.display()))?,
        ),
        None => None,
    };

    let overrides = RenderOverrides {
        footer_html,
        page_format: Some(cli.page_size),
        orientation: Some(Orientation::from_landscape(cli.landscape)),
        navigation_timeout: cli.timeout.map(Duration::from_millis),
        ..Default::default()
    };

    let source = match cli.input {
        Some(path) => InputSource::File(path),
        None => InputSource::Stdin,
    };

    let engine = CdpEngine::new(CdpOptions {
        chrome_path: cli.chrome,
        sandbox: !cli.no_sandbox,
        ..Default::default()
    });

    let pdf = Renderer::new(engine)
        .render(RenderRequest::new(source).overrides(overrides))
        .await
        .context("rendering failed")?;

    let sink = OutputSink::from_path(cli.output);
    deliver(pdf.as_bytes(), &sink).context("writing PDF failed")?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("htmltopdf: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
