use anyhow::{anyhow, Context, Result};
use clap::Parser;
use evidenceflow::config::PipelineConfig;
use evidenceflow::observability::{init_tracing, LogFormat};
use evidenceflow::pipeline::PipelineBuilder;
use evidenceflow::report::format_console_summary;
use evidenceflow::utils::normalize_url;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "evidenceflow",
    version,
    about = "Capture a company website and extract audited contact evidence"
)]
struct Cli {
    /// Website to analyze; prompts when omitted. `https://` is added if no scheme is given
    url: Option<String>,

    /// Model identifier (overrides EVIDENCEFLOW_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Directory for daily audit logs (overrides EVIDENCEFLOW_LOGS_DIR)
    #[arg(long, value_name = "DIR")]
    logs_dir: Option<PathBuf>,

    /// Directory for reports (overrides EVIDENCEFLOW_REPORTS_DIR)
    #[arg(long, value_name = "DIR")]
    reports_dir: Option<PathBuf>,

    /// Directory for raw evidence snapshots (overrides EVIDENCEFLOW_EVIDENCE_DIR)
    #[arg(long, value_name = "DIR", conflicts_with = "no_archive")]
    evidence_dir: Option<PathBuf>,

    /// Do not archive raw evidence
    #[arg(long)]
    no_archive: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn apply(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(dir) = &self.logs_dir {
            config = config.with_logs_dir(dir.clone());
        }
        if let Some(dir) = &self.reports_dir {
            config = config.with_reports_dir(dir.clone());
        }
        if let Some(dir) = &self.evidence_dir {
            config = config.with_evidence_dir(dir.clone());
        }
        if self.no_archive {
            config = config.without_evidence_archive();
        }
        config
    }
}

/// Uses the URL argument, or prompts on `output` and reads one line from
/// `input` when it is absent.
fn resolve_url<R, W>(arg: Option<&str>, input: &mut R, output: &mut W) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    let raw = match arg {
        Some(url) => url.to_string(),
        None => {
            write!(output, "Enter the website URL to analyze: ").context("writing prompt")?;
            output.flush().context("flushing prompt")?;
            let mut line = String::new();
            input.read_line(&mut line).context("reading URL from stdin")?;
            line
        }
    };
    normalize_url(&raw).ok_or_else(|| anyhow!("No URL provided."))
}

/// Loads configuration, resolves the URL and runs one pipeline.
///
/// The API key is checked before the user is asked for anything.
async fn run<F, R, W>(cli: &Cli, lookup: F, input: &mut R, output: &mut W) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    R: BufRead,
    W: Write,
{
    let config = cli.apply(PipelineConfig::from_lookup(lookup)?);
    config.validate()?;

    let url = resolve_url(cli.url.as_deref(), input, output)?;

    let pipeline = PipelineBuilder::from_config(&config)?
        .build()
        .context("building pipeline")?;
    let result = pipeline
        .run(&url)
        .await
        .map_err(|err| {
            error!(kind = err.kind(), error = %err, "Pipeline failed");
            err
        })
        .context("Pipeline failed")?;

    writeln!(output, "{}", format_console_summary(&result.state)).context("writing summary")?;
    Ok(())
}

/// Maps a run outcome to a process exit status, reporting errors on `err_out`.
fn exit_status<W: Write>(result: Result<()>, err_out: &mut W) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(err_out, "Error: {err:#}");
            1
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    if let Err(err) = init_tracing(format) {
        eprintln!("Warning: could not install log subscriber: {err}");
    }

    let result = run(
        &cli,
        |key| std::env::var(key).ok(),
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )
    .await;
    ExitCode::from(exit_status(result, &mut io::stderr()))
}
