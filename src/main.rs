// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use bisrt::app_config::{self, Config};
use bisrt::{AppError, Controller};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for bisrt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// bisrt - bilingual subtitles with an LLM
///
/// Splits an SRT file into chunks, asks an OpenAI model to add a Chinese line
/// under every English line, and writes `<name>.zh-CN.srt` next to the input.
#[derive(Parser, Debug)]
#[command(name = "bisrt")]
#[command(version)]
#[command(about = "Turn an English SRT file into a bilingual English + Chinese one")]
#[command(long_about = "bisrt sends a subtitle file to an OpenAI model in chunks and writes a bilingual copy.

EXAMPLES:
    bisrt movie.srt                         # Writes movie.zh-CN.srt
    bisrt -m gpt-4.1 movie.srt              # Use a specific model
    bisrt -c 80 --timeout-ms 600000 a.srt   # Bigger chunks, more patience
    bisrt completions bash > bisrt.bash     # Generate bash completions

ENVIRONMENT:
    OPENAI_API_KEY (or OPENAI_KEY)   API key, required
    OPENAI_MODEL                     Model identifier
    OPENAI_BASE_URL                  API base URL
    OPENAI_TIMEOUT_MS                Base timeout per attempt (grows with each retry)
    BISRT_CHUNK_SIZE                 Minimum subtitle blocks per request
    BISRT_MAX_RETRIES                Attempts per chunk
    BISRT_CONCURRENCY                Chunks in flight at once (default 1)")]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file to convert
    #[arg(value_name = "INPUT", required = true)]
    input_path: Option<PathBuf>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API base URL, e.g. https://api.openai.com/v1
    #[arg(long)]
    endpoint: Option<String>,

    /// Base timeout per attempt in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Attempts per chunk before it is skipped
    #[arg(short = 'r', long)]
    max_retries: Option<u32>,

    /// Minimum number of subtitle blocks per request
    #[arg(short = 'c', long, value_name = "BLOCKS")]
    chunk_size: Option<usize>,

    /// Number of chunks translated at the same time
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Output file (defaults to <name>.zh-CN.<ext> next to the input)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "PATH", env = "BISRT_CONFIG")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation; filtering follows `log::max_level()`
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Info until the configuration says otherwise
    if CustomLogger::init(LevelFilter::Info).is_err() {
        eprintln!("Failed to initialize logger");
    }

    // Missing INPUT prints usage and exits with status 2
    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "bisrt", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("An unrecoverable error occurred: {:#}", e);
            if let Some(AppError::InputNotFound(path)) = e.downcast_ref::<AppError>() {
                error!("Error: The file was not found at {:?}. Please check the path.", path);
            }
            ExitCode::FAILURE
        }
    }
}

/// Build the configuration: defaults, then config file, then environment, then flags
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let mut config = match &options.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    config.apply_env().context("Invalid environment configuration")?;

    if let Some(model) = &options.model {
        config.model = model.clone();
    }
    if let Some(endpoint) = &options.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(timeout_ms) = options.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(max_retries) = options.max_retries {
        config.max_retries = max_retries;
    }
    if let Some(chunk_size) = options.chunk_size {
        config.min_blocks_per_chunk = chunk_size;
    }
    if let Some(concurrency) = options.concurrency {
        config.concurrent_requests = concurrency;
    }
    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }

    Ok(config)
}

async fn run(options: CommandLineOptions) -> Result<()> {
    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let input_path = options
        .input_path
        .context("INPUT is required when no subcommand is specified")?;

    let controller = Controller::with_config(config)?.with_progress(true);
    let summary = controller.run(&input_path, options.output).await?;

    if summary.result.is_complete() {
        info!("Success! File has been translated and saved to {:?}", summary.output_path);
    } else {
        info!(
            "Finished with {} skipped chunk(s); partial output saved to {:?}",
            summary.result.dropped_chunks.len(),
            summary.output_path
        );
    }

    Ok(())
}
