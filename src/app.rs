use crate::cli::Cli;
use crate::config::{find_config_path, load_config, resolve_provider_with};
use crate::llm::{build_provider, CompletionProvider, GenerationError};
use crate::logging;
use crate::ops;
use crate::output::{wrap_in_backticks, ClipboardSink, SystemClipboard, GENERATION_FAILED_MESSAGE};
use crate::prompt::{build_conversation, OutputKind};
use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::env;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

/// Exit code when no usable description was given.
pub const EXIT_USAGE: i32 = 1;

/// Everything one invocation needs, taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub description: String,
    pub kind: OutputKind,
    pub multiple: bool,
    pub max_tokens: i64,
    pub use_backticks: bool,
    pub verbose: bool,
    pub copy_to_clipboard: bool,
}

impl GenerationRequest {
    /// `None` when the description is blank.
    pub fn from_cli(cli: &Cli) -> Option<Self> {
        let description = cli.description_text();
        if description.trim().is_empty() {
            return None;
        }
        Some(Self {
            description,
            kind: OutputKind::from_script_flag(cli.script),
            multiple: cli.multiple,
            max_tokens: cli.tokens,
            use_backticks: cli.backticks,
            verbose: cli.verbose,
            copy_to_clipboard: cli.clipboard,
        })
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = find_config_path();
    let mut clipboard = SystemClipboard;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let lookup = |key: &str| env::var(key).ok();
    let exit_code = match run_with(cli, &config_path, &lookup, &mut clipboard, &mut out) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    out.flush().ok();
    std::process::exit(exit_code);
}

/// `env` resolves the environment overrides for the config file.
pub fn run_with(
    cli: Cli,
    config_path: &Path,
    env: &dyn Fn(&str) -> Option<String>,
    clipboard: &mut dyn ClipboardSink,
    out: &mut dyn Write,
) -> Result<i32> {
    if cli.init {
        ops::init_config(config_path)?;
        return Ok(0);
    }

    let Some(request) = GenerationRequest::from_cli(&cli) else {
        write!(out, "{}", Cli::command().render_help())?;
        return Ok(EXIT_USAGE);
    };

    let file_cfg = load_config(config_path)?;
    let settings = resolve_provider_with(file_cfg, cli.local, env)?;
    let provider = build_provider(settings);

    generate_and_present(&request, provider.as_ref(), clipboard, out)
}

/// Runs one generation and prints the outcome.
///
/// Generation failure is reported on `out` and still returns exit code 0;
/// only configuration and IO problems surface as `Err`.
pub fn generate_and_present(
    request: &GenerationRequest,
    provider: &dyn CompletionProvider,
    clipboard: &mut dyn ClipboardSink,
    out: &mut dyn Write,
) -> Result<i32> {
    let conversation = build_conversation(&request.description, request.kind, request.multiple);
    if request.verbose {
        info!("Instruction: {}", conversation.user().content);
    }

    let result = provider
        .generate(&conversation, request.max_tokens, request.verbose)
        .and_then(|text| {
            if text.trim().is_empty() {
                Err(GenerationError::EmptyContent {
                    provider: provider.name().to_string(),
                })
            } else {
                Ok(text)
            }
        });

    let text = match result {
        Ok(text) => text,
        Err(err) => {
            if request.verbose {
                info!("Error querying {}: {}", provider.name(), err);
            }
            writeln!(out, "{}", GENERATION_FAILED_MESSAGE)?;
            return Ok(0);
        }
    };

    let text = if request.use_backticks {
        wrap_in_backticks(&text)
    } else {
        text
    };

    if request.verbose {
        info!("Generated {}:", request.kind.noun());
    }
    writeln!(out, "{}", text)?;

    if request.copy_to_clipboard {
        match clipboard.copy(&text) {
            Ok(()) => writeln!(out, "{} copied to clipboard.", capitalize(request.kind.noun()))?,
            Err(err) => warn!("Failed to copy to clipboard: {:#}", err),
        }
    }

    Ok(0)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
