mod app;
mod cli;
mod config;
mod llm;
mod logging;
mod ops;
mod output;
mod prompt;

use anyhow::Result;

/// bashgpt: describe a shell task in plain language, get a bash command back.
///
/// Usage:
///   bashgpt "list files in the current directory"
///       -> asks the hosted API (key from bashGPT4_API_KEY or the config file)
///
///   bashgpt -l -s "rotate nginx logs weekly"
///       -> asks the local model server for a script instead
///
/// Options:
///   -g / --backticks  Wrap the result in backticks.
///   -c / --clipboard  Also copy the result to the clipboard.
///   -m / --multiple   Allow several commands joined with '&&'.
fn main() -> Result<()> {
    app::run()
}
