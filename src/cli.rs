use clap::Parser;

/// Command-line interface definition for bashgpt.
#[derive(Parser, Debug, Clone)]
#[command(name = "bashgpt")]
#[command(version)]
#[command(
    about = "Query a hosted LLM API or a local model server to generate a bash command",
    long_about = None
)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Write a default config file with placeholder values and exit
    #[arg(long)]
    pub init: bool,

    /// Maximum number of tokens for the response (0 or less means no limit for --local)
    #[arg(short = 't', long, default_value_t = 100, allow_negative_numbers = true)]
    pub tokens: i64,

    /// Wrap the output in backtick characters
    #[arg(short = 'g', long)]
    pub backticks: bool,

    /// Use the local model server (LM Studio style) instead of the hosted API
    #[arg(short, long)]
    pub local: bool,

    /// If the action is complex, provide multiple commands separated by '&&'
    #[arg(short, long)]
    pub multiple: bool,

    /// Enable verbose output on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Copy the generated command to the clipboard
    #[arg(short, long)]
    pub clipboard: bool,

    /// Generate a script instead of a command
    #[arg(short, long)]
    pub script: bool,

    /// Description of the command you want to generate
    #[arg(required_unless_present = "init", num_args = 1..)]
    pub description: Vec<String>,
}

impl Cli {
    /// The description words joined with single spaces.
    pub fn description_text(&self) -> String {
        self.description.join(" ")
    }
}
