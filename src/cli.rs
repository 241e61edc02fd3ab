use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Brother Eye: a command assistant for your desktop", long_about = None)]
pub struct Args {
    /// Run one command and exit, e.g. `beye weather Paris`
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,

    /// Path to the config file (default: ~/.beye/config.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory scanned for plugin manifests
    #[arg(long)]
    pub plugin_dir: Option<PathBuf>,

    /// Chat provider [possible values: openai, openrouter, deepseek]
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Chat model (provider-specific)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Dispatch input verbatim instead of normalizing conversational phrasing
    #[arg(long)]
    pub no_nlp: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The one-shot command, if any words were given.
    pub fn one_shot(&self) -> Option<String> {
        (!self.command.is_empty()).then(|| self.command.join(" "))
    }
}
