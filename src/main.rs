use beye::app::Application;
use beye::cli::Args;
use beye::commands::{AssistantState, create_command_registry};
use beye::config::Config;
use beye::core::error::AssistantError;
use beye::display;
use beye::logging;
use beye::plugins::{ManifestLoader, PluginRegistry};
use beye::services::Services;
use beye::system::SystemInfo;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), AssistantError> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_overrides(
        args.provider.as_deref(),
        args.model.as_deref(),
        args.plugin_dir.clone(),
    )?;

    if let Err(e) = logging::init(&config.log_path(), &config.logging.level, args.verbose) {
        display::display_error(&e.to_string());
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let system = SystemInfo::new();
    let services = Services::from_config(&config);

    let mut plugins = PluginRegistry::new(
        config.plugin_dir(),
        Box::new(ManifestLoader::new(system.clone())),
    );
    match plugins.load_all() {
        Ok(report) => tracing::info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "plugin scan finished"
        ),
        Err(e) => {
            tracing::warn!(dir = %plugins.dir().display(), "plugin scan failed: {}", e);
            display::display_error(&format!("Plugins unavailable: {}", e));
        }
    }

    let state = AssistantState::new(plugins, services, system);
    let mut app = Application::new(args, create_command_registry(), state);
    let result = app.run().await;

    if let Err(e) = &result {
        tracing::error!("exiting with error: {}", e);
    }
    result
}
