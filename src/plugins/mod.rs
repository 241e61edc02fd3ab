//! Runtime plugin registry.
//!
//! Plugins are discovered by scanning one directory. Each candidate file is turned
//! into a [`Plugin`] by the registry's [`PluginLoader`], initialized, and only then
//! registered under its file stem. A plugin that fails to load or initialize is
//! logged and skipped; the rest of the scan carries on.

pub mod manifest;

use crate::core::error::{AssistantError, panic_text};
use std::collections::BTreeMap;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

pub use manifest::ManifestLoader;

/// A loaded extension.
pub trait Plugin: Send + Sync {
    /// Runs on load and again on every `enable_plugin`.
    fn initialize(&self) -> Result<(), AssistantError>;

    /// Runs when the host exits cleanly. Disabling a plugin does not call it.
    fn shutdown(&self) -> Result<(), AssistantError> {
        Ok(())
    }

    fn description(&self) -> Option<&str> {
        None
    }

    /// Actions this plugin adds to the router.
    fn commands(&self) -> Vec<String> {
        Vec::new()
    }

    fn run_command(&self, action: &str, _argument: Option<&str>) -> Result<String, AssistantError> {
        Err(AssistantError::Plugin(format!(
            "this plugin does not provide '{}'",
            action
        )))
    }
}

/// Turns a file from the plugin directory into a plugin.
pub trait PluginLoader: Send + Sync {
    /// File extensions (without the dot) this loader accepts.
    fn extensions(&self) -> &[&str];

    fn load(&self, path: &Path) -> Result<Box<dyn Plugin>, AssistantError>;
}

/// Outcome of one directory scan.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl LoadReport {
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Plugins reloaded: {} loaded, {} failed.",
            self.loaded.len(),
            self.failed.len()
        )];
        for name in &self.loaded {
            lines.push(format!("Loaded plugin: {}", name));
        }
        for (name, reason) in &self.failed {
            lines.push(format!("Error loading plugin {}: {}", name, reason));
        }
        lines.join("\n")
    }
}

pub struct PluginRegistry {
    dir: PathBuf,
    loader: Box<dyn PluginLoader>,
    plugins: BTreeMap<String, Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new(dir: impl Into<PathBuf>, loader: Box<dyn PluginLoader>) -> Self {
        Self {
            dir: dir.into(),
            loader,
            plugins: BTreeMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn candidates(&self) -> Result<Vec<PathBuf>, AssistantError> {
        let extensions = self.loader.extensions();
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let accepted = path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)));
            if accepted {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Clears the registry and rescans the plugin directory, creating it if needed.
    ///
    /// Only a failure to read the directory itself is returned as an error.
    pub fn load_all(&mut self) -> Result<LoadReport, AssistantError> {
        self.plugins.clear();
        fs::create_dir_all(&self.dir)?;

        let mut report = LoadReport::default();
        for path in self.candidates()? {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            let loader = &self.loader;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                loader
                    .load(&path)
                    .and_then(|plugin| plugin.initialize().map(|_| plugin))
            }))
            .unwrap_or_else(|payload| {
                Err(AssistantError::Plugin(format!(
                    "panicked while loading: {}",
                    panic_text(payload.as_ref())
                )))
            });

            match outcome {
                Ok(plugin) => {
                    tracing::info!(plugin = %name, "loaded plugin");
                    self.plugins.insert(name.clone(), plugin);
                    report.loaded.push(name);
                }
                Err(e) => {
                    tracing::warn!(plugin = %name, "error loading plugin: {}", e);
                    report.failed.push((name, e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Registered plugin names, sorted.
    pub fn list(&self) -> Vec<String> {
        self.plugins.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins.get(name).map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Re-runs `initialize` on a registered plugin. Does not touch the disk.
    pub fn enable(&self, name: &str) -> Result<(), AssistantError> {
        let plugin = self
            .plugins
            .get(name)
            .ok_or_else(|| AssistantError::PluginNotFound(name.to_string()))?;
        plugin.initialize()
    }

    /// Removes a plugin from routing. No teardown hook runs.
    pub fn disable(&mut self, name: &str) -> Result<(), AssistantError> {
        self.plugins
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| AssistantError::PluginNotFound(name.to_string()))
    }

    /// First registered plugin (by name) that exports `action`.
    pub fn find_command(&self, action: &str) -> Option<(&str, &dyn Plugin)> {
        self.plugins
            .iter()
            .find(|(_, plugin)| plugin.commands().iter().any(|c| c == action))
            .map(|(name, plugin)| (name.as_str(), plugin.as_ref()))
    }

    /// `(action, plugin name)` for every plugin command, sorted by action.
    pub fn command_names(&self) -> Vec<(String, String)> {
        let mut names: Vec<(String, String)> = self
            .plugins
            .iter()
            .flat_map(|(name, plugin)| {
                plugin
                    .commands()
                    .into_iter()
                    .map(move |action| (action, name.clone()))
            })
            .collect();
        names.sort();
        names
    }

    /// Runs every plugin's `shutdown` hook, logging failures.
    pub fn shutdown_all(&self) {
        for (name, plugin) in &self.plugins {
            match panic::catch_unwind(AssertUnwindSafe(|| plugin.shutdown())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(plugin = %name, "plugin shutdown failed: {}", e),
                Err(payload) => tracing::warn!(
                    plugin = %name,
                    "plugin shutdown panicked: {}",
                    panic_text(payload.as_ref())
                ),
            }
        }
    }
}
