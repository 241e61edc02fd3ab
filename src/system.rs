use crate::core::error::AssistantError;
use std::env;
use std::fmt;
use std::path::Path;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

/// Represents different shell types with their specific command arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellType {
    Cmd,        // Windows Command Prompt
    PowerShell, // Windows PowerShell or PowerShell Core
    UnixLike,   // Bash, Zsh, Sh, etc.
    Fish,       // Fish shell
}

impl ShellType {
    /// Flag that makes the shell run a single command string.
    pub fn command_flag(&self) -> &'static str {
        match self {
            ShellType::Cmd => "/C",
            ShellType::PowerShell => "-Command",
            ShellType::UnixLike | ShellType::Fish => "-c",
        }
    }
}

/// Holds information about the current system environment
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os_info: String,
    pub shell_path: String,
    pub shell_type: ShellType,
}

impl SystemInfo {
    /// Detects the current system environment and returns a `SystemInfo` struct.
    pub fn new() -> Self {
        let os_info_val = os_info::get();
        let os_info = format!(
            "{} {} {}",
            os_info_val.os_type(),
            os_info_val.version(),
            os_info_val.bitness()
        );

        let (shell_path, shell_type) = detect_shell();

        SystemInfo {
            os_info,
            shell_path,
            shell_type,
        }
    }
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Detects the current shell environment.
fn detect_shell() -> (String, ShellType) {
    if cfg!(target_os = "windows") {
        if env::var("PSModulePath").is_ok() {
            if let Ok(posh_path) = env::var("POSH_EXECUTABLE") {
                if Path::new(&posh_path).exists() {
                    return (posh_path, ShellType::PowerShell);
                }
            }
            return ("powershell.exe".to_string(), ShellType::PowerShell);
        }
        (
            env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string()),
            ShellType::Cmd,
        )
    } else {
        let shell_path = env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());

        let shell_name = Path::new(&shell_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("sh")
            .to_lowercase();

        if shell_name == "fish" {
            (shell_path, ShellType::Fish)
        } else {
            (shell_path, ShellType::UnixLike)
        }
    }
}

/// CPU, memory and disk usage in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemUsage {
    pub cpu: f32,
    pub memory: f32,
    pub disk: f32,
}

impl SystemUsage {
    /// Takes a usage sample. Blocks for the minimum CPU refresh interval.
    pub fn sample() -> Self {
        let mut sys = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu_all();

        let disks = Disks::new_with_refreshed_list();
        let (disk_used, disk_total) = disks.iter().fold((0u64, 0u64), |(used, total), disk| {
            (
                used + (disk.total_space() - disk.available_space()),
                total + disk.total_space(),
            )
        });

        SystemUsage {
            cpu: sys.global_cpu_usage(),
            memory: percent(sys.used_memory(), sys.total_memory()),
            disk: percent(disk_used, disk_total),
        }
    }
}

fn percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64 * 100.0) as f32
    }
}

impl fmt::Display for SystemUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPU Usage: {:.1}%\nMemory Usage: {:.1}%\nDisk Usage: {:.1}%",
            self.cpu, self.memory, self.disk
        )
    }
}

/// Alert thresholds for `monitor`. Unset values default to 100%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub cpu: f32,
    pub memory: f32,
    pub disk: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu: 100.0,
            memory: 100.0,
            disk: 100.0,
        }
    }
}

impl Thresholds {
    /// Parses `cpu=<v>,memory=<v>,disk=<v>`; any subset in any order.
    pub fn parse(spec: &str) -> Result<Self, AssistantError> {
        let mut thresholds = Thresholds::default();

        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                AssistantError::Input(format!("Expected key=value, got '{}'.", pair))
            })?;
            let value: f32 = value.trim().parse().map_err(|_| {
                AssistantError::Input(format!("Threshold for '{}' is not a number.", key.trim()))
            })?;

            match key.trim().to_lowercase().as_str() {
                "cpu" => thresholds.cpu = value,
                "memory" => thresholds.memory = value,
                "disk" => thresholds.disk = value,
                other => {
                    return Err(AssistantError::Input(format!(
                        "Unknown threshold '{}'. Use cpu, memory or disk.",
                        other
                    )));
                }
            }
        }

        Ok(thresholds)
    }

    /// Alert lines for every metric above its threshold.
    pub fn alerts(&self, usage: &SystemUsage) -> Vec<String> {
        let mut alerts = Vec::new();
        if usage.cpu > self.cpu {
            alerts.push(format!("CPU usage is high: {:.1}%", usage.cpu));
        }
        if usage.memory > self.memory {
            alerts.push(format!("Memory usage is high: {:.1}%", usage.memory));
        }
        if usage.disk > self.disk {
            alerts.push(format!("Disk usage is high: {:.1}%", usage.disk));
        }
        alerts
    }
}
