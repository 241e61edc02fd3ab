use crate::plugins::LoadReport;
use console::style;

fn box_width(cap: usize, floor: usize) -> usize {
    let terminal_width = console::Term::stdout().size().1 as usize;
    std::cmp::min(terminal_width.saturating_sub(4), cap).max(floor)
}

/// Wraps each line of `text` at `max_len` characters, preferring to break on a space.
pub fn wrap_lines(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut wrapped = Vec::new();

    for line in text.lines() {
        let mut remaining: Vec<char> = line.chars().collect();
        if remaining.is_empty() {
            wrapped.push(String::new());
            continue;
        }
        while !remaining.is_empty() {
            if remaining.len() <= max_len {
                wrapped.push(remaining.iter().collect());
                break;
            }
            let cut = remaining[..max_len]
                .iter()
                .rposition(|c| *c == ' ')
                .filter(|&i| i > 0)
                .unwrap_or(max_len);
            wrapped.push(remaining[..cut].iter().collect());
            let rest: Vec<char> = remaining[cut..].to_vec();
            let skip = rest.iter().take_while(|c| **c == ' ').count();
            remaining = rest[skip..].to_vec();
        }
    }
    wrapped
}

pub fn display_banner(provider_model: &str, plugin_count: usize) {
    println!(
        "{} {}",
        style("Brother Eye").bold().magenta(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
    );
    println!(
        "{}",
        style(format!(
            "chat model: {} | plugins loaded: {}",
            provider_model, plugin_count
        ))
        .dim()
    );
    println!(
        "Type a command or just ask. {} lists commands, {} exits.",
        style("help").bold().cyan(),
        style("/quit").bold().cyan()
    );
}

/// Boxed result of one dispatched command.
pub fn display_result(command: &str, result: &str) {
    let max_width = box_width(120, 60);
    let lines = wrap_lines(result, max_width.saturating_sub(4));
    let content_max_len = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = std::cmp::min(max_width, content_max_len + 4).max(command.chars().count() + 6);

    let top_border = "┌".to_string() + &"─".repeat(width.saturating_sub(2)) + "┐";
    let bottom_border = "└".to_string() + &"─".repeat(width.saturating_sub(2)) + "┘";

    println!("\n{} {}", style(">").bold().green(), style(command).bold().yellow());
    println!("{}", style(&top_border).dim().blue());
    for line in lines {
        let padding = width.saturating_sub(line.chars().count() + 3);
        println!("│ {}{}│", style(&line).white(), " ".repeat(padding));
    }
    println!("{}", style(&bottom_border).dim().blue());
}

/// Plain result for one-shot and piped use, where boxes get in the way.
pub fn display_plain(result: &str) {
    println!("{}", result);
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("Error:").bold().red(), message);
}

pub fn display_history(history: &[String]) {
    if history.is_empty() {
        println!("{}", style("No commands yet.").dim());
        return;
    }
    println!("{}", style("Command History").bold().underlined());
    for (i, command) in history.iter().enumerate() {
        println!("{:>4}  {}", style(i + 1).dim(), command);
    }
}

pub fn display_load_report(report: &LoadReport) {
    for line in report.summary().lines() {
        if line.starts_with("Error") {
            println!("{}", style(line).red());
        } else {
            println!("{}", style(line).green());
        }
    }
}

pub fn display_meta_help() {
    println!("{}", style("REPL Commands").bold().underlined());
    println!("/help     - Show these REPL commands");
    println!("/history  - Show every command dispatched this session");
    println!("/reload   - Rescan the plugin directory");
    println!("/quit     - Exit (plugins are shut down)");
    println!("Type {} for the assistant's command list.", style("help").bold().cyan());
}
