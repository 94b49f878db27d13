// native repl over the same core, handy for poking at a content snapshot
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use folio_shell::{logging, CommandProcessor, Printed, SessionAction, ShellError, TerminalConfig, TerminalContext, VirtualFileSystem};
use folio_shell::vfs::SnapshotOptions;

/// Explore a portfolio content snapshot from the terminal.
#[derive(Parser, Debug)]
#[command(name = "folio-shell", version, about)]
struct Cli {
    /// JSON object mapping file paths to their contents
    snapshot: Option<PathBuf>,

    /// JSON terminal config (user, home, clearLines, ...)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn read(path: &Path) -> Result<String, ShellError> {
    fs::read_to_string(path).map_err(|e| ShellError::Config(format!("{}: {}", path.display(), e)))
}

fn load_snapshot(path: &Path) -> Result<Vec<(String, String)>, ShellError> {
    let files: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&read(path)?)
        .map_err(|e| ShellError::Config(format!("{}: {}", path.display(), e)))?;
    Ok(files
        .into_iter()
        .filter_map(|(path, content)| match content {
            serde_json::Value::String(text) => Some((path, text)),
            _ => {
                log::warn!("skipping {}: content is not a string", path);
                None
            }
        })
        .collect())
}

fn load_config(path: Option<&Path>) -> Result<TerminalConfig, ShellError> {
    match path {
        Some(path) => TerminalConfig::from_json(&read(path)?),
        None => Ok(TerminalConfig::default()),
    }
}

fn build(cli: &Cli) -> Result<CommandProcessor, ShellError> {
    let config = load_config(cli.config.as_deref())?;
    logging::init(config.log_filter());
    let entries = match &cli.snapshot {
        Some(path) => load_snapshot(path)?,
        None => Vec::new(),
    };
    let vfs = VirtualFileSystem::from_snapshot_with(entries, &SnapshotOptions::from(&config));
    Ok(CommandProcessor::new(TerminalContext::new(vfs, config)))
}

fn show(printed: &[Printed]) {
    let mut stdout = io::stdout();
    for block in printed {
        let _ = write!(stdout, "{}", block.text);
    }
    let _ = write!(stdout, " ");
    let _ = stdout.flush();
}

fn main() {
    let cli = Cli::parse();
    let mut processor = match build(&cli) {
        Ok(processor) => processor,
        Err(e) => {
            eprintln!("folio-shell: {}", e);
            process::exit(1);
        }
    };

    show(&[Printed { text: processor.prompt(), markdown: false }]);
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        let mut printed: Vec<Printed> = Vec::new();
        processor.process_command(&line, &mut printed);
        show(&printed);

        for action in processor.take_actions() {
            match action {
                SessionAction::Navigate(route) => {
                    println!("\n(leaving for {})", route);
                    return;
                }
            }
        }
    }
    println!();
}
