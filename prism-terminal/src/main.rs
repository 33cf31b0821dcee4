//! Prism Terminal Viewer
//!
//! Renders the configured prism as ASCII art.
//! Controls:
//!   - Left mouse drag: rotate (trackball)
//!   - Scroll wheel: zoom
//!   - Q/ESC: Quit
//!
//! Logs go to `prism-terminal.log` in the temp directory unless `--log-file`
//! names another path.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::{Env, Target};
use prism_core::SceneConfig;
use prism_terminal::TerminalApp;

#[derive(Debug, Parser)]
#[command(name = "prism-terminal", version, about = "Trackball-rotatable prism in the terminal")]
struct Args {
    /// Scene configuration file (TOML); defaults are used for missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log file; the terminal itself is taken by the viewer
    #[arg(long, default_value_os_t = default_log_path())]
    log_file: PathBuf,

    /// Start with lighting disabled
    #[arg(long)]
    no_lighting: bool,
}

fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("prism-terminal.log")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stderr would scribble over the alternate screen
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("failed to create log file {}", args.log_file.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .target(Target::Pipe(Box::new(log_file)))
        .init();

    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if args.no_lighting {
        config.lighting.enabled = false;
    }

    let mut app = TerminalApp::new(config).context("failed to start terminal viewer")?;
    app.run().context("terminal viewer failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_go_to_a_file_by_default() {
        let args = Args::try_parse_from(["prism-terminal"]).unwrap();
        assert_eq!(args.log_file, default_log_path());
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_log_file_can_be_overridden() {
        let args =
            Args::try_parse_from(["prism-terminal", "--log-file", "view.log", "--no-lighting"])
                .unwrap();
        assert_eq!(args.log_file, PathBuf::from("view.log"));
        assert!(args.no_lighting);
    }
}
