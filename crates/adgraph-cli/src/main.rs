//! ADGraph CLI
//!
//! Serves and queries the magazine/document knowledge graph.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{Cli, Commands};

/// Split a log file path into its directory and file name, creating the
/// directory. Returns `None` (after reporting why) when it cannot be created.
fn log_target(path: &Path) -> Option<(PathBuf, OsString)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!(
            "Cannot create log directory {}: {}; logging to stdout only",
            dir.display(),
            e
        );
        return None;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "adgraph.log".into());
    Some((dir.to_path_buf(), file_name))
}

/// Initialize tracing, optionally mirroring output to a log file.
///
/// The returned guard flushes the file writer and must outlive the program.
fn init_tracing(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "adgraph=info,adgraph_web=debug,adgraph_graph=info,tower_http=info".into());

    match log_file.and_then(log_target) {
        Some((dir, file_name)) => {
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Serve(args) => args.log_file.clone(),
        _ => None,
    };
    let _guard = init_tracing(log_file.as_deref());

    cli.execute().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_target_creates_directory() {
        let dir = std::env::temp_dir().join(format!("adgraph-log-{}", std::process::id()));
        let target = log_target(&dir.join("nested").join("serve.log"));
        assert_eq!(target, Some((dir.join("nested"), OsString::from("serve.log"))));
        assert!(dir.join("nested").is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_log_target_falls_back_when_directory_fails() {
        // A regular file where the directory should be.
        let blocker = std::env::temp_dir().join(format!("adgraph-log-blocker-{}", std::process::id()));
        std::fs::write(&blocker, b"").unwrap();
        assert_eq!(log_target(&blocker.join("serve.log")), None);
        let _ = std::fs::remove_file(&blocker);
    }

    #[test]
    fn test_bare_file_name_logs_to_current_directory() {
        let target = log_target(Path::new("serve.log"));
        assert_eq!(target, Some((PathBuf::from("."), OsString::from("serve.log"))));
    }
}
