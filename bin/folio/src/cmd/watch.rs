//! Watch command - rebuilds the page when the profile or templates change

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Settings;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use super::build::print_build_stats;
use crate::pipeline::Pipeline;

/// Line read from stdin that forces a rebuild.
const MANUAL_REBUILD: &str = ".";

/// Run the watch command.
///
/// Builds once, then rebuilds after file changes settle or when `.` is
/// entered on stdin. Stops on Ctrl+C.
pub async fn run(config_path: &Path, debounce_ms: Option<u64>) -> Result<()> {
    let settings = Settings::load_with_env(config_path).wrap_err("Failed to load settings")?;
    let debounce = Duration::from_millis(debounce_ms.unwrap_or(settings.watch.debounce_ms));
    tracing::info!(?config_path, ?debounce, "Starting watch mode");

    let pipeline = Pipeline::new(settings, config_path)?;
    // Absolute paths so they compare equal to the paths notify reports
    let template_dir = absolute(&pipeline.template_dir());
    let profile_path = pipeline
        .profile_url()
        .is_none()
        .then(|| absolute(&pipeline.profile_path()));

    // Initial build
    tracing::info!("Running initial build...");
    rebuild(&pipeline).await;

    // Setup file watcher
    let (tx, mut rx) = mpsc::channel::<()>(16);
    let targets = WatchTargets {
        template_dir: template_dir.clone(),
        profile: profile_path.clone(),
    };

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                if matches!(
                    event.kind,
                    EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_))
                        | EventKind::Create(_)
                        | EventKind::Remove(_)
                ) && targets.is_relevant(&event.paths)
                {
                    let _ = tx.blocking_send(());
                }
            }
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    if template_dir.exists() {
        watcher
            .watch(&template_dir, RecursiveMode::Recursive)
            .wrap_err("Failed to watch templates directory")?;
        tracing::debug!(path = %template_dir.display(), "Watching templates directory");
    }
    // Editors often save by renaming over the file, which drops a watch on
    // the file itself, so the containing directory is watched instead.
    if let Some(profile_dir) = profile_path.as_deref().and_then(Path::parent) {
        if profile_dir.exists() && !profile_dir.starts_with(&template_dir) {
            watcher
                .watch(profile_dir, RecursiveMode::NonRecursive)
                .wrap_err("Failed to watch profile directory")?;
            tracing::debug!(path = %profile_dir.display(), "Watching profile directory");
        }
    }

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!();
    println!("  Watching for changes. Enter '{MANUAL_REBUILD}' to rebuild now.");
    println!("  Press Ctrl+C to stop");
    println!();

    loop {
        tokio::select! {
            Some(()) = rx.recv() => {
                // Let a burst of events settle, then collapse it into one rebuild
                tokio::time::sleep(debounce).await;
                while rx.try_recv().is_ok() {}

                println!("  File change detected, rebuilding...");
                rebuild(&pipeline).await;
            }
            line = stdin.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) if line.trim() == MANUAL_REBUILD => {
                        println!("  Manual rebuild...");
                        rebuild(&pipeline).await;
                    }
                    Ok(Some(_)) => {}
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        tracing::warn!("stdin closed: {e}");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("  Stopping watch mode");
                break;
            }
        }
    }

    drop(watcher);
    Ok(())
}

/// Run one build, reporting failures without stopping the loop.
async fn rebuild(pipeline: &Pipeline) {
    match pipeline.run().await {
        Ok(stats) => {
            print_build_stats(&stats);
            println!("  ✓ Rebuilt in {}ms", stats.duration_ms);
            println!();
        }
        Err(e) => {
            tracing::error!("Rebuild failed: {e:#}");
            eprintln!("  ✗ Rebuild failed: {e:#}");
        }
    }
}

/// Paths whose changes trigger a rebuild.
#[derive(Debug, Clone)]
struct WatchTargets {
    template_dir: PathBuf,
    profile: Option<PathBuf>,
}

impl WatchTargets {
    fn is_relevant(&self, paths: &[PathBuf]) -> bool {
        paths.iter().any(|path| {
            path.starts_with(&self.template_dir) || self.profile.as_deref() == Some(path.as_path())
        })
    }
}

/// Canonical form of `path`, or its absolute form when it does not exist yet.
fn absolute(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
