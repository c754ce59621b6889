// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod ordering;
pub mod session;
pub mod types;
pub mod units;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;
use crate::session::Session;
use crate::watch::{spawn_manifest_watcher, WatchEvent};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - manifest loading
/// - the ordering session (memoized assembly / callback orders)
/// - output (stdout listing, optional Graphviz file)
/// - (optional) manifest watcher + Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let manifest = args.manifest.clone();
    let cfg = load_and_validate(&manifest)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let mut session = Session::from_config(&cfg)?;

    if let Some(root) = args.references.as_deref() {
        let refs = session.references_of(root)?;
        println!("{root} references ({}):", refs.len());
        for name in refs {
            println!("  {name}");
        }
        return Ok(());
    }

    emit(&mut session, &args)?;

    if !args.watch {
        return Ok(());
    }

    let (tx, mut rx) = mpsc::channel::<WatchEvent>(16);
    let _watcher = spawn_manifest_watcher(&manifest, tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(WatchEvent::ShutdownRequested).await;
        });
    }

    while let Some(event) = rx.recv().await {
        match event {
            WatchEvent::ShutdownRequested => {
                info!("shutdown requested");
                break;
            }
            WatchEvent::ManifestChanged => {
                // Editors often emit several events per save; one reload is enough.
                let mut shutdown = false;
                while let Ok(extra) = rx.try_recv() {
                    shutdown |= extra == WatchEvent::ShutdownRequested;
                }
                if shutdown {
                    info!("shutdown requested");
                    break;
                }

                info!("manifest changed, re-sorting");
                if let Err(err) = reload(&mut session, &manifest, &args) {
                    error!("reload failed: {err:#}");
                }
            }
        }
    }

    debug!("watch loop finished");
    Ok(())
}

fn reload(session: &mut Session, manifest: &Path, args: &CliArgs) -> Result<()> {
    let cfg = load_and_validate(manifest)?;
    session.apply(&cfg)?;
    emit(session, args)
}

/// Print the order(s) for the requested target and write the dot file.
fn emit(session: &mut Session, args: &CliArgs) -> Result<()> {
    print!("{}", session.render(args.target)?);

    if let Some(dot) = args.dot.as_deref() {
        write_dot(session, args, Path::new(dot))?;
    }
    Ok(())
}

fn write_dot(session: &mut Session, args: &CliArgs, path: &Path) -> Result<()> {
    if args.target.includes_assemblies() {
        let dot = session.assemblies()?.to_dot();
        std::fs::write(path, dot).with_context(|| format!("writing {:?}", path))?;
        info!("wrote assembly graph to {:?}", path);
    }
    if args.target.includes_callbacks() {
        let path = if args.target.includes_assemblies() {
            callbacks_dot_path(path)
        } else {
            path.to_path_buf()
        };
        let dot = session.callbacks()?.to_dot();
        std::fs::write(&path, dot).with_context(|| format!("writing {:?}", path))?;
        info!("wrote callback graph to {:?}", path);
    }
    Ok(())
}

/// `graph.dot` -> `graph.callbacks.dot`.
fn callbacks_dot_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph".to_string());
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dot".to_string());
    path.with_file_name(format!("{stem}.callbacks.{ext}"))
}

/// Simple dry-run output: print units and their declared dependencies.
fn print_dry_run(cfg: &ConfigFile) {
    println!("orderdag dry-run");
    println!("  config.on_cycle = {:?}", cfg.config.on_cycle);
    if let Some(ref platform) = cfg.config.platform {
        println!("  config.platform = {platform}");
    }
    if !cfg.filter.exclude.is_empty() {
        println!("  filter.exclude = {:?}", cfg.filter.exclude);
    }
    if !cfg.filter.plugin_exceptions.is_empty() {
        println!("  filter.plugin_exceptions = {:?}", cfg.filter.plugin_exceptions);
    }
    println!();

    println!("assemblies ({}):", cfg.assembly.len());
    for (name, assembly) in cfg.assembly.iter() {
        println!("  - {name}");
        if let Some(ref path) = assembly.path {
            println!("      path: {}", path.display());
        }
        if !assembly.platforms.is_empty() {
            println!("      platforms: {:?}", assembly.platforms);
        }
        if !assembly.references.is_empty() {
            println!("      references: {:?}", assembly.references);
        }
    }

    println!("callbacks ({}):", cfg.callback.len());
    for cb in cfg.callback.iter() {
        println!("  - {} ({})", cb.identity(), cb.assembly);
        for rule in cb.rules() {
            println!("      {rule}");
        }
    }

    if !cfg.packages.is_empty() {
        println!("packages ({}):", cfg.packages.len());
        for (package, assemblies) in cfg.packages.iter() {
            println!("  - {package}: {:?}", assemblies);
        }
    }

    debug!("dry-run complete (nothing sorted)");
}
