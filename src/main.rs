//! ZION terrain walkthrough: streams tiles around a walker moving between zones.

mod scene;
mod walk;
mod watchers;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use zion_runtime::StreamingManager;
use zion_world::overview::{OverviewRegion, render_ascii};
use zion_world::{World, WorldConfig, ZoneId, load_config_from_path};

use crate::scene::SwayBook;
use crate::walk::Walker;
use crate::watchers::ConfigWatcher;

const TICK: Duration = Duration::from_millis(50);

/// Stream ZION terrain tiles along a walk from one zone to another via the nexus.
#[derive(Parser, Debug)]
#[command(name = "zion", version, about, long_about = None)]
struct Cli {
    /// World-generation config (TOML). Built-in defaults when the file is absent.
    #[arg(long, default_value = "assets/worldgen/zion.toml")]
    config: PathBuf,

    /// Ticks to simulate; 0 walks until the destination is reached.
    #[arg(long, default_value_t = 0)]
    steps: u32,

    /// World units travelled per tick.
    #[arg(long, default_value_t = 4.0)]
    speed: f32,

    /// Zone the walk starts in.
    #[arg(long, default_value = "gardens")]
    from: ZoneId,

    /// Zone the walk ends in.
    #[arg(long, default_value = "arena")]
    to: ZoneId,

    /// Reload the config on change and keep walking back and forth in real time.
    #[arg(long)]
    watch: bool,

    /// Print an ASCII overview of zones and relief, then exit.
    #[arg(long)]
    map: bool,

    /// Print the effective config as TOML, then exit.
    #[arg(long)]
    dump_config: bool,

    /// Default log level debug instead of info.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_world(path: &Path) -> Result<World, Box<dyn Error>> {
    let config = if path.exists() {
        log::info!("loading worldgen config from {}", path.display());
        load_config_from_path(path)?
    } else {
        log::warn!("worldgen config missing: {}; using built-in defaults", path.display());
        WorldConfig::default()
    };
    Ok(World::new(config)?)
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let world = Arc::new(load_world(&cli.config)?);

    if cli.dump_config {
        print!("{}", world.config().to_toml_string()?);
        return Ok(());
    }
    if cli.map {
        print!("{}", render_ascii(&world, &OverviewRegion::default()));
        return Ok(());
    }

    let watcher = if cli.watch {
        match ConfigWatcher::spawn(&cli.config) {
            Ok(w) => Some(w),
            Err(e) => {
                log::warn!("config watch unavailable ({}): {}", cli.config.display(), e);
                None
            }
        }
    } else {
        None
    };

    let mut manager = StreamingManager::new(world.clone());
    let events = manager.subscribe();
    let mut sway = SwayBook::default();
    let mut walker = Walker::new(&world, cli.from, cli.to, cli.watch);
    let mut current_zone: Option<ZoneId> = None;
    let dt = TICK.as_secs_f32();

    log::info!(
        target: "events",
        "walking {} -> {} -> {} at {} u/tick",
        cli.from.display_name(),
        ZoneId::HUB.display_name(),
        cli.to.display_name(),
        cli.speed
    );

    let mut tick: u32 = 0;
    loop {
        if let Some(next) = watcher.as_ref().and_then(ConfigWatcher::poll) {
            manager.replace_world(next);
            sway.clear();
            walker.rebase(manager.world(), cli.to);
            current_zone = None;
        }

        let pos = if tick == 0 {
            walker.position()
        } else {
            walker.advance(cli.speed)
        };
        let report = manager.update((pos.x, pos.z));
        for event in events.try_iter() {
            sway.apply(&event, &manager);
        }
        sway.advance(dt);

        let world = manager.world().clone();
        let zone = world.zone_at(pos.x, pos.z);
        if current_zone != Some(zone) {
            current_zone = Some(zone);
            log::info!(
                target: "events",
                "tick {}: entered {} at ({:.1}, {:.1}) h={:.2} ground={}",
                tick,
                zone.display_name(),
                pos.x,
                pos.z,
                world.height(pos.x, pos.z),
                world.ground_at(pos.x, pos.z)
            );
        }
        if !report.is_noop() {
            log::debug!(
                target: "events",
                "tick {}: tile ({}, {}) +{} -{} sway={}",
                tick,
                report.center.cx,
                report.center.cz,
                report.loaded.len(),
                report.unloaded.len(),
                sway.record_count()
            );
        }

        tick += 1;
        if cli.steps > 0 && tick >= cli.steps {
            break;
        }
        if cli.watch {
            std::thread::sleep(TICK);
        } else if cli.steps == 0 && walker.finished() {
            break;
        }
    }

    let stats = manager.stats();
    log::info!(
        target: "events",
        "done after {} ticks: resident={} decorations={} ({} KiB) loaded={} unloaded={} failed={}",
        tick,
        stats.resident_tiles,
        stats.resident_decorations,
        stats.resident_bytes / 1024,
        stats.loaded_total,
        stats.unloaded_total,
        stats.failed_total
    );
    Ok(())
}
