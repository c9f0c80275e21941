//! Hot reload of the world-generation config.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use zion_world::{World, load_config_from_path};

/// Watches one config file; [`ConfigWatcher::poll`] yields a rebuilt world
/// after each change that parses and validates.
pub struct ConfigWatcher {
    path: PathBuf,
    rx: Receiver<()>,
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    pub fn spawn(path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = channel::<()>();
        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                match event.kind {
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any => {
                        let _ = tx.send(());
                    }
                    _ => {}
                }
            }
        })?;
        watcher.watch(path, RecursiveMode::NonRecursive)?;
        log::info!("watching worldgen config {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            rx,
            _watcher: watcher,
        })
    }

    /// Drains pending change notifications. A failed reload keeps the current world.
    pub fn poll(&self) -> Option<Arc<World>> {
        let mut changed = false;
        for _ in self.rx.try_iter() {
            changed = true;
        }
        if !changed {
            return None;
        }
        reload(&self.path)
    }
}

fn reload(path: &Path) -> Option<Arc<World>> {
    if !path.exists() {
        log::warn!("worldgen config missing: {}", path.display());
        return None;
    }
    let config = match load_config_from_path(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("worldgen config reload failed ({}): {}", path.display(), e);
            return None;
        }
    };
    match World::new(config) {
        Ok(world) => {
            log::info!("worldgen config reloaded from {}", path.display());
            Some(Arc::new(world))
        }
        Err(e) => {
            log::warn!("worldgen config rejected ({}): {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str, body: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("zion-watch-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("zion.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn reload_builds_world_from_file() {
        let path = scratch("ok", "seed = 42\n[streaming]\nload_radius = 2\n");
        let world = reload(&path).unwrap();
        assert_eq!(world.seed(), 42);
        assert_eq!(world.streaming().load_radius, 2);
    }

    #[test]
    fn invalid_config_keeps_current_world() {
        let path = scratch("bad", "[streaming]\ntile_size = -1.0\n");
        assert!(reload(&path).is_none());
        let path = scratch("garbled", "seed = \"nope\"");
        assert!(reload(&path).is_none());
        assert!(reload(Path::new("/definitely/not/here.toml")).is_none());
    }
}
