use crossbeam_channel::{Receiver, Sender, unbounded};
use zion_chunk::TileBuildError;
use zion_world::TileCoord;

/// Tile lifecycle notifications for downstream consumers.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamEvent {
    Loaded { coord: TileCoord, decorations: usize },
    Unloaded { coord: TileCoord },
    BuildFailed { coord: TileCoord, error: TileBuildError },
}

impl StreamEvent {
    pub fn coord(&self) -> TileCoord {
        match self {
            StreamEvent::Loaded { coord, .. }
            | StreamEvent::Unloaded { coord }
            | StreamEvent::BuildFailed { coord, .. } => *coord,
        }
    }
}

/// Cumulative streaming counters plus the resident set snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub updates: u64,
    pub loaded_total: u64,
    pub unloaded_total: u64,
    pub failed_total: u64,
    pub resident_tiles: usize,
    pub resident_decorations: usize,
    pub resident_bytes: usize,
    pub last_update_ms: u32,
}

/// Fan-out of stream events. Disconnected subscribers are dropped on send.
#[derive(Default)]
pub(crate) struct EventBus {
    subscribers: Vec<Sender<StreamEvent>>,
}

impl EventBus {
    pub(crate) fn subscribe(&mut self) -> Receiver<StreamEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub(crate) fn publish(&mut self, event: StreamEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut bus = EventBus::default();
        let keep = bus.subscribe();
        let gone = bus.subscribe();
        drop(gone);
        bus.publish(StreamEvent::Unloaded {
            coord: TileCoord::new(1, 2),
        });
        assert_eq!(bus.len(), 1);
        assert_eq!(keep.try_recv().unwrap().coord(), TileCoord::new(1, 2));
    }
}
