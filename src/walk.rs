//! Scripted walk between two zones through the hub.

use zion_geom::Vec2;
use zion_world::{World, ZoneId};

/// Polyline walker: `from` center, hub center, `to` center.
#[derive(Clone, Debug)]
pub struct Walker {
    waypoints: Vec<Vec2>,
    leg: usize,
    along: f32,
    looping: bool,
}

impl Walker {
    pub fn new(world: &World, from: ZoneId, to: ZoneId, looping: bool) -> Self {
        Self {
            waypoints: route(world, world.zone(from).center, &[ZoneId::HUB, to]),
            leg: 0,
            along: 0.0,
            looping,
        }
    }

    pub fn position(&self) -> Vec2 {
        match (self.waypoints.get(self.leg), self.waypoints.get(self.leg + 1)) {
            (Some(a), Some(b)) => {
                let len = a.distance(*b);
                if len <= f32::EPSILON {
                    *a
                } else {
                    a.lerp(*b, (self.along / len).clamp(0.0, 1.0))
                }
            }
            (Some(a), None) => *a,
            _ => Vec2::ZERO,
        }
    }

    pub fn finished(&self) -> bool {
        self.leg + 1 >= self.waypoints.len()
    }

    /// Moves `distance` units along the route. A looping walker turns around
    /// at the end instead of stopping.
    pub fn advance(&mut self, distance: f32) -> Vec2 {
        let mut left = distance.max(0.0);
        while left > 0.0 {
            if self.finished() {
                if !self.looping || self.waypoints.len() < 2 {
                    break;
                }
                self.waypoints.reverse();
                self.leg = 0;
                self.along = 0.0;
            }
            let a = self.waypoints[self.leg];
            let b = self.waypoints[self.leg + 1];
            let remaining = a.distance(b) - self.along;
            if left < remaining {
                self.along += left;
                left = 0.0;
            } else {
                left -= remaining.max(0.0);
                self.leg += 1;
                self.along = 0.0;
            }
        }
        self.position()
    }

    /// Re-anchors the route on a replaced world, keeping the current position
    /// as the start of the remaining walk. A walker already on its final leg
    /// heads straight for `to` instead of returning to the hub.
    pub fn rebase(&mut self, world: &World, to: ZoneId) {
        let here = self.position();
        let on_final_leg = self.leg + 2 >= self.waypoints.len();
        let via: &[ZoneId] = if on_final_leg { &[to] } else { &[ZoneId::HUB, to] };
        self.waypoints = route(world, here, via);
        self.leg = 0;
        self.along = 0.0;
    }
}

/// `start` followed by the centers of `via`, with repeated points collapsed.
fn route(world: &World, start: Vec2, via: &[ZoneId]) -> Vec<Vec2> {
    let mut waypoints = Vec::with_capacity(via.len() + 1);
    waypoints.push(start);
    for id in via {
        let p = world.zone(*id).center;
        if waypoints.last() != Some(&p) {
            waypoints.push(p);
        }
    }
    waypoints
}
