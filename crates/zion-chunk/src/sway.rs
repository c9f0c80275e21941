//! Wind sway for plant decorations.

use std::f32::consts::TAU;

use crate::decor::{Decoration, DecorationKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwayState {
    pub kind: DecorationKind,
    pub slot: u32,
    pub phase: f32,
    /// Radians of phase per second.
    pub speed: f32,
    /// Peak lean in radians.
    pub amplitude: f32,
    /// Current lean in radians.
    pub angle: f32,
}

impl SwayState {
    /// `None` for kinds that do not sway.
    pub fn for_decoration(decoration: &Decoration) -> Option<Self> {
        if !decoration.kind.sways() {
            return None;
        }
        let (speed, amplitude) = match decoration.kind {
            DecorationKind::Oak => (0.9, 0.03),
            DecorationKind::Pine => (0.7, 0.02),
            DecorationKind::Bush => (1.4, 0.05),
            DecorationKind::FlowerPatch => (2.2, 0.12),
            DecorationKind::Reeds => (1.8, 0.15),
            _ => (0.0, 0.0),
        };
        // rotation already carries a per-slot random angle in [0, TAU)
        let phase = decoration.rotation;
        Some(Self {
            kind: decoration.kind,
            slot: decoration.slot,
            phase,
            speed: speed / decoration.scale.max(0.25).sqrt(),
            amplitude,
            angle: amplitude * phase.sin(),
        })
    }
}

/// Sway records for every swaying decoration in `decorations`.
pub fn sway_states(decorations: &[Decoration]) -> Vec<SwayState> {
    decorations
        .iter()
        .filter_map(SwayState::for_decoration)
        .collect()
}

/// Steps every record by `dt` seconds. Negative or non-finite steps are ignored.
pub fn advance_sway(states: &mut [SwayState], dt: f32) {
    if !(dt.is_finite() && dt > 0.0) {
        return;
    }
    for s in states {
        s.phase = (s.phase + s.speed * dt).rem_euclid(TAU);
        s.angle = s.amplitude * s.phase.sin();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deco(kind: DecorationKind, rotation: f32) -> Decoration {
        Decoration {
            kind,
            position: [0.0, 0.0, 0.0],
            rotation,
            scale: 1.0,
            slot: 3,
        }
    }

    #[test]
    fn props_do_not_sway() {
        assert!(SwayState::for_decoration(&deco(DecorationKind::Rock, 1.0)).is_none());
        assert!(SwayState::for_decoration(&deco(DecorationKind::Lantern, 1.0)).is_none());
        let all = [
            deco(DecorationKind::Crate, 0.0),
            deco(DecorationKind::Reeds, 0.5),
            deco(DecorationKind::Oak, 2.0),
        ];
        assert_eq!(sway_states(&all).len(), 2);
    }

    #[test]
    fn advance_keeps_phase_wrapped_and_angle_bounded() {
        let mut states = sway_states(&[deco(DecorationKind::Reeds, 6.0), deco(DecorationKind::Pine, 0.1)]);
        for _ in 0..1000 {
            advance_sway(&mut states, 0.05);
            for s in &states {
                assert!((0.0..TAU).contains(&s.phase));
                assert!(s.angle.abs() <= s.amplitude + 1e-6);
            }
        }
    }

    #[test]
    fn advance_is_deterministic_and_ignores_bad_steps() {
        let mut a = sway_states(&[deco(DecorationKind::Bush, 1.25)]);
        let mut b = a.clone();
        advance_sway(&mut a, 0.016);
        advance_sway(&mut b, 0.016);
        assert_eq!(a, b);
        let before = a.clone();
        advance_sway(&mut a, f32::NAN);
        advance_sway(&mut a, -1.0);
        assert_eq!(a, before);
    }
}
