use proptest::prelude::*;
use zion_chunk::{Decoration, DecorationGenerator, ScatterGenerator, TileBuf, TileBuildError, build_tile};
use zion_world::{TileCoord, World, WorldConfig};

fn world() -> World {
    World::new(WorldConfig::default()).unwrap()
}

fn generators() -> Vec<Box<dyn DecorationGenerator>> {
    vec![Box::new(ScatterGenerator)]
}

fn tile_coord() -> impl Strategy<Value = TileCoord> {
    (-40i32..=40, -40i32..=40).prop_map(|(cx, cz)| TileCoord::new(cx, cz))
}

struct Failing;

impl DecorationGenerator for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn generate(
        &self,
        _world: &World,
        coord: TileCoord,
        _out: &mut Vec<Decoration>,
    ) -> Result<(), TileBuildError> {
        Err(TileBuildError::Generator {
            coord,
            generator: self.name().to_string(),
            reason: "always fails".to_string(),
        })
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // neighbouring tiles agree bit for bit along their shared edge
    #[test]
    fn shared_edges_match(coord in tile_coord()) {
        let w = world();
        let a = TileBuf::sample(&w, coord).unwrap();
        let east = TileBuf::sample(&w, coord.offset(1, 0)).unwrap();
        let south = TileBuf::sample(&w, coord.offset(0, 1)).unwrap();
        let n = a.resolution;
        for k in 0..n {
            prop_assert_eq!(a.height_local(n - 1, k).to_bits(), east.height_local(0, k).to_bits());
            prop_assert_eq!(a.height_local(k, n - 1).to_bits(), south.height_local(k, 0).to_bits());
        }
    }

    // every sample index is unique and in range
    #[test]
    fn idx_is_unique_and_in_range(coord in tile_coord()) {
        let w = world();
        let buf = TileBuf::sample(&w, coord).unwrap();
        let n = buf.resolution;
        let mut seen = vec![false; n * n];
        for j in 0..n {
            for i in 0..n {
                let k = buf.idx(i, j);
                prop_assert!(k < n * n);
                prop_assert!(!seen[k]);
                seen[k] = true;
            }
        }
        prop_assert!(seen.into_iter().all(|b| b));
    }

    // rebuilding a tile yields identical geometry and decorations
    #[test]
    fn rebuilds_are_identical(coord in tile_coord()) {
        let w = world();
        let gens = generators();
        let a = build_tile(&w, coord, &gens).unwrap();
        let b = build_tile(&w, coord, &gens).unwrap();
        prop_assert_eq!(&a.geometry.heights, &b.geometry.heights);
        prop_assert_eq!(&a.decorations, &b.decorations);
    }
}

#[test]
fn failing_generator_aborts_the_build() {
    let w = world();
    let gens: Vec<Box<dyn DecorationGenerator>> = vec![Box::new(ScatterGenerator), Box::new(Failing)];
    let coord = TileCoord::new(-4, 1);
    let err = build_tile(&w, coord, &gens).unwrap_err();
    assert_eq!(err.coord(), coord);
    assert!(err.to_string().contains("failing"));
}

#[test]
fn independent_worlds_build_identical_tiles() {
    let gens = generators();
    let a = world();
    let b = world();
    for coord in TileCoord::new(0, 0).square_neighborhood(2) {
        let ta = build_tile(&a, coord, &gens).unwrap();
        let tb = build_tile(&b, coord, &gens).unwrap();
        assert_eq!(ta.geometry.heights, tb.geometry.heights);
        assert_eq!(ta.decorations, tb.decorations);
        assert!(ta.footprint_bytes() > 0);
    }
}
