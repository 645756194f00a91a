//! Unit tests for eco-space.

use eco_core::{AgentId, Heading, Motion, Point2, PopulationKey, Projection};

use crate::{CollisionRouter, Direction, Space, TileGrid, TileRouter};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn grid(w: u32, h: u32) -> TileGrid {
    TileGrid::new(w, h).unwrap()
}

fn p(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

/// Space over an open `w × h` grid holding the given points, all in
/// population "P", with ids 0, 1, 2, ...
fn space_with(w: u32, h: u32, points: &[(f64, f64)]) -> Space {
    let mut space = Space::with_grid(grid(w, h));
    let key = PopulationKey::from("P");
    for (i, &(x, y)) in points.iter().enumerate() {
        space.insert(AgentId(i as u32), key.clone(), Projection::at(x, y)).unwrap();
    }
    space
}

// ── Tile grid ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tile_grid {
    use super::*;

    #[test]
    fn zero_sized_grid_rejected() {
        assert!(TileGrid::new(0, 3).is_err());
        assert!(TileGrid::new(3, 0).is_err());
    }

    #[test]
    fn contains_is_half_open() {
        let g = grid(2, 3);
        assert!(g.contains(p(0.0, 0.0)));
        assert!(g.contains(p(1.999, 2.999)));
        assert!(!g.contains(p(2.0, 1.0)));
        assert!(!g.contains(p(1.0, 3.0)));
        assert!(!g.contains(p(-0.001, 1.0)));
    }

    #[test]
    fn tile_coords_floor() {
        let g = grid(4, 4);
        assert_eq!(g.tile_coords(p(2.7, 0.1)), Some((2, 0)));
        assert_eq!(g.tile_coords(p(3.0, 3.0)), Some((3, 3)));
        assert_eq!(g.tile_coords(p(4.0, 0.5)), None);
    }

    #[test]
    fn border_walls_are_implicit() {
        let g = grid(3, 2);
        let corner = g.tile(0, 0).unwrap();
        assert!(corner.has_wall(Direction::North));
        assert!(corner.has_wall(Direction::West));
        assert!(!corner.has_wall(Direction::East));
        assert!(!corner.has_wall(Direction::South));

        let middle = g.tile(1, 1).unwrap();
        assert!(middle.has_wall(Direction::South));
        assert!(!middle.has_wall(Direction::North));
        assert_eq!(g.walled_tile_count(), 0);
    }

    #[test]
    fn single_tile_is_walled_on_all_sides() {
        let g = grid(1, 1);
        assert_eq!(g.walls(0, 0), crate::WallMask::ALL);
    }

    #[test]
    fn set_wall_updates_neighbour() {
        let mut g = grid(3, 3);
        g.set_wall(1, 1, Direction::East, true).unwrap();
        assert!(g.has_wall(1, 1, Direction::East));
        assert!(g.has_wall(2, 1, Direction::West));
        assert_eq!(g.walled_tile_count(), 2);

        g.set_wall(2, 1, Direction::West, false).unwrap();
        assert!(!g.has_wall(1, 1, Direction::East));
        assert_eq!(g.walled_tile_count(), 0);
    }

    #[test]
    fn border_wall_cannot_be_cleared() {
        let mut g = grid(2, 2);
        g.set_wall(0, 0, Direction::North, false).unwrap();
        assert!(g.has_wall(0, 0, Direction::North));
    }

    #[test]
    fn set_wall_out_of_bounds() {
        let mut g = grid(2, 2);
        assert!(g.set_wall(2, 0, Direction::East, true).is_err());
    }

    #[test]
    fn neighbour_at_edge_is_none() {
        let g = grid(2, 2);
        assert_eq!(g.neighbour(0, 0, Direction::North), None);
        assert_eq!(g.neighbour(0, 0, Direction::South), Some((0, 1)));
        assert_eq!(g.neighbour(1, 1, Direction::East), None);
    }

    #[test]
    fn direction_parse_and_opposite() {
        assert_eq!(Direction::parse("N"), Some(Direction::North));
        assert_eq!(Direction::parse(" west "), Some(Direction::West));
        assert_eq!(Direction::parse("up"), None);
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }
}

// ── Collision router ──────────────────────────────────────────────────────────

#[cfg(test)]
mod router {
    use super::*;

    #[test]
    fn same_point_is_free() {
        let r = TileRouter::new(grid(2, 2));
        let t = r.max_transition(p(0.5, 0.5), p(0.5, 0.5));
        assert_eq!(t.point, p(0.5, 0.5));
        assert!(!t.collided());
    }

    #[test]
    fn move_within_tile_is_free() {
        let r = TileRouter::new(grid(1, 1));
        let t = r.max_transition(p(0.2, 0.2), p(0.8, 0.7));
        assert_eq!(t.point, p(0.8, 0.7));
        assert!(!t.collided());
    }

    #[test]
    fn north_wall_stops_movement() {
        // 1×1 room: an agent at (0.5, 0.9) heading north by 1.0.
        let r = TileRouter::new(grid(1, 1));
        let start = Projection::at(0.5, 0.9);
        let (_, dest) = Motion::toward(start.orientation, Heading::NORTH, 1.0).apply(&start);
        let t = r.max_transition(start.position, dest);
        assert_eq!(t.collision, Some(Direction::North));
        assert!(t.point.y <= 0.9 + 1e-9);
        assert!(t.point.y < 1.0);
        assert!(t.point.y > 0.0);
        assert!(r.contains(t.point));
    }

    #[test]
    fn explicit_wall_between_tiles() {
        let mut g = grid(3, 1);
        g.set_wall(0, 0, Direction::East, true).unwrap();
        let r = TileRouter::new(g);
        let t = r.max_transition(p(0.5, 0.5), p(2.5, 0.5));
        assert_eq!(t.collision, Some(Direction::East));
        assert!(t.point.x < 1.0);
        assert!(t.point.x > 0.99);
        assert_eq!(r.grid().tile_coords(t.point), Some((0, 0)));
    }

    #[test]
    fn wall_seen_from_other_side() {
        let mut g = grid(3, 1);
        g.set_wall(0, 0, Direction::East, true).unwrap();
        let r = TileRouter::new(g);
        let t = r.max_transition(p(2.5, 0.5), p(0.2, 0.5));
        assert_eq!(t.collision, Some(Direction::West));
        assert_eq!(r.grid().tile_coords(t.point), Some((1, 0)));
    }

    #[test]
    fn open_diagonal_through_corners() {
        let r = TileRouter::new(grid(3, 3));
        let t = r.max_transition(p(0.5, 0.5), p(2.5, 2.5));
        assert_eq!(t.point, p(2.5, 2.5));
        assert!(!t.collided());
    }

    #[test]
    fn border_clips_long_move() {
        let r = TileRouter::new(grid(2, 1));
        let t = r.max_transition(p(0.5, 0.5), p(7.0, 0.5));
        assert_eq!(t.collision, Some(Direction::East));
        assert!(t.point.x < 2.0);
        assert!(r.contains(t.point));
    }

    #[test]
    fn corner_hit_prefers_first_edge_in_order() {
        // Moving north-west through the top-left corner of tile (1, 1),
        // which is walled on both edges; North is tested before West.
        let mut g = grid(2, 2);
        g.set_wall(1, 1, Direction::North, true).unwrap();
        g.set_wall(1, 1, Direction::West, true).unwrap();
        let r = TileRouter::new(g);
        let t = r.max_transition(p(1.5, 1.5), p(0.5, 0.5));
        assert_eq!(t.collision, Some(Direction::North));
        assert_eq!(r.grid().tile_coords(t.point), Some((1, 1)));
    }

    #[test]
    fn corner_hit_east_before_south() {
        let mut g = grid(2, 2);
        g.set_wall(0, 0, Direction::East, true).unwrap();
        let r = TileRouter::new(g);
        let t = r.max_transition(p(0.5, 0.5), p(1.5, 1.5));
        assert_eq!(t.collision, Some(Direction::East));
        assert_eq!(r.grid().tile_coords(t.point), Some((0, 0)));
    }

    #[test]
    fn corner_wall_on_current_tile_beats_later_wall_on_open_branch() {
        // North of (0, 2) is open but leads to a walled corner further on;
        // the East wall of (0, 2) at the first corner must stop the move.
        let mut g = grid(3, 3);
        g.set_wall(0, 2, Direction::East, true).unwrap();
        g.set_wall(1, 1, Direction::North, true).unwrap();
        g.set_wall(1, 1, Direction::East, true).unwrap();
        let r = TileRouter::new(g);
        let t = r.max_transition(p(0.5, 2.5), p(2.5, 0.5));
        assert_eq!(t.collision, Some(Direction::East));
        assert_eq!(r.grid().tile_coords(t.point), Some((0, 2)));
        assert!(t.point.distance(p(1.0, 2.0)) < 1e-9);
    }

    #[test]
    fn corner_blocked_by_diagonal_tile_walls() {
        // Both edges of (0, 0) are open, but the wall north of (1, 1) meets
        // the same corner.
        let mut g = grid(2, 2);
        g.set_wall(1, 1, Direction::North, true).unwrap();
        let r = TileRouter::new(g);
        let t = r.max_transition(p(0.5, 0.5), p(1.5, 1.5));
        assert!(t.collided());
        assert!(t.point.distance(p(1.0, 1.0)) < 1e-9);
        assert!(!r.is_visible(p(0.5, 0.5), p(1.5, 1.5)));
    }

    #[test]
    fn non_finite_destination_stays_at_origin() {
        let r = TileRouter::new(grid(3, 3));
        let origin = p(1.5, 1.5);
        for dest in [p(f64::NAN, 1.0), p(1.0, f64::INFINITY), p(f64::NEG_INFINITY, f64::NAN)] {
            let t = r.max_transition(origin, dest);
            assert_eq!(t.point, origin);
            assert!(!t.collided());
        }
    }

    #[test]
    fn line_of_sight() {
        let mut g = grid(3, 1);
        g.set_wall(1, 0, Direction::East, true).unwrap();
        let r = TileRouter::new(g);
        assert!(r.is_visible(p(0.5, 0.5), p(1.5, 0.5)));
        assert!(!r.is_visible(p(0.5, 0.5), p(2.5, 0.5)));
    }

    #[test]
    fn origin_outside_grid_stays_put() {
        let r = TileRouter::new(grid(2, 2));
        let t = r.max_transition(p(-1.0, 0.5), p(1.0, 0.5));
        assert_eq!(t.point, p(-1.0, 0.5));
    }
}

// ── Spatial index ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod spatial_index {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn rebuilds_once_per_invalidation() {
        let space = space_with(10, 10, &[(1.0, 1.0), (2.0, 2.0), (8.0, 8.0)]);
        assert!(space.index().is_outdated());
        assert_eq!(space.index().rebuild_count(), 0);

        let hits = space.find_within_radius(p(1.5, 1.5), 1.0);
        assert_eq!(hits.len(), 2);
        assert!(!space.index().is_outdated());
        space.find_within_radius(p(8.0, 8.0), 0.5);
        space.nearest(p(0.0, 0.0), 1);
        assert_eq!(space.index().rebuild_count(), 1);
    }

    #[test]
    fn mutation_invalidates() {
        let mut space = space_with(10, 10, &[(1.0, 1.0)]);
        space.find_within_radius(p(1.0, 1.0), 1.0);
        space.move_object(AgentId(0), Motion::new(0.0, 5.0)).unwrap();
        assert!(space.index().is_outdated());
        assert_eq!(space.find_within_radius(p(1.0, 1.0), 1.0), Vec::<AgentId>::new());
        assert_eq!(space.find_within_radius(p(6.0, 1.0), 0.1), vec![AgentId(0)]);
        assert_eq!(space.index().rebuild_count(), 2);
    }

    #[test]
    fn still_motion_keeps_index_fresh() {
        let mut space = space_with(10, 10, &[(1.0, 1.0)]);
        space.find_within_radius(p(1.0, 1.0), 1.0);
        space.move_object(AgentId(0), Motion::NONE).unwrap();
        assert!(!space.index().is_outdated());
    }

    #[test]
    fn concurrent_queries_rebuild_once() {
        let points: Vec<(f64, f64)> = (0..200).map(|i| ((i % 20) as f64 + 0.5, (i / 20) as f64 + 0.5)).collect();
        let space = space_with(20, 10, &points);
        let counts: Vec<usize> = (0..64)
            .into_par_iter()
            .map(|i| space.find_within_radius(p((i % 20) as f64 + 0.5, 5.5), 1.0).len())
            .collect();
        assert!(counts.iter().all(|&c| c >= 3));
        assert_eq!(space.index().rebuild_count(), 1);
    }

    #[test]
    fn radius_is_inclusive() {
        let space = space_with(10, 10, &[(1.0, 1.0), (4.0, 5.0)]);
        let hits = space.find_within_radius(p(1.0, 1.0), 5.0);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn negative_radius_is_empty() {
        let space = space_with(10, 10, &[(1.0, 1.0)]);
        assert!(space.find_within_radius(p(1.0, 1.0), -1.0).is_empty());
        assert!(space.find_within_radius(p(1.0, 1.0), f64::NAN).is_empty());
    }

    #[test]
    fn nearest_sorted_by_distance() {
        let space = space_with(10, 10, &[(5.0, 5.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(space.nearest(p(0.0, 0.0), 2), vec![AgentId(1), AgentId(2)]);
        assert_eq!(space.nearest(p(0.0, 0.0), 10).len(), 3);
    }
}

// ── Positioned-object store ───────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use super::*;
    use crate::SpaceError;

    #[test]
    fn duplicate_insert_rejected() {
        let mut space = space_with(5, 5, &[(1.0, 1.0)]);
        let err = space.insert(AgentId(0), PopulationKey::from("P"), Projection::at(2.0, 2.0));
        assert!(matches!(err, Err(SpaceError::DuplicateObject(AgentId(0)))));
        assert_eq!(space.count(), 1);
    }

    #[test]
    fn out_of_bounds_insert_rejected() {
        let mut space = space_with(5, 5, &[]);
        let err = space.insert(AgentId(0), PopulationKey::from("P"), Projection::at(5.0, 1.0));
        assert!(matches!(err, Err(SpaceError::OutOfBounds { .. })));
        assert!(space.is_empty());
        assert_eq!(space.count_population(&PopulationKey::from("P")), 0);
    }

    #[test]
    fn remove_keeps_slots_consistent() {
        let mut space = space_with(5, 5, &[(0.5, 0.5), (1.5, 1.5), (2.5, 2.5)]);
        let removed = space.remove(AgentId(0)).unwrap();
        assert_eq!(removed.position(), p(0.5, 0.5));
        assert_eq!(space.projection(AgentId(2)).unwrap().position, p(2.5, 2.5));
        assert_eq!(space.projection(AgentId(1)).unwrap().position, p(1.5, 1.5));
        assert!(!space.contains(AgentId(0)));
        assert!(matches!(space.remove(AgentId(0)), Err(SpaceError::UnknownObject(_))));
    }

    #[test]
    fn remove_if_single_pass() {
        let mut space = space_with(5, 5, &[(0.5, 0.5), (1.5, 1.5), (2.5, 2.5), (3.5, 3.5)]);
        space.find_within_radius(p(0.0, 0.0), 1.0);
        let before = space.index().rebuild_count();

        let removed = space.remove_if(|e| e.id.0 % 2 == 0);
        assert_eq!(removed, 2);
        assert_eq!(space.count(), 2);
        assert_eq!(space.count_population(&PopulationKey::from("P")), 2);
        assert_eq!(space.projection(AgentId(3)).unwrap().position, p(3.5, 3.5));

        let all = space.find_within_radius(p(2.5, 2.5), 10.0);
        assert_eq!(all.len(), 2);
        assert_eq!(space.index().rebuild_count(), before + 1);
    }

    #[test]
    fn remove_if_nothing_matched_keeps_index() {
        let mut space = space_with(5, 5, &[(0.5, 0.5)]);
        space.find_within_radius(p(0.0, 0.0), 1.0);
        assert_eq!(space.remove_if(|_| false), 0);
        assert!(!space.index().is_outdated());
    }

    #[test]
    fn population_membership() {
        let mut space = Space::with_grid(grid(5, 5));
        let prey = PopulationKey::from("prey");
        let wolf = PopulationKey::from("wolf");
        space.insert(AgentId(3), prey.clone(), Projection::at(1.0, 1.0)).unwrap();
        space.insert(AgentId(1), prey.clone(), Projection::at(2.0, 1.0)).unwrap();
        space.insert(AgentId(2), wolf.clone(), Projection::at(3.0, 1.0)).unwrap();

        assert_eq!(space.count_population(&prey), 2);
        assert_eq!(space.count_population(&wolf), 1);
        assert_eq!(space.members(&prey).collect::<Vec<_>>(), vec![AgentId(1), AgentId(3)]);
        assert_eq!(space.populations().total(), 3);

        space.remove(AgentId(2)).unwrap();
        assert_eq!(space.count_population(&wolf), 0);
        assert_eq!(space.populations().populations().count(), 1);
    }

    #[test]
    fn move_object_sets_collided_flag() {
        let mut space = space_with(2, 2, &[(0.5, 0.5)]);
        let west = Motion::toward(Heading::EAST, Heading::WEST, 3.0);
        let proj = space.move_object(AgentId(0), west).unwrap();
        assert!(proj.collided);
        assert!(proj.position.x > 0.0 && proj.position.x < 0.5);

        let east = Motion::toward(proj.orientation, Heading::EAST, 0.5);
        let proj = space.move_object(AgentId(0), east).unwrap();
        assert!(!proj.collided);
    }

    #[test]
    fn literal_non_finite_motion_leaves_object_in_place() {
        let mut space = space_with(3, 3, &[(1.5, 1.5), (0.5, 0.5)]);
        let runaway = Motion { rotation: 0.0, translation: f64::INFINITY };
        let proj = space.move_object(AgentId(0), runaway).unwrap();
        assert_eq!(proj.position, p(1.5, 1.5));
        assert!(!proj.collided);
        assert!(space.router().contains(proj.position));

        space.move_all(1, |_| Some(Motion { rotation: f64::NAN, translation: f64::NAN }));
        assert_eq!(space.projection(AgentId(0)).unwrap().position, p(1.5, 1.5));
        assert_eq!(space.projection(AgentId(1)).unwrap().position, p(0.5, 0.5));
        assert_eq!(space.find_within_radius(p(1.5, 1.5), 0.1), vec![AgentId(0)]);
    }

    #[test]
    fn move_all_in_chunks() {
        let points: Vec<(f64, f64)> = (0..7).map(|i| (0.5, i as f64 + 0.5)).collect();
        let mut space = space_with(10, 7, &points);
        let moved = space.move_all(2, |id| {
            if id.0 == 6 { None } else { Some(Motion::new(0.0, 1.0)) }
        });
        assert_eq!(moved, 6);
        for i in 0..6 {
            let pos = space.projection(AgentId(i)).unwrap().position;
            assert!((pos.x - 1.5).abs() < 1e-9);
        }
        assert_eq!(space.projection(AgentId(6)).unwrap().position, p(0.5, 6.5));
        assert!(space.index().is_outdated());
    }

    #[test]
    fn neighbours_exclude_self() {
        let space = space_with(5, 5, &[(1.0, 1.0), (1.5, 1.0), (4.0, 4.0)]);
        let ids: Vec<AgentId> = space.neighbours(AgentId(0), 1.0).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![AgentId(1)]);
        assert!(space.neighbours(AgentId(42), 1.0).is_empty());
    }

    #[test]
    fn visible_neighbours_respect_walls() {
        let mut g = grid(3, 1);
        g.set_wall(0, 0, Direction::East, true).unwrap();
        let mut space = Space::with_grid(g);
        let key = PopulationKey::from("P");
        space.insert(AgentId(0), key.clone(), Projection::at(0.8, 0.5)).unwrap();
        space.insert(AgentId(1), key.clone(), Projection::at(0.6, 0.5)).unwrap();
        space.insert(AgentId(2), key, Projection::at(1.2, 0.5)).unwrap();

        assert_eq!(space.neighbours(AgentId(0), 1.0).len(), 2);
        let visible: Vec<AgentId> = space.visible_neighbours(AgentId(0), 1.0).iter().map(|e| e.id).collect();
        assert_eq!(visible, vec![AgentId(1)]);
    }

    #[test]
    fn grid_is_exposed() {
        let space = space_with(4, 3, &[]);
        let g = space.grid().unwrap();
        assert_eq!((g.width(), g.height()), (4, 3));
    }
}

// ── Wall loader ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::{SpaceError, WallSpec, load_walls_reader};

    #[test]
    fn parses_short_and_long_directions() {
        let csv = "x,y,direction\n0,0,E\n1,2,south\n";
        let walls = load_walls_reader(Cursor::new(csv)).unwrap();
        assert_eq!(
            walls,
            vec![WallSpec::new(0, 0, Direction::East), WallSpec::new(1, 2, Direction::South)]
        );
    }

    #[test]
    fn rejects_bad_direction() {
        let csv = "x,y,direction\n0,0,up\n";
        assert!(matches!(load_walls_reader(Cursor::new(csv)), Err(SpaceError::Parse(_))));
    }

    #[test]
    fn rejects_bad_coordinates() {
        let csv = "x,y,direction\n-1,0,N\n";
        assert!(matches!(load_walls_reader(Cursor::new(csv)), Err(SpaceError::Parse(_))));
    }

    #[test]
    fn apply_walls_to_grid() {
        let csv = "x,y,direction\n0,0,E\n";
        let walls = load_walls_reader(Cursor::new(csv)).unwrap();
        let mut g = grid(2, 1);
        g.apply_walls(&walls).unwrap();
        assert!(g.has_wall(1, 0, Direction::West));
        assert!(g.apply_walls(&[WallSpec::new(5, 0, Direction::North)]).is_err());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn radius_query_matches_brute_force(
            points in prop::collection::vec((0.0f64..10.0, 0.0f64..10.0), 1..60),
            removals in prop::collection::vec(0usize..60, 0..10),
            steps in prop::collection::vec((-3.2f64..3.2, 0.0f64..3.0), 0..60),
            center in (0.0f64..10.0, 0.0f64..10.0),
            radius in 0.0f64..6.0,
        ) {
            let mut space = space_with(10, 10, &points);
            for r in removals {
                let _ = space.remove(AgentId(r as u32));
            }
            for (i, &(rot, dist)) in steps.iter().enumerate() {
                let _ = space.move_object(AgentId(i as u32), Motion::new(rot, dist));
            }

            let c = p(center.0, center.1);
            let mut got = space.find_within_radius(c, radius);
            got.sort();
            let mut want: Vec<AgentId> = space
                .entries()
                .iter()
                .filter(|e| e.position().distance_2(c) <= radius * radius)
                .map(|e| e.id)
                .collect();
            want.sort();
            prop_assert_eq!(got, want);
        }

        #[test]
        fn moves_stay_inside_the_grid(
            start in (0.0f64..6.0, 0.0f64..4.0),
            rot in -3.2f64..3.2,
            dist in 0.0f64..20.0,
        ) {
            let mut g = grid(6, 4);
            g.set_wall(2, 1, Direction::East, true).unwrap();
            g.set_wall(3, 2, Direction::North, true).unwrap();
            let mut space = Space::with_grid(g);
            space.insert(AgentId(0), PopulationKey::from("P"), Projection::at(start.0, start.1)).unwrap();
            let proj = space.move_object(AgentId(0), Motion::new(rot, dist)).unwrap();
            prop_assert!(space.router().contains(proj.position));
        }

        /// Tile-centre to tile-centre moves along the eight compass lines,
        /// checked against a tile-by-tile walk: a straight step needs its
        /// edge open, a diagonal step needs all four edges at the corner open.
        #[test]
        fn compass_moves_stop_at_first_closed_crossing(
            walls in prop::collection::vec((0u32..6, 0u32..6, 0usize..4), 0..24),
            start in (0u32..6, 0u32..6),
            (sx, sy) in (-1i64..=1, -1i64..=1).prop_filter("must move", |s| *s != (0, 0)),
            k in 1i64..6,
        ) {
            let mut g = grid(6, 6);
            for &(x, y, d) in &walls {
                g.set_wall(x, y, Direction::ALL[d], true).unwrap();
            }
            let x_edge = match sx { 1 => Some(Direction::East), -1 => Some(Direction::West), _ => None };
            let y_edge = match sy { 1 => Some(Direction::South), -1 => Some(Direction::North), _ => None };

            let centre = |x: i64, y: i64| p(x as f64 + 0.5, y as f64 + 0.5);
            let closed = |x: i64, y: i64, dir: Direction| g.has_wall(x as u32, y as u32, dir);
            let (x0, y0) = (start.0 as i64, start.1 as i64);

            let mut stop = None;
            for i in 0..k {
                let (x, y) = (x0 + i * sx, y0 + i * sy);
                let blocked = match (x_edge, y_edge) {
                    (Some(xe), Some(ye)) => {
                        let (dx, dy) = (x + sx, y + sy);
                        let diagonal_in_grid = dx >= 0 && dy >= 0 && dx < 6 && dy < 6;
                        closed(x, y, xe)
                            || closed(x, y, ye)
                            || (diagonal_in_grid
                                && (closed(dx, dy, xe.opposite()) || closed(dx, dy, ye.opposite())))
                    }
                    (Some(e), None) | (None, Some(e)) => closed(x, y, e),
                    (None, None) => unreachable!(),
                };
                if blocked {
                    let c = centre(x, y);
                    stop = Some(p(c.x + 0.5 * sx as f64, c.y + 0.5 * sy as f64));
                    break;
                }
            }

            let r = TileRouter::new(g.clone());
            let dest = centre(x0 + k * sx, y0 + k * sy);
            let t = r.max_transition(centre(x0, y0), dest);
            match stop {
                Some(crossing) => {
                    prop_assert!(t.collided());
                    prop_assert!(t.point.distance(crossing) < 1e-9, "{:?} vs {:?}", t.point, crossing);
                    prop_assert!(r.contains(t.point));
                }
                None => {
                    prop_assert!(!t.collided());
                    prop_assert_eq!(t.point, dest);
                }
            }
        }
    }
}
