use std::f64::consts::{FRAC_PI_2, PI, TAU};

use grid_raycaster::movement::{Intent, MoveOutcome, attempt_move};
use grid_raycaster::{Config, Framebuffer, GridMap, Player, Raycaster, Renderer, TextureAtlas};
use proptest::prelude::*;
use tracing::Level;

const CELL: f64 = 64.0;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

/// `n x n` map whose outer ring is wall 1 and interior is open.
fn bordered(n: usize) -> GridMap {
    let rows = (0..n)
        .map(|y| {
            (0..n)
                .map(|x| u32::from(x == 0 || y == 0 || x == n - 1 || y == n - 1))
                .collect()
        })
        .collect();
    GridMap::from_rows(rows).unwrap()
}

fn open(n: usize) -> GridMap {
    GridMap::from_rows(vec![vec![0; n]; n]).unwrap()
}

/// Interior position of a bordered map, keeping one pixel off the walls.
fn interior() -> impl Strategy<Value = (usize, f64, f64)> {
    (3usize..12).prop_flat_map(|n| {
        let hi = (n - 1) as f64 * CELL - 1.0;
        (Just(n), CELL + 1.0..hi, CELL + 1.0..hi)
    })
}

proptest! {
    #[test]
    fn rays_in_an_empty_room_hit_the_border(
        (n, x, y) in interior(),
        angle in 0.0..TAU,
    ) {
        let map = bordered(n);
        let caster = Raycaster::new(&Config::default());
        let player = Player::new(x, y, angle);

        if let Some(v) = caster.cast_vertical(&player, angle, &map) {
            prop_assert!(v.distance.is_finite());
        }
        if let Some(h) = caster.cast_horizontal(&player, angle, &map) {
            prop_assert!(h.distance.is_finite());
        }

        let hit = caster.cast(&player, angle, &map).record;
        let (lo, hi) = (CELL, (n - 1) as f64 * CELL);
        let eps = 1e-6;
        prop_assert_eq!(hit.wall_id, 1);
        prop_assert!(hit.distance.is_finite());
        prop_assert!(hit.hit_x >= lo - eps && hit.hit_x <= hi + eps, "{:?}", hit);
        prop_assert!(hit.hit_y >= lo - eps && hit.hit_y <= hi + eps, "{:?}", hit);
        let on_border = [hit.hit_x - lo, hi - hit.hit_x, hit.hit_y - lo, hi - hit.hit_y]
            .iter()
            .any(|d| d.abs() < eps);
        prop_assert!(on_border, "{:?}", hit);
    }

    #[test]
    fn axis_rays_match_straight_line_distance((n, x, y) in interior()) {
        let map = bordered(n);
        let caster = Raycaster::new(&Config::default());
        let player = Player::new(x, y, 0.0);
        let far = (n - 1) as f64 * CELL;
        let expected = [
            (0.0, far - x),
            (FRAC_PI_2, far - y),
            (PI, x - CELL),
            (3.0 * FRAC_PI_2, y - CELL),
        ];
        for (angle, want) in expected {
            let hit = caster.cast(&player, angle, &map);
            prop_assert!(
                (hit.record.distance - want).abs() < 1e-6,
                "angle {}: got {} want {}", angle, hit.record.distance, want
            );
        }
    }

    #[test]
    fn fisheye_correction_never_lengthens(
        (n, x, y) in interior(),
        angle in 0.0..TAU,
    ) {
        let config = Config::default().with_screen(64, 40);
        let renderer = Renderer::new(config);
        let atlas = TextureAtlas::procedural(64, 1);
        let map = bordered(n);
        let player = Player::new(x, y, angle);
        for col in 0..64 {
            let column = renderer.project_column(&player, &map, &atlas, col);
            prop_assert!(column.corrected_distance <= column.hit.record.distance);
        }
        let centre = renderer.project_column(&player, &map, &atlas, 32);
        prop_assert_eq!(centre.corrected_distance, centre.hit.record.distance);
    }

    // Candidates reach from the near edge up to 510, leaving the x + 1 and
    // y + 1 samples inside the 512-pixel map.
    #[test]
    fn open_map_accepts_in_bounds_moves(
        x in 16.0f64..494.0,
        y in 16.0f64..494.0,
        angle in 0.0..TAU,
        forward in any::<bool>(),
    ) {
        let config = Config::default();
        let map = open(8);
        let mut player = Player::new(x, y, angle);
        let intent = if forward { Intent::Forward } else { Intent::Backward };
        prop_assert_eq!(attempt_move(&mut player, &map, intent, &config), MoveOutcome::Moved);
    }

    #[test]
    fn blocked_moves_leave_player_untouched(
        cells in prop::collection::vec(prop::bool::weighted(0.3), 36),
        x in 0.0f64..384.0,
        y in 0.0f64..384.0,
        angle in 0.0..TAU,
    ) {
        let config = Config::default();
        let rows = cells
            .chunks(6)
            .map(|r| r.iter().map(|&wall| u32::from(wall)).collect())
            .collect();
        let map = GridMap::from_rows(rows).unwrap();
        let mut player = Player::new(x, y, angle);
        let before = player;

        let outcome = attempt_move(&mut player, &map, Intent::Forward, &config);

        let cx = x + config.move_speed * angle.cos();
        let cy = y + config.move_speed * angle.sin();
        let samples = [
            (cx, cy), (cx - 1.0, cy), (cx, cy - 1.0), (cx - 1.0, cy - 1.0),
            (cx + 1.0, cy), (cx, cy + 1.0), (cx + 1.0, cy + 1.0),
        ];
        let any_solid = samples
            .iter()
            .any(|&(sx, sy)| map.is_solid((sx / CELL) as i64, (sy / CELL) as i64));

        if any_solid {
            prop_assert_eq!(outcome, MoveOutcome::Blocked);
            prop_assert_eq!(player, before);
        } else {
            prop_assert_eq!(outcome, MoveOutcome::Moved);
            prop_assert_eq!((player.x, player.y), (cx, cy));
        }
    }
}

#[test]
fn rendering_twice_is_bit_identical() {
    init_tracing();
    let config = Config::default().with_screen(160, 120);
    let renderer = Renderer::new(config);
    let atlas = TextureAtlas::procedural(64, 8);
    let map = GridMap::demo();
    let player = Player::new(300.0, 200.0, 0.7);

    let mut first = Framebuffer::new(160, 120);
    let mut second = Framebuffer::new(160, 120);
    renderer.render_frame(&player, &map, &atlas, &mut first);
    renderer.render_frame(&player, &map, &atlas, &mut second);
    assert_eq!(first, second);

    // Re-rendering into a dirty buffer gives the same image too
    renderer.render_frame(&player, &map, &atlas, &mut first);
    assert_eq!(first, second);
}
