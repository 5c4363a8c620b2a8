use bevy::prelude::*;

use super::*;

fn field() -> PlayField {
    PlayField::new(800.0, 600.0)
}

#[test]
fn screen_and_world_round_trip_through_the_centre() {
    let f = field();
    assert_eq!(f.to_world(Vec2::new(400.0, 300.0)), Vec2::ZERO);
    assert_eq!(f.to_world(Vec2::ZERO), Vec2::new(-400.0, 300.0));
    assert_eq!(f.to_screen(Vec2::new(400.0, -300.0)), Vec2::new(800.0, 600.0));
    assert_eq!(f.velocity_to_world(Vec2::new(-130.0, 70.0)), Vec2::new(-130.0, -70.0));
}

#[test]
fn hit_box_rect_follows_the_sprite() {
    let f = field();
    let size = Vec2::new(100.0, 70.0);
    let top_left = Vec2::new(200.0, 100.0);
    let centre = f.center_of(top_left, size);

    let full = HitBox::full(size).screen_rect(centre, &f);
    assert_eq!(full, ScreenRect::from_top_left(top_left, size));

    // 80% box pushed toward the bottom of the sprite.
    let cannon = HitBox::scaled(size, Vec2::splat(0.8), Vec2::new(0.1, 0.2)).screen_rect(centre, &f);
    assert!((cannon.left - 210.0).abs() < 1e-3);
    assert!((cannon.top - 114.0).abs() < 1e-3);
    assert!((cannon.right - 290.0).abs() < 1e-3);
    assert!((cannon.bottom - 170.0).abs() < 1e-3);
}

#[test]
fn overlap_is_strict() {
    let a = ScreenRect::from_top_left(Vec2::ZERO, Vec2::splat(10.0));
    let touching = ScreenRect::from_top_left(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
    let inside = ScreenRect::from_top_left(Vec2::new(9.0, 9.0), Vec2::splat(10.0));
    assert!(!a.overlaps(&touching));
    assert!(a.overlaps(&inside));
    assert!(a.overlaps_horizontally(&inside));
}

#[test]
fn out_of_bounds_only_checks_enabled_edges() {
    let f = field();
    let left_of_screen = ScreenRect::from_top_left(Vec2::new(-60.0, 100.0), Vec2::splat(50.0));
    let right_of_screen = ScreenRect::from_top_left(Vec2::new(801.0, 100.0), Vec2::splat(50.0));
    let above = ScreenRect::from_top_left(Vec2::new(100.0, -60.0), Vec2::splat(50.0));
    let below = ScreenRect::from_top_left(Vec2::new(100.0, 601.0), Vec2::splat(50.0));
    let partly_off = ScreenRect::from_top_left(Vec2::new(-20.0, 100.0), Vec2::splat(50.0));

    let only_left = OutOfBounds { left: true, ..default() };
    assert!(only_left.is_out(&left_of_screen, &f));
    assert!(!only_left.is_out(&right_of_screen, &f));
    assert!(!only_left.is_out(&partly_off, &f));

    let all = OutOfBounds { left: true, right: true, top: true, bottom: true };
    for r in [left_of_screen, right_of_screen, above, below] {
        assert!(all.is_out(&r, &f));
    }

    let only_bottom = OutOfBounds { bottom: true, ..default() };
    assert!(only_bottom.is_out(&below, &f));
    assert!(!only_bottom.is_out(&above, &f));
}
