use super::*;

#[test]
fn weighted_index_follows_the_weights() {
    let mut rng = LevelRng::seeded(5);
    let mut hits = [0usize; 2];
    for _ in 0..2000 {
        if let Some(i) = rng.weighted_index(&[0.9, 0.1]) {
            hits[i] += 1;
        }
    }
    assert_eq!(hits[0] + hits[1], 2000);
    assert!(hits[0] > hits[1] * 4, "{hits:?}");
}

#[test]
fn nothing_to_draw_from_is_none() {
    let mut rng = LevelRng::seeded(5);
    assert_eq!(rng.weighted_index(&[]), None);
    assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
    assert_eq!(rng.weighted_index(&[1.0, -1.0]), None);
}

#[test]
fn zero_weights_are_never_picked() {
    let mut rng = LevelRng::seeded(11);
    for _ in 0..500 {
        let i = rng.weighted_index(&[0.5, 0.0, 0.5]);
        assert_ne!(i, Some(1));
        assert!(i.is_some());
    }
}

#[test]
fn seeded_rng_is_repeatable() {
    let mut a = LevelRng::seeded(42);
    let mut b = LevelRng::seeded(42);
    for _ in 0..32 {
        assert_eq!(a.index(15), b.index(15));
        assert_eq!(a.int_inclusive(90, 450), b.int_inclusive(90, 450));
    }
}

#[test]
fn ranges_stay_inside_bounds() {
    let mut rng = LevelRng::seeded(3);
    for _ in 0..1000 {
        let f = rng.range_f32(0.1, 0.9);
        assert!((0.1..0.9).contains(&f));
        let n = rng.int_inclusive(90, 450);
        assert!((90..=450).contains(&n));
        assert!(rng.sign().abs() == 1.0);
    }
    assert_eq!(rng.range_f32(5.0, 5.0), 5.0);
    assert_eq!(rng.int_inclusive(7, 3), 7);
}
