use gcodetools_core::{ArcPlane, Axis, Config, CoordSystem, Vector};
use proptest::prelude::*;

fn params(pairs: &[(Axis, f64)]) -> Vector {
    pairs
        .iter()
        .fold(Vector::new(), |v, &(axis, value)| v.with(axis, value))
}

#[test]
fn test_absolute_move_keeps_untouched_axes() {
    let mut cs = CoordSystem::new(&Config::default());
    let p = cs.apply_move(&params(&[(Axis::X, 10.0), (Axis::Y, 10.0), (Axis::F, 600.0)]));
    assert_eq!(p, Vector::from_values(10.0, 10.0, 0.0, 0.0, 600.0));

    let p = cs.apply_move(&params(&[(Axis::X, 20.0)]));
    assert_eq!(p, Vector::from_values(20.0, 10.0, 0.0, 0.0, 600.0));
}

#[test]
fn test_relative_moves_accumulate() {
    let mut cs = CoordSystem::new(&Config::default());
    cs.set_abs_xyz(false);
    assert_eq!(cs.apply_move(&params(&[(Axis::X, 5.0)])).x, Some(5.0));
    assert_eq!(cs.apply_move(&params(&[(Axis::X, 5.0)])).x, Some(10.0));
}

#[test]
fn test_absolute_extrusion_reports_delta() {
    let mut cs = CoordSystem::new(&Config::default());
    assert_eq!(cs.apply_move(&params(&[(Axis::E, 1.5)])).e, Some(1.5));
    assert_eq!(cs.apply_move(&params(&[(Axis::E, 4.0)])).e, Some(2.5));
    assert_eq!(cs.apply_move(&params(&[(Axis::X, 1.0)])).e, Some(0.0));
    assert_eq!(cs.e_total(), 4.0);
}

#[test]
fn test_relative_extrusion_advances_accumulator() {
    let mut cs = CoordSystem::new(&Config::default());
    cs.set_abs_e(false);
    assert_eq!(cs.apply_move(&params(&[(Axis::E, 2.0)])).e, Some(2.0));
    assert_eq!(cs.apply_move(&params(&[(Axis::E, 3.0)])).e, Some(3.0));
    assert_eq!(cs.e_total(), 5.0);

    cs.set_abs_e(true);
    assert_eq!(cs.apply_move(&params(&[(Axis::E, 6.0)])).e, Some(1.0));
}

#[test]
fn test_g92_extruder_reset() {
    let mut cs = CoordSystem::new(&Config::default());
    cs.apply_move(&params(&[(Axis::E, 10.0)]));
    cs.set_offset(&params(&[(Axis::E, 0.0)]));
    assert_eq!(cs.e_total(), 0.0);
    assert_eq!(cs.offset().e, Some(10.0));

    assert_eq!(cs.apply_move(&params(&[(Axis::E, 0.8)])).e, Some(0.8));
}

#[test]
fn test_g92_xyz_offset() {
    let mut cs = CoordSystem::new(&Config::default());
    cs.apply_move(&params(&[(Axis::X, 10.0)]));
    cs.set_offset(&params(&[(Axis::X, 0.0)]));
    assert_eq!(cs.offset().x, Some(10.0));
    assert_eq!(cs.position().x, Some(10.0));

    assert_eq!(cs.apply_move(&params(&[(Axis::X, 5.0)])).x, Some(15.0));
}

#[test]
fn test_home_selected_axes() {
    let mut cs = CoordSystem::new(&Config::default());
    cs.apply_move(&params(&[(Axis::X, 3.0), (Axis::Y, 4.0), (Axis::Z, 5.0)]));
    cs.home(&[Axis::X]);
    assert_eq!(cs.position().x, Some(0.0));
    assert_eq!(cs.position().y, Some(4.0));

    cs.home(&[]);
    assert_eq!(cs.position(), Vector::from_values(0.0, 0.0, 0.0, 0.0, 1200.0));
}

#[test]
fn test_restore_round_trips_state() {
    let mut cs = CoordSystem::new(&Config::default());
    cs.set_abs_xyz(false);
    cs.set_arc_plane(ArcPlane::YZ);
    let p = cs.apply_move(&params(&[(Axis::X, 2.0), (Axis::E, 1.0), (Axis::F, 900.0)]));

    let restored = CoordSystem::restore(cs.modes(), p);
    assert_eq!(restored, cs);
}

proptest! {
    #[test]
    fn relative_position_is_sum_of_deltas(deltas in prop::collection::vec(-100.0f64..100.0, 1..40)) {
        let mut cs = CoordSystem::new(&Config::default());
        cs.apply_move(&params(&[(Axis::Y, 7.0)]));
        cs.set_abs_xyz(false);
        let mut last = Vector::new();
        for d in &deltas {
            last = cs.apply_move(&params(&[(Axis::X, *d)]));
        }
        let expected: f64 = deltas.iter().sum();
        prop_assert!((last.x.unwrap_or(f64::NAN) - expected).abs() < 1e-6);
        prop_assert_eq!(last.y, Some(7.0));
    }

    #[test]
    fn absolute_position_is_last_value(values in prop::collection::vec(-500.0f64..500.0, 1..40)) {
        let mut cs = CoordSystem::new(&Config::default());
        let mut last = Vector::new();
        for v in &values {
            last = cs.apply_move(&params(&[(Axis::Z, *v)]));
        }
        prop_assert_eq!(last.z, values.last().copied());
        prop_assert!(last.is_resolved());
    }
}
