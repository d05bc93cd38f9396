use gcodetools_core::{AbsentPolicy, Axis, Vector};

#[test]
fn test_addition_passes_absent_axes_through() {
    let a = Vector::new().with(Axis::X, 1.0).with(Axis::Y, 2.0);
    let b = Vector::new().with(Axis::X, 10.0).with(Axis::Z, 5.0);
    let sum = a + b;

    assert_eq!(sum.x, Some(11.0));
    assert_eq!(sum.y, Some(2.0));
    assert_eq!(sum.z, Some(5.0));
    assert_eq!(sum.e, None);
    assert_eq!(sum.f, None);
}

#[test]
fn test_scalar_ops_keep_absent_axes_absent() {
    let v = Vector::new().with(Axis::X, 4.0).with(Axis::F, 100.0);
    let scaled = v * 0.5;
    assert_eq!(scaled.x, Some(2.0));
    assert_eq!(scaled.f, Some(50.0));
    assert_eq!(scaled.y, None);

    let neg = -v;
    assert_eq!(neg.x, Some(-4.0));
    assert_eq!(neg.z, None);
}

#[test]
fn test_policies() {
    let a = Vector::new().with(Axis::X, 3.0);
    let b = Vector::new().with(Axis::Y, 4.0);

    let zero = a.combine(&b, AbsentPolicy::AsZero, |p, q| p + q);
    assert_eq!(zero.x, Some(3.0));
    assert_eq!(zero.y, Some(4.0));
    assert_eq!(zero.e, Some(0.0));
    assert!(zero.is_resolved());

    let propagate = a.combine(&b, AbsentPolicy::Propagate, |p, q| p + q);
    assert!(propagate.is_empty());
}

#[test]
fn test_distance_treats_absent_as_zero() {
    let from = Vector::new().with(Axis::X, 1.0);
    let to = Vector::new().with(Axis::Y, 4.0);
    let d = from.distance(&to);
    assert_eq!(d.x, Some(-1.0));
    assert_eq!(d.y, Some(4.0));
    assert_eq!(d.z, Some(0.0));
}

#[test]
fn test_magnitude_and_normalized() {
    let v = Vector::xyz_values(3.0, 4.0, 0.0).with(Axis::E, 9.0);
    assert_eq!(v.magnitude(), 5.0);

    let unit = v.normalized();
    assert!((unit.magnitude() - 1.0).abs() < 1e-12);
    assert_eq!(unit.e, None);

    assert_eq!(Vector::new().normalized(), Vector::xyz_values(0.0, 0.0, 0.0));
}

#[test]
fn test_dot_and_cross() {
    let x = Vector::xyz_values(1.0, 0.0, 0.0);
    let y = Vector::xyz_values(0.0, 1.0, 0.0);
    assert_eq!(x.dot(&y), 0.0);
    assert_eq!(x.cross(&y), Vector::xyz_values(0.0, 0.0, 1.0));
}

#[test]
fn test_merge_and_mask() {
    let base = Vector::from_values(1.0, 2.0, 3.0, 0.0, 1200.0);
    let update = Vector::new().with(Axis::Y, 20.0);
    let merged = base.merge(&update);
    assert_eq!(merged, Vector::from_values(1.0, 20.0, 3.0, 0.0, 1200.0));

    let masked = base.mask(&update);
    assert_eq!(masked, Vector::new().with(Axis::Y, 2.0));
}

#[test]
fn test_projections() {
    let v = Vector::from_values(1.0, 2.0, 3.0, 4.0, 5.0);
    assert_eq!(v.xy(), Vector::new().with(Axis::X, 1.0).with(Axis::Y, 2.0));
    assert_eq!(v.xyz().z, Some(3.0));
    assert_eq!(v.xyz().e, None);
    assert_eq!(v.e_only(), Vector::new().with(Axis::E, 4.0));
    assert_eq!(v.f_only(), Vector::new().with(Axis::F, 5.0));
}

#[test]
fn test_axis_letters() {
    for axis in Axis::ALL {
        assert_eq!(Axis::from_letter(axis.letter()), Some(axis));
    }
    assert_eq!(Axis::from_letter('x'), Some(Axis::X));
    assert_eq!(Axis::from_letter('S'), None);
}

#[test]
fn test_display() {
    let v = Vector::new().with(Axis::X, 1.5);
    assert_eq!(v.to_string(), "X=1.5, Y=None, Z=None, E=None, F=None");
}

#[test]
fn test_flowrate() {
    let displacement = Vector::from_values(3.0, 4.0, 0.0, 0.5, 1200.0);
    assert_eq!(displacement.flowrate(), Some(0.1));
    assert_eq!(Vector::xyz_values(3.0, 4.0, 0.0).flowrate(), None);
    assert_eq!(Vector::new().with(Axis::E, 1.0).flowrate(), None);
}
