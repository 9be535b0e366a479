use super::*;

fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
    raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn approx(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn square_centroid_is_center() {
    let square = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    assert_eq!(centroid(&square), Some(Point::new(5.0, 5.0)));
}

#[test]
fn empty_and_single_point() {
    assert_eq!(centroid(&[]), None);
    assert_eq!(
        centroid(&[Point::new(3.0, -4.0)]),
        Some(Point::new(3.0, -4.0))
    );
}

#[test]
fn two_points_fall_back_to_mean() {
    let c = centroid(&pts(&[(0.0, 0.0), (10.0, 0.0)])).unwrap();
    assert_eq!(c, Point::new(5.0, 0.0));
    assert!(c.x.is_finite() && c.y.is_finite());
}

#[test]
fn collinear_run_falls_back_to_mean() {
    let c = centroid(&pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (6.0, 6.0)])).unwrap();
    assert!(approx(c, Point::new(2.25, 2.25)));
}

#[test]
fn concave_centroid_is_in_bounds_and_orientation_invariant() {
    // L-shape: 2x2 square with the top-right 1x1 quadrant removed.
    let l_shape = pts(&[
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 2.0),
        (0.0, 2.0),
    ]);
    let c = centroid(&l_shape).unwrap();
    let bbox = bounding_box(&l_shape).unwrap();
    assert!(bbox.contains(c));
    assert!(approx(c, Point::new(5.0 / 6.0, 5.0 / 6.0)));

    let mut reversed = l_shape.clone();
    reversed.reverse();
    assert!(approx(centroid(&reversed).unwrap(), c));
}

#[test]
fn area_weighting_differs_from_vertex_mean() {
    // Many vertices bunched along one edge pull the mean but not the area centroid.
    let outline = pts(&[
        (0.0, 0.0),
        (1.0, 0.0),
        (2.0, 0.0),
        (3.0, 0.0),
        (4.0, 0.0),
        (4.0, 4.0),
        (0.0, 4.0),
    ]);
    assert!(approx(centroid(&outline).unwrap(), Point::new(2.0, 2.0)));
}

#[test]
fn coordinate_string_preserves_order_and_precision() {
    let outline = pts(&[(0.0, 0.0), (10.5, 2.0), (-3.25, 7.125)]);
    assert_eq!(to_coordinate_string(&outline), "0,0 10.5,2 -3.25,7.125");
    assert_eq!(to_coordinate_string(&[]), "");
}

#[test]
fn shrink_factor_one_is_identity() {
    let square = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    assert_eq!(
        shrink_toward_centroid(&square, DEFAULT_SHRINK_FACTOR),
        square
    );
    let half = shrink_toward_centroid(&square, 0.5);
    assert_eq!(half[0], Point::new(2.5, 2.5));
    assert_eq!(half[2], Point::new(7.5, 7.5));
}

#[test]
fn hit_test_respects_concavity() {
    let l_shape = pts(&[
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 2.0),
        (0.0, 2.0),
    ]);
    assert!(hit_test(&l_shape, Point::new(0.5, 1.5)));
    assert!(!hit_test(&l_shape, Point::new(1.5, 1.5)));
    assert!(!hit_test(&pts(&[(0.0, 0.0), (1.0, 1.0)]), Point::new(0.5, 0.5)));
}
