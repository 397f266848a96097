use nalgebra::{Point3, Rotation3, Unit, Vector3};

pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle_degrees: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle_degrees.to_radians())
}

/// Rotates the selected points about the line through `pivot` along `axis`.
///
/// A zero-length axis leaves the points untouched.
pub fn rotate_about_axis(
    positions: &mut [Point3<f64>],
    selection: &[usize],
    pivot: &Point3<f64>,
    axis: &Vector3<f64>,
    angle_degrees: f64,
) {
    if axis.norm_squared() < f64::EPSILON {
        return;
    }
    let rotation = rotation_from_axis_angle(axis, angle_degrees);
    for &i in selection {
        positions[i] = pivot + rotation * (positions[i] - pivot);
    }
}

/// Signed dihedral angle p1-p2-p3-p4 in degrees, in `(-180, 180]`.
pub fn calculate_dihedral(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let m1 = n1.cross(&b2.normalize());

    let x = n1.dot(&n2);
    let y = m1.dot(&n2);
    y.atan2(x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn rotate_about_axis_moves_only_selected_points() {
        let mut positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        rotate_about_axis(
            &mut positions,
            &[2],
            &Point3::new(1.0, 0.0, 0.0),
            &Vector3::x(),
            90.0,
        );
        assert_eq!(positions[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(positions[1], Point3::new(1.0, 0.0, 0.0));
        assert!((positions[2] - Point3::new(1.0, 0.0, 1.0)).norm() < TOLERANCE);
    }

    #[test]
    fn rotate_about_axis_ignores_degenerate_axis() {
        let mut positions = vec![Point3::new(1.0, 2.0, 3.0)];
        rotate_about_axis(
            &mut positions,
            &[0],
            &Point3::origin(),
            &Vector3::zeros(),
            45.0,
        );
        assert_eq!(positions[0], Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn dihedral_of_cis_and_trans_arrangements() {
        let p2 = Point3::new(0.0, 0.0, 0.0);
        let p3 = Point3::new(1.0, 0.0, 0.0);
        let p1 = Point3::new(0.0, 1.0, 0.0);
        let cis = Point3::new(1.0, 1.0, 0.0);
        let trans = Point3::new(1.0, -1.0, 0.0);
        let gauche = Point3::new(1.0, 0.0, 1.0);

        assert!(calculate_dihedral(&p1, &p2, &p3, &cis).abs() < TOLERANCE);
        assert!((calculate_dihedral(&p1, &p2, &p3, &trans).abs() - 180.0).abs() < TOLERANCE);
        assert!((calculate_dihedral(&p1, &p2, &p3, &gauche).abs() - 90.0).abs() < TOLERANCE);
    }
}
