//! Conversions between the world coordinate space (WCS) and the robot
//! coordinate space (RCS).
//!
//! The RCS is centred on the robot with +X along its heading and +Y to its
//! left.

use nalgebra::Vector2;

/// Express `goal` in the frame of a robot at `start` with the given heading.
///
/// The offset from the robot to the goal is rotated clockwise by the heading.
/// The heading is used as given, no wrapping is applied.
pub fn wcs_to_rcs(start: &Vector2<f64>, goal: &Vector2<f64>, heading_rad: f64) -> Vector2<f64> {
    let d = goal - start;
    let (sin, cos) = heading_rad.sin_cos();

    Vector2::new(
        d.x * cos + d.y * sin,
        -d.x * sin + d.y * cos,
    )
}

/// Rotate a robot frame offset back into a world frame offset.
///
/// This is the inverse of the rotation in [`wcs_to_rcs`], so
/// `start + rcs_to_wcs(&wcs_to_rcs(start, goal, h), h) == goal`.
pub fn rcs_to_wcs(offset_rcs: &Vector2<f64>, heading_rad: f64) -> Vector2<f64> {
    let (sin, cos) = heading_rad.sin_cos();

    Vector2::new(
        offset_rcs.x * cos - offset_rcs.y * sin,
        offset_rcs.x * sin + offset_rcs.y * cos,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_vec_close(a: Vector2<f64>, b: Vector2<f64>) {
        assert!((a - b).norm() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_goal_ahead() {
        let rcs = wcs_to_rcs(&Vector2::new(0.0, 0.0), &Vector2::new(1.0, 0.0), 0.0);
        assert_vec_close(rcs, Vector2::new(1.0, 0.0));
    }

    #[test]
    fn test_goal_left() {
        let rcs = wcs_to_rcs(&Vector2::new(0.0, 0.0), &Vector2::new(0.0, 1.0), 0.0);
        assert_vec_close(rcs, Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_heading_rotates_frame() {
        // Facing +Y, a goal further along +Y is straight ahead
        let rcs = wcs_to_rcs(&Vector2::new(1.0, 1.0), &Vector2::new(1.0, 3.0), FRAC_PI_2);
        assert_vec_close(rcs, Vector2::new(2.0, 0.0));

        // Facing -X, a goal at +Y is on the right
        let rcs = wcs_to_rcs(&Vector2::new(0.0, 0.0), &Vector2::new(0.0, 1.0), PI);
        assert_vec_close(rcs, Vector2::new(0.0, -1.0));
    }

    #[test]
    fn test_heading_either_side_of_wrap() {
        // Headings of pi and -pi describe the same direction, so give the same frame
        let start = Vector2::new(0.5, -0.5);
        let goal = Vector2::new(-2.0, 0.3);
        assert_vec_close(
            wcs_to_rcs(&start, &goal, PI),
            wcs_to_rcs(&start, &goal, -PI),
        );
    }

    #[test]
    fn test_round_trip() {
        let starts = [(0.0, 0.0), (1.5, -2.0), (-10.0, 7.25)];
        let goals = [(1.0, 0.0), (-3.0, 4.0), (0.01, -0.02), (100.0, 50.0)];
        let headings = [-PI, -2.0, -0.3, 0.0, 0.7, FRAC_PI_2, 3.0, PI];

        for &(sx, sy) in starts.iter() {
            for &(gx, gy) in goals.iter() {
                for &h in headings.iter() {
                    let start = Vector2::new(sx, sy);
                    let goal = Vector2::new(gx, gy);

                    let rcs = wcs_to_rcs(&start, &goal, h);

                    // Rotation preserves distance
                    assert!((rcs.norm() - (goal - start).norm()).abs() < 1e-9);

                    assert_vec_close(start + rcs_to_wcs(&rcs, h), goal);
                }
            }
        }
    }
}
