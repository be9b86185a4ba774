//! Goal point selection

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

use crate::path::Path;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A cursor over the path which only moves forwards.
///
/// Every call to [`GoalSelector::evaluate`] consumes exactly one point,
/// whether or not it is accepted, so a skipped point is never looked at again.
#[derive(Debug, Clone, Default)]
pub struct GoalSelector {
    next_index: usize,
    num_points: usize,
}

/// The outcome of evaluating one path point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// The point is beyond the look-ahead distance and is the new goal.
    Goal {
        index: usize,
        point_m: Vector2<f64>
    },

    /// The point is within the look-ahead distance and has been passed over.
    Skipped {
        index: usize,
        dist_m: f64
    },

    /// There are no points left to evaluate.
    Exhausted
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Returns true if `point_m` is far enough from `position_m` to be a goal,
/// i.e. strictly further away than the look-ahead distance.
pub fn is_goal_point(point_m: &Vector2<f64>, position_m: &Vector2<f64>, look_ahead_m: f64) -> bool {
    (point_m - position_m).norm() > look_ahead_m
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GoalSelector {
    /// Create a selector positioned at the start of the given path.
    pub fn new(path: &Path) -> Self {
        Self {
            next_index: 0,
            num_points: path.get_num_points(),
        }
    }

    /// Index of the next point to be evaluated, or `None` once the path has
    /// been exhausted.
    pub fn next_index(&self) -> Option<usize> {
        if self.is_exhausted() {
            None
        }
        else {
            Some(self.next_index)
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_index >= self.num_points
    }

    /// Number of points that have not been evaluated yet.
    pub fn num_remaining(&self) -> usize {
        self.num_points.saturating_sub(self.next_index)
    }

    /// Evaluate the next point of the path against the robot's position,
    /// then move on to the following point.
    pub fn evaluate(
        &mut self,
        path: &Path,
        position_m: &Vector2<f64>,
        look_ahead_m: f64
    ) -> Selection {
        let index = self.next_index;

        let point_m = match path.get_point2(index) {
            Some(p) if index < self.num_points => p,
            _ => {
                // Pin the cursor at the end in case the path was shorter than
                // expected
                self.next_index = self.num_points;
                return Selection::Exhausted
            }
        };

        self.next_index += 1;

        if is_goal_point(&point_m, position_m, look_ahead_m) {
            Selection::Goal { index, point_m }
        }
        else {
            Selection::Skipped {
                index,
                dist_m: (point_m - position_m).norm()
            }
        }
    }
}
