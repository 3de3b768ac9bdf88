use nalgebra::Vector2;

/// Plain 2-D vector used for agent positions and velocities.
///
/// Arithmetic comes straight from nalgebra: `+`, `-`, scalar `*` and `/`
/// return new values. Dividing by exactly zero yields `NaN`/`Inf` components
/// and is left unguarded.
pub type Vector2D = Vector2<f64>;

#[inline]
pub fn vec2(x: f64, y: f64) -> Vector2D {
    Vector2D::new(x, y)
}

/// Euclidean length, `sqrt(x² + y²)`.
#[inline]
pub fn length(v: &Vector2D) -> f64 {
    v.norm()
}

/// Unit vector in the direction of `v`, or the zero vector when `v` has no length.
#[inline]
pub fn normalized(v: &Vector2D) -> Vector2D {
    let len = v.norm();
    if len > 0.0 { v / len } else { Vector2D::zeros() }
}

/// Distance between two points. Neighbor queries and the steering rules both
/// go through here so a radius test gives the same answer in both places.
#[inline]
pub fn distance(a: &Vector2D, b: &Vector2D) -> f64 {
    (b - a).norm()
}

/// Rescale `v` to `max` if it is longer than `max`.
#[inline]
pub fn clamp_length(v: Vector2D, max: f64) -> Vector2D {
    if v.norm() > max { normalized(&v) * max } else { v }
}
