//! The three classic steering rules.
//!
//! Each rule looks only at the agents named in `neighbors` and returns a
//! steering vector; the caller applies the per-rule weights. Neighbors are
//! visited in the order given, which fixes the floating-point summation order.

use crate::config::FlockParams;
use crate::math::{distance, normalized, Vector2D};
use crate::models::agent::Agent;

/// Inverse-distance weighted push away from agents closer than
/// `separation_radius`, averaged over the agents that contributed.
pub fn separation(agent: &Agent, population: &[Agent], neighbors: &[usize], params: &FlockParams) -> Vector2D {
    let mut steer = Vector2D::zeros();
    let mut count = 0usize;

    for &j in neighbors {
        let other = &population[j];
        let d = distance(&agent.position, &other.position);
        if d > 0.0 && d < params.separation_radius {
            steer += normalized(&(agent.position - other.position)) / d;
            count += 1;
        }
    }

    if count > 0 {
        steer /= count as f64;
    }
    steer
}

/// Steer toward the neighbors' mean heading, taken at full `max_speed`.
pub fn alignment(agent: &Agent, population: &[Agent], neighbors: &[usize], params: &FlockParams) -> Vector2D {
    let mut avg_velocity = Vector2D::zeros();
    let mut count = 0usize;

    for &j in neighbors {
        let other = &population[j];
        if distance(&agent.position, &other.position) < params.alignment_radius {
            avg_velocity += other.velocity;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zeros();
    }

    avg_velocity /= count as f64;
    if avg_velocity.norm() > 0.0 {
        avg_velocity = normalized(&avg_velocity) * params.max_speed;
    }
    (avg_velocity - agent.velocity) * params.alignment_gain
}

/// Steer toward the neighbors' centre of mass.
pub fn cohesion(agent: &Agent, population: &[Agent], neighbors: &[usize], params: &FlockParams) -> Vector2D {
    let mut center = Vector2D::zeros();
    let mut count = 0usize;

    for &j in neighbors {
        let other = &population[j];
        if distance(&agent.position, &other.position) < params.cohesion_radius {
            center += other.position;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zeros();
    }

    center /= count as f64;
    (center - agent.position) * params.cohesion_gain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2;

    fn at(x: f64, y: f64) -> Agent {
        Agent::new(vec2(x, y), Vector2D::zeros())
    }

    #[test]
    fn rules_are_zero_without_neighbors() {
        let params = FlockParams::default();
        let population = [Agent::new(vec2(10.0, 10.0), vec2(1.0, 1.0))];
        let agent = population[0];
        assert_eq!(separation(&agent, &population, &[], &params), Vector2D::zeros());
        assert_eq!(alignment(&agent, &population, &[], &params), Vector2D::zeros());
        assert_eq!(cohesion(&agent, &population, &[], &params), Vector2D::zeros());
    }

    #[test]
    fn separation_weights_closer_neighbors_harder() {
        let params = FlockParams::default();
        let population = [at(0.0, 0.0), at(5.0, 0.0), at(0.0, -20.0), at(40.0, 0.0)];
        let steer = separation(&population[0], &population, &[1, 2, 3], &params);
        // (-1/5, 0) and (0, 1/20), averaged over the two agents inside 25
        assert!((steer.x - (-0.2 / 2.0)).abs() < 1e-12);
        assert!((steer.y - (0.05 / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn separation_ignores_coincident_agents() {
        let params = FlockParams::default();
        let population = [at(3.0, 3.0), at(3.0, 3.0)];
        let steer = separation(&population[0], &population, &[1], &params);
        assert_eq!(steer, Vector2D::zeros());
    }

    #[test]
    fn alignment_targets_max_speed_heading() {
        let params = FlockParams::default();
        let population = [
            Agent::new(vec2(0.0, 0.0), vec2(0.0, 1.0)),
            Agent::new(vec2(10.0, 0.0), vec2(2.0, 0.0)),
            Agent::new(vec2(0.0, 10.0), vec2(4.0, 0.0)),
        ];
        let steer = alignment(&population[0], &population, &[1, 2], &params);
        // mean velocity (3, 0) rescaled to (3, 0); ((3, 0) - (0, 1)) * 0.1
        assert!((steer.x - 0.3).abs() < 1e-12);
        assert!((steer.y - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn alignment_with_cancelling_headings_damps_velocity() {
        let params = FlockParams::default();
        let population = [
            Agent::new(vec2(0.0, 0.0), vec2(1.0, 0.0)),
            Agent::new(vec2(10.0, 0.0), vec2(1.0, 0.0)),
            Agent::new(vec2(-10.0, 0.0), vec2(-1.0, 0.0)),
        ];
        let steer = alignment(&population[0], &population, &[1, 2], &params);
        assert!((steer.x - (-0.1)).abs() < 1e-12);
        assert_eq!(steer.y, 0.0);
    }

    #[test]
    fn cohesion_pulls_toward_center() {
        let params = FlockParams::default();
        let population = [at(0.0, 0.0), at(10.0, 0.0), at(0.0, 20.0)];
        let steer = cohesion(&population[0], &population, &[1, 2], &params);
        assert!((steer.x - 5.0 * 0.005).abs() < 1e-12);
        assert!((steer.y - 10.0 * 0.005).abs() < 1e-12);
    }
}
