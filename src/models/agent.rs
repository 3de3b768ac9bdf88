use crate::algorithms::flocking::{alignment, cohesion, separation};
use crate::config::{BoundaryPolicy, Bounds, FlockParams};
use crate::math::{clamp_length, vec2, Vector2D};
use rand::Rng;

/// One boid: where it is and where it is heading.
///
/// Agents never point at each other. Everything an update needs from the rest
/// of the flock arrives as `(population, neighbor indices)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl Agent {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self { position, velocity }
    }

    /// Uniform position over `bounds`, velocity components in `[-initial_speed, initial_speed)`.
    pub fn random<R: Rng>(rng: &mut R, bounds: &Bounds, initial_speed: f64) -> Self {
        let position = vec2(rng.gen_range(0.0..bounds.width), rng.gen_range(0.0..bounds.height));
        let velocity = if initial_speed > 0.0 {
            vec2(
                rng.gen_range(-initial_speed..initial_speed),
                rng.gen_range(-initial_speed..initial_speed),
            )
        } else {
            Vector2D::zeros()
        };
        Self { position, velocity }
    }

    /// One tick for this agent.
    ///
    /// `neighbors` indexes into `population` and must already be filtered to
    /// the neighbor radius. Only `self` is written.
    pub fn update(
        &mut self,
        population: &[Agent],
        neighbors: &[usize],
        params: &FlockParams,
        bounds: &Bounds,
        boundary: BoundaryPolicy,
    ) {
        let separation = separation(self, population, neighbors, params);
        let alignment = alignment(self, population, neighbors, params);
        let cohesion = cohesion(self, population, neighbors, params);

        self.velocity += separation * params.separation_weight
            + alignment * params.alignment_weight
            + cohesion * params.cohesion_weight;
        self.velocity = clamp_length(self.velocity, params.max_speed);

        self.position += self.velocity;
        self.confine(bounds, boundary);
    }

    /// Apply the boundary policy after integration.
    pub fn confine(&mut self, bounds: &Bounds, boundary: BoundaryPolicy) {
        match boundary {
            BoundaryPolicy::Wrap => {
                self.position.x = wrap_axis(self.position.x, bounds.width);
                self.position.y = wrap_axis(self.position.y, bounds.height);
            }
            BoundaryPolicy::Reflect => {
                reflect_axis(&mut self.position.x, &mut self.velocity.x, bounds.width);
                reflect_axis(&mut self.position.y, &mut self.velocity.y, bounds.height);
            }
        }
    }
}

fn wrap_axis(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    // -1e-17 rem 800.0 rounds to 800.0
    if wrapped >= extent { 0.0 } else { wrapped }
}

fn reflect_axis(position: &mut f64, velocity: &mut f64, extent: f64) {
    if *position < 0.0 {
        *position = 0.0;
        *velocity = -*velocity;
    } else if *position > extent {
        *position = extent;
        *velocity = -*velocity;
    }
}

/// Build `count` agents with random state. Deterministic for a given RNG state.
pub fn random_population<R: Rng>(
    rng: &mut R,
    count: usize,
    bounds: &Bounds,
    initial_speed: f64,
) -> Vec<Agent> {
    (0..count).map(|_| Agent::random(rng, bounds, initial_speed)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    fn bounds() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    #[test]
    fn lone_agent_keeps_its_velocity() {
        let params = FlockParams::default();
        let mut agent = Agent::new(vec2(100.0, 100.0), vec2(1.5, -0.5));
        let population = [agent];
        agent.update(&population, &[], &params, &bounds(), BoundaryPolicy::Wrap);
        assert_eq!(agent.velocity, vec2(1.5, -0.5));
        assert_eq!(agent.position, vec2(101.5, 99.5));
    }

    #[test]
    fn speed_is_clamped_to_max() {
        let params = FlockParams::default();
        let mut agent = Agent::new(vec2(100.0, 100.0), vec2(30.0, 40.0));
        agent.update(&[], &[], &params, &bounds(), BoundaryPolicy::Wrap);
        assert!((agent.velocity.norm() - params.max_speed).abs() < 1e-12);
    }

    #[test]
    fn close_neighbor_pushes_agent_away() {
        let params = FlockParams::default();
        let population = [
            Agent::new(vec2(100.0, 100.0), Vector2D::zeros()),
            Agent::new(vec2(110.0, 100.0), Vector2D::zeros()),
        ];
        let mut agent = population[0];
        agent.update(&population, &[1], &params, &bounds(), BoundaryPolicy::Wrap);
        // separation -> (-0.1, 0) * 2.5, cohesion -> (10 * 0.005, 0)
        assert!((agent.velocity.x - (-0.25 + 0.05)).abs() < 1e-12);
        assert_eq!(agent.velocity.y, 0.0);
    }

    #[test]
    fn wrap_moves_to_opposite_edge() {
        let mut agent = Agent::new(vec2(-1.0, 601.0), vec2(-1.0, 1.0));
        agent.confine(&bounds(), BoundaryPolicy::Wrap);
        assert_eq!(agent.position, vec2(799.0, 1.0));
        assert_eq!(agent.velocity, vec2(-1.0, 1.0));

        let mut on_edge = Agent::new(vec2(800.0, 0.0), Vector2D::zeros());
        on_edge.confine(&bounds(), BoundaryPolicy::Wrap);
        assert_eq!(on_edge.position, vec2(0.0, 0.0));
    }

    #[test]
    fn wrap_handles_overshoot_beyond_one_extent() {
        let mut far = Agent::new(vec2(1999.0, -1290.0), Vector2D::zeros());
        far.confine(&bounds(), BoundaryPolicy::Wrap);
        assert_eq!(far.position, vec2(399.0, 510.0));

        let params = FlockParams { max_speed: 1000.0, ..FlockParams::default() };
        let mut fast = Agent::new(vec2(10.0, 300.0), vec2(-1000.0, 0.0));
        fast.update(&[], &[], &params, &bounds(), BoundaryPolicy::Wrap);
        assert_eq!(fast.position, vec2(610.0, 300.0));
    }

    #[test]
    fn tiny_negative_coordinate_stays_inside() {
        let mut agent = Agent::new(vec2(-1e-17, 10.0), Vector2D::zeros());
        agent.confine(&bounds(), BoundaryPolicy::Wrap);
        assert!(agent.position.x >= 0.0 && agent.position.x < 800.0);
    }

    #[test]
    fn reflect_clamps_and_inverts() {
        let mut agent = Agent::new(vec2(-2.0, 605.0), vec2(-1.0, 2.0));
        agent.confine(&bounds(), BoundaryPolicy::Reflect);
        assert_eq!(agent.position, vec2(0.0, 600.0));
        assert_eq!(agent.velocity, vec2(1.0, -2.0));
    }

    #[test]
    fn random_agents_start_inside_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        let agents = random_population(&mut rng, 500, &bounds(), 2.0);
        assert_eq!(agents.len(), 500);
        for a in &agents {
            assert!((0.0..800.0).contains(&a.position.x));
            assert!((0.0..600.0).contains(&a.position.y));
            assert!((-2.0..2.0).contains(&a.velocity.x));
            assert!((-2.0..2.0).contains(&a.velocity.y));
        }
    }

    #[test]
    fn zero_initial_speed_gives_resting_agents() {
        let mut rng = SmallRng::seed_from_u64(1);
        let agent = Agent::random(&mut rng, &bounds(), 0.0);
        assert_eq!(agent.velocity, Vector2D::zeros());
    }
}
