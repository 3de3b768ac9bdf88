use crate::math::distance;
use crate::models::agent::Agent;

/// Indices of every agent strictly closer than `radius` to `population[center]`,
/// in population order. The center itself is skipped by index, so agents that
/// happen to share its position and velocity are still reported.
///
/// Plain linear scan: O(n) per query, O(n²) per tick.
pub fn neighbors_within(radius: f64, center: usize, population: &[Agent]) -> Vec<usize> {
    let mut out = Vec::new();
    neighbors_within_into(radius, center, population, &mut out);
    out
}

/// Same as [`neighbors_within`] but reuses `out` to avoid a fresh allocation per agent.
pub fn neighbors_within_into(radius: f64, center: usize, population: &[Agent], out: &mut Vec<usize>) {
    out.clear();
    let origin = population[center].position;
    for (j, other) in population.iter().enumerate() {
        if j == center {
            continue;
        }
        if distance(&origin, &other.position) < radius {
            out.push(j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{vec2, Vector2D};

    fn population() -> Vec<Agent> {
        [
            (100.0, 100.0),
            (130.0, 100.0),
            (100.0, 150.0),
            (300.0, 300.0),
            (100.0, 100.0),
        ]
        .into_iter()
        .map(|(x, y)| Agent::new(vec2(x, y), Vector2D::zeros()))
        .collect()
    }

    #[test]
    fn returns_expected_indices_in_order() {
        let agents = population();
        assert_eq!(neighbors_within(50.0, 0, &agents), vec![1, 4]);
        assert_eq!(neighbors_within(50.0, 1, &agents), vec![0, 4]);
        assert_eq!(neighbors_within(50.0, 3, &agents), Vec::<usize>::new());
        assert_eq!(neighbors_within(50.0, 4, &agents), vec![0, 1]);
    }

    #[test]
    fn radius_is_exclusive() {
        let agents = population();
        // agent 2 sits exactly 50 away from agent 0
        assert!(!neighbors_within(50.0, 0, &agents).contains(&2));
        assert!(neighbors_within(50.0001, 0, &agents).contains(&2));
    }

    #[test]
    fn identical_twin_is_not_self() {
        let agents = population();
        assert_eq!(agents[0], agents[4]);
        assert!(neighbors_within(1.0, 0, &agents).contains(&4));
        assert!(neighbors_within(1.0, 4, &agents).contains(&0));
    }

    #[test]
    fn into_variant_clears_previous_results() {
        let agents = population();
        let mut buf = vec![99, 98];
        neighbors_within_into(50.0, 3, &agents, &mut buf);
        assert!(buf.is_empty());
    }
}
