//! Candidate pair generation
//!
//! Every triangle edge is a candidate, and so is every pair of vertices
//! closer than the proximity threshold, which lets disconnected pieces of a
//! mesh be welded together.

use crate::mesh::SimplificationMesh;
use crate::scheduler::{pair_key, VertexPair};
use itertools::Itertools;
use meshslim_core::{distance, Error, Result};

impl SimplificationMesh {
    /// Seed the scheduler with edge pairs and proximity pairs.
    ///
    /// Requires [`SimplificationMesh::accumulate_quadrics`] to have run, since
    /// every proposal is costed against the endpoint quadrics.
    pub fn generate_candidates(&mut self, proximity_threshold: f64) -> Result<()> {
        if !self.quadrics_ready {
            return Err(Error::InvalidData(
                "quadrics must be accumulated before selecting pairs".to_string(),
            ));
        }
        if !proximity_threshold.is_finite() || proximity_threshold < 0.0 {
            return Err(Error::InvalidData(format!(
                "proximity threshold must be a finite non-negative number, got {}",
                proximity_threshold
            )));
        }

        log::info!(
            "Selecting valid pairs with threshold = {}",
            proximity_threshold
        );
        self.propose_edge_pairs()?;
        let after_edges = self.scheduler.len();
        self.propose_proximity_pairs(proximity_threshold)?;
        log::info!(
            "Selection finished. Edge pairs: {}, proximity pairs: {}",
            after_edges,
            self.scheduler.len() - after_edges
        );
        Ok(())
    }

    /// Propose the three edges of every live triangle.
    pub(crate) fn propose_edge_pairs(&mut self) -> Result<()> {
        for ti in 0..self.triangles.len() {
            let t = &self.triangles[ti];
            if t.is_removed() {
                continue;
            }
            for (a, b) in t.vertices().into_iter().tuple_combinations() {
                self.propose_pair(a, b)?;
            }
        }
        Ok(())
    }

    /// Propose every pair of live vertices closer than `threshold`.
    ///
    /// Vertices are scanned in ascending x; the inner scan stops as soon as
    /// the x gap alone reaches past the threshold.
    pub(crate) fn propose_proximity_pairs(&mut self, threshold: f64) -> Result<()> {
        let vertices = &self.vertices;
        let mut order: Vec<usize> = (0..vertices.len()).collect();
        order.sort_by(|&a, &b| vertices[a].position.x.total_cmp(&vertices[b].position.x));
        self.x_order = order;

        if threshold == 0.0 {
            return Ok(());
        }

        for i in 0..self.x_order.len() {
            let a = self.x_order[i];
            if self.vertices[a].is_removed() {
                continue;
            }
            for j in (i + 1)..self.x_order.len() {
                let b = self.x_order[j];
                let pa = self.vertices[a].position;
                let pb = self.vertices[b].position;
                if pb.x - pa.x > threshold {
                    break;
                }
                if !self.vertices[b].is_removed() && distance(&pa, &pb) < threshold {
                    self.propose_pair(a, b)?;
                }
            }
        }
        Ok(())
    }

    /// Cost the contraction of `u` and `v` and queue it.
    ///
    /// A second proposal of the same pair within one tick is a no-op.
    /// Proposing a vertex with itself, or with a removed vertex, is an
    /// invariant violation.
    pub fn propose_pair(&mut self, u: usize, v: usize) -> Result<()> {
        if u == v {
            return Err(Error::InvariantViolation(format!(
                "cannot pair vertex {} with itself",
                u
            )));
        }
        let n = self.vertices.len();
        if u >= n || v >= n {
            return Err(Error::InvariantViolation(format!(
                "pair ({}, {}) references a vertex outside the arena of {}",
                u, v, n
            )));
        }
        if self.vertices[u].is_removed() || self.vertices[v].is_removed() {
            return Err(Error::InvariantViolation(format!(
                "cannot pair removed vertex in ({}, {})",
                u, v
            )));
        }

        let (v0, v1) = pair_key(u, v);
        if self.scheduler.created_at((v0, v1), self.tick) {
            return Ok(());
        }

        let a = &self.vertices[v0];
        let b = &self.vertices[v1];
        let q = a.quadric + b.quadric;
        let position = q.contracted_position(&a.position, &b.position, self.placement);
        let cost = q.error_at(&position);
        log::trace!("propose ({}, {}) cost={} @{}", v0, v1, cost, self.tick);

        self.vertices[v0].paired.insert(v1);
        self.vertices[v1].paired.insert(v0);
        self.scheduler.push(VertexPair {
            v0,
            v1,
            position,
            cost,
            tick: self.tick,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::SimplificationMesh;
    use meshslim_core::{Error, Point3d};
    use std::collections::HashSet;

    fn two_triangles_sharing_a_corner_position() -> SimplificationMesh {
        // Vertex 3 sits exactly on vertex 2 but belongs to another triangle.
        SimplificationMesh::load(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(1.0, 1.0, 0.0),
                Point3d::new(1.0, 1.0, 0.0),
                Point3d::new(2.0, 1.0, 0.0),
                Point3d::new(2.0, 2.0, 1.0),
            ],
            &[[0, 1, 2], [3, 4, 5]],
        )
        .unwrap()
    }

    #[test]
    fn test_requires_quadrics() {
        let mut mesh = two_triangles_sharing_a_corner_position();
        assert!(matches!(
            mesh.generate_candidates(0.01),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let mut mesh = two_triangles_sharing_a_corner_position();
        mesh.accumulate_quadrics();
        assert!(mesh.generate_candidates(-1.0).is_err());
        assert!(mesh.generate_candidates(f64::NAN).is_err());
    }

    #[test]
    fn test_edge_pairs_are_deduplicated() {
        let mut mesh = SimplificationMesh::load(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.5, 1.0, 0.0),
                Point3d::new(0.5, 0.5, 1.0),
            ],
            &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
        .unwrap();
        mesh.accumulate_quadrics();
        mesh.generate_candidates(0.0).unwrap();

        // 12 edge proposals, 6 distinct edges.
        assert_eq!(mesh.pending_candidates(), 6);
        let keys: HashSet<_> = mesh.scheduler().iter().map(|p| p.key()).collect();
        assert_eq!(keys.len(), 6);
        for v in 0..4 {
            assert_eq!(mesh.vertex(v).unwrap().paired.len(), 3);
        }
    }

    #[test]
    fn test_proximity_pair_between_disconnected_vertices() {
        let mut mesh = two_triangles_sharing_a_corner_position();
        mesh.accumulate_quadrics();
        mesh.generate_candidates(0.01).unwrap();

        assert_eq!(mesh.pending_candidates(), 7);
        assert_eq!(mesh.scheduler().last_tick((2, 3)), Some(0));
        assert!(mesh.vertex(2).unwrap().paired.contains(&3));
        assert!(mesh.vertex(3).unwrap().paired.contains(&2));
    }

    #[test]
    fn test_zero_threshold_disables_proximity() {
        let mut mesh = two_triangles_sharing_a_corner_position();
        mesh.accumulate_quadrics();
        mesh.generate_candidates(0.0).unwrap();
        assert_eq!(mesh.pending_candidates(), 6);
        assert_eq!(mesh.scheduler().last_tick((2, 3)), None);
    }

    #[test]
    fn test_far_vertices_are_not_paired() {
        let mut mesh = two_triangles_sharing_a_corner_position();
        mesh.accumulate_quadrics();
        // Large enough to reach across x, but not across the full distance.
        mesh.generate_candidates(0.5).unwrap();
        assert_eq!(mesh.scheduler().last_tick((0, 4)), None);
        assert_eq!(mesh.scheduler().last_tick((2, 3)), Some(0));
    }

    #[test]
    fn test_propose_pair_invariants() {
        let mut mesh = two_triangles_sharing_a_corner_position();
        mesh.accumulate_quadrics();
        assert!(matches!(
            mesh.propose_pair(1, 1),
            Err(Error::InvariantViolation(_))
        ));
        assert!(matches!(
            mesh.propose_pair(1, 99),
            Err(Error::InvariantViolation(_))
        ));
        mesh.vertices[4].mark_removed();
        assert!(matches!(
            mesh.propose_pair(3, 4),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_duplicate_proposal_in_same_tick_is_noop() {
        let mut mesh = two_triangles_sharing_a_corner_position();
        mesh.accumulate_quadrics();
        mesh.propose_pair(0, 1).unwrap();
        mesh.propose_pair(1, 0).unwrap();
        assert_eq!(mesh.pending_candidates(), 1);
        mesh.tick += 1;
        mesh.propose_pair(1, 0).unwrap();
        assert_eq!(mesh.pending_candidates(), 2);
        assert_eq!(mesh.scheduler().last_tick((0, 1)), Some(1));
    }
}
