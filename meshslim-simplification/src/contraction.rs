//! The contraction operator
//!
//! Merges the higher-slot endpoint of a candidate into the lower-slot one.
//! Triangles holding both endpoints collapse to zero area and are removed;
//! the rest of the second endpoint's triangles are rewired to the survivor.

use crate::mesh::SimplificationMesh;
use crate::scheduler::VertexPair;
use meshslim_core::{Error, Result};

impl SimplificationMesh {
    /// Apply `pair`, absorbing `pair.v1` into `pair.v0`.
    ///
    /// Returns whether the live-triangle count went down. `pair` must have
    /// come from [`SimplificationMesh::pop_valid_candidate`].
    pub fn contract(&mut self, pair: &VertexPair) -> Result<bool> {
        let (v0, v1) = (pair.v0, pair.v1);
        if v0 == v1 {
            return Err(Error::InvariantViolation(format!(
                "cannot contract vertex {} with itself",
                v0
            )));
        }
        let n = self.vertices.len();
        if v0 >= n || v1 >= n {
            return Err(Error::InvariantViolation(format!(
                "pair ({}, {}) references a vertex outside the arena of {}",
                v0, v1, n
            )));
        }
        if self.vertices[v0].is_removed() || self.vertices[v1].is_removed() {
            return Err(Error::InvariantViolation(format!(
                "cannot contract ({}, {}): an endpoint is already removed",
                v0, v1
            )));
        }

        let before = self.live_triangles;

        // Step 1: drop triangles on the edge, rewire the others.
        let incident = std::mem::take(&mut self.vertices[v1].triangles);
        for ti in incident {
            if self.triangles[ti].contains(v0) {
                for w in self.triangles[ti].vertices() {
                    if w != v1 {
                        self.vertices[w].remove_triangle(ti)?;
                    }
                }
                self.triangles[ti].mark_removed();
                self.live_triangles -= 1;
            } else {
                self.triangles[ti].replace_vertex(v1, v0)?;
                self.vertices[v0].triangles.push(ti);
            }
        }

        self.tick += 1;
        self.contractions += 1;

        // Step 2: move the survivor and absorb the quadric.
        let absorbed = self.vertices[v1].quadric;
        let survivor = &mut self.vertices[v0];
        survivor.position = pair.position;
        survivor.quadric += absorbed;

        // Step 3: everything paired with v1 is now paired with v0.
        let partners = std::mem::take(&mut self.vertices[v1].paired);
        for w in partners {
            self.vertices[w].paired.remove(&v1);
            if w == v0 {
                continue;
            }
            self.propose_pair(w, v0)?;
        }

        self.vertices[v1].mark_removed();

        // Step 4: re-cost every pair against the moved survivor.
        let neighbours: Vec<usize> = self.vertices[v0].paired.iter().copied().collect();
        for w in neighbours {
            self.propose_pair(w, v0)?;
        }

        Ok(self.live_triangles < before)
    }

    /// Pop the cheapest candidate that is still valid, or `None` when the
    /// queue runs dry.
    pub fn pop_valid_candidate(&mut self) -> Option<VertexPair> {
        self.scheduler.pop_valid(&self.vertices)
    }
}
