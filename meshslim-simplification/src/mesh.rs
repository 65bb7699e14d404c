//! Arena of vertices and triangles driven by the simplifier
//!
//! Every vertex and triangle is created by [`SimplificationMesh::load`] and
//! lives in a fixed slot until the mesh is dropped. Contractions only
//! tombstone entries, so slot indices held by triangles, candidate pairs and
//! pairing sets stay valid lookup keys.

use crate::element::{Triangle, Vertex};
use crate::params::ContractionPlacement;
use crate::quadric::Quadric;
use crate::scheduler::ContractionScheduler;
use meshslim_core::{Error, Point3d, Result, TriangleMesh};

const INVALID: usize = usize::MAX;

/// Mutable mesh state of one simplification run.
#[derive(Debug)]
pub struct SimplificationMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) triangles: Vec<Triangle>,
    /// Vertex slots sorted by ascending x, built by candidate generation.
    pub(crate) x_order: Vec<usize>,
    pub(crate) scheduler: ContractionScheduler,
    pub(crate) live_triangles: usize,
    /// Live triangles when the latest `simplify` call started.
    pub(crate) run_start_triangles: usize,
    /// Logical clock, advanced once per applied contraction.
    pub(crate) tick: u64,
    pub(crate) contractions: usize,
    pub(crate) placement: ContractionPlacement,
    pub(crate) quadrics_ready: bool,
}

impl SimplificationMesh {
    /// Build the arena from vertex positions and zero-based triangles.
    pub fn load(positions: Vec<Point3d>, faces: &[[usize; 3]]) -> Result<Self> {
        let mesh = TriangleMesh::from_vertices_and_faces(positions, faces.to_vec());
        mesh.validate()?;

        let mut vertices: Vec<Vertex> = mesh.vertices.into_iter().map(Vertex::new).collect();
        let mut triangles = Vec::with_capacity(faces.len());
        for (ti, face) in faces.iter().enumerate() {
            let t = Triangle::new(
                *face,
                [
                    &vertices[face[0]].position,
                    &vertices[face[1]].position,
                    &vertices[face[2]].position,
                ],
            );
            for &v in &t.vertices() {
                vertices[v].triangles.push(ti);
            }
            triangles.push(t);
        }

        log::info!(
            "Loaded mesh: {} vertices, {} triangles",
            vertices.len(),
            triangles.len()
        );

        Ok(Self {
            live_triangles: triangles.len(),
            run_start_triangles: triangles.len(),
            vertices,
            triangles,
            x_order: Vec::new(),
            scheduler: ContractionScheduler::new(),
            tick: 0,
            contractions: 0,
            placement: ContractionPlacement::default(),
            quadrics_ready: false,
        })
    }

    pub fn from_triangle_mesh(mesh: &TriangleMesh) -> Result<Self> {
        Self::load(mesh.vertices.clone(), &mesh.faces)
    }

    /// Choose where contracted vertices are placed. Affects candidates
    /// proposed afterwards.
    pub fn set_placement(&mut self, placement: ContractionPlacement) {
        self.placement = placement;
    }

    pub fn placement(&self) -> ContractionPlacement {
        self.placement
    }

    /// Set each vertex quadric to the sum of `p * p^T` over the planes of its
    /// incident triangles.
    pub fn accumulate_quadrics(&mut self) {
        log::info!("Calculating quadrics for {} vertices", self.vertices.len());
        for v in self.vertices.iter_mut() {
            let mut q = Quadric::zeros();
            for &t in &v.triangles {
                q += Quadric::from_plane(&self.triangles[t].plane);
            }
            v.quadric = q;
        }
        self.quadrics_ready = true;
    }

    /// Sum over live vertices of each vertex's quadric at its own position.
    pub fn total_error(&self) -> f64 {
        self.vertices
            .iter()
            .filter(|v| !v.is_removed())
            .map(|v| v.quadric.error_at(&v.position))
            .sum()
    }

    /// Surviving vertices and triangles, renumbered densely in slot order.
    pub fn export(&self) -> TriangleMesh {
        let mut remap = vec![INVALID; self.vertices.len()];
        let mut positions = Vec::with_capacity(self.live_vertex_count());
        for (i, v) in self.vertices.iter().enumerate() {
            if !v.is_removed() {
                remap[i] = positions.len();
                positions.push(v.position);
            }
        }

        let faces = self
            .triangles
            .iter()
            .filter(|t| !t.is_removed())
            .map(|t| {
                let [a, b, c] = t.vertices();
                debug_assert!(remap[a] != INVALID && remap[b] != INVALID && remap[c] != INVALID);
                [remap[a], remap[b], remap[c]]
            })
            .collect();

        TriangleMesh::from_vertices_and_faces(positions, faces)
    }

    pub fn live_triangle_count(&self) -> usize {
        self.live_triangles
    }

    pub fn live_vertex_count(&self) -> usize {
        self.vertices.iter().filter(|v| !v.is_removed()).count()
    }

    /// Live triangles at the start of the latest `simplify` call, or the
    /// loaded count before any call.
    pub fn run_start_triangle_count(&self) -> usize {
        self.run_start_triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Contractions applied so far.
    pub fn contractions(&self) -> usize {
        self.contractions
    }

    pub fn vertex(&self, slot: usize) -> Option<&Vertex> {
        self.vertices.get(slot)
    }

    pub fn triangle(&self, slot: usize) -> Option<&Triangle> {
        self.triangles.get(slot)
    }

    pub fn scheduler(&self) -> &ContractionScheduler {
        &self.scheduler
    }

    /// Queued candidates, stale entries included.
    pub fn pending_candidates(&self) -> usize {
        self.scheduler.len()
    }

    /// Verify the topological invariants of the arena.
    ///
    /// Live triangles reference three distinct live vertices and appear in
    /// exactly their corners' incidence lists, live vertices only list live
    /// triangles, pairing sets are symmetric between live vertices, and the
    /// live-triangle counter matches the arena.
    pub fn check_consistency(&self) -> Result<()> {
        let mut live = 0;
        for (ti, t) in self.triangles.iter().enumerate() {
            if t.is_removed() {
                continue;
            }
            live += 1;
            let [a, b, c] = t.vertices();
            if a == b || b == c || a == c {
                return Err(Error::InvariantViolation(format!(
                    "triangle {} has repeated corners {:?}",
                    ti,
                    t.vertices()
                )));
            }
            for v in [a, b, c] {
                if self.vertices[v].is_removed() {
                    return Err(Error::InvariantViolation(format!(
                        "triangle {} references removed vertex {}",
                        ti, v
                    )));
                }
                if !self.vertices[v].triangles.contains(&ti) {
                    return Err(Error::InvariantViolation(format!(
                        "triangle {} missing from incidence list of vertex {}",
                        ti, v
                    )));
                }
            }
        }
        if live != self.live_triangles {
            return Err(Error::InvariantViolation(format!(
                "live triangle counter is {} but {} triangles are live",
                self.live_triangles, live
            )));
        }

        for (vi, v) in self.vertices.iter().enumerate() {
            if v.is_removed() {
                continue;
            }
            for &ti in &v.triangles {
                let t = &self.triangles[ti];
                if t.is_removed() || !t.contains(vi) {
                    return Err(Error::InvariantViolation(format!(
                        "vertex {} lists triangle {} which is removed or does not contain it",
                        vi, ti
                    )));
                }
            }
            for &w in &v.paired {
                let other = &self.vertices[w];
                if w == vi || other.is_removed() || !other.paired.contains(&vi) {
                    return Err(Error::InvariantViolation(format!(
                        "pairing between {} and {} is not symmetric between live vertices",
                        vi, w
                    )));
                }
            }
        }
        Ok(())
    }
}
