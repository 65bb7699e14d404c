//! Mesh simplification by quadric-error-metric edge collapse
//!
//! Vertices carry a quadric summing the squared-distance terms of the
//! planes around them. Candidate pairs (triangle edges plus vertices closer
//! than a threshold) are kept in a cost-ordered queue; the cheapest one is
//! merged, the surrounding topology rewired and the neighbouring pairs
//! re-costed, until the requested share of triangles remains.
//!
//! ```no_run
//! use meshslim_core::TriangleMesh;
//! use meshslim_simplification::{MeshSimplifier, QuadricErrorSimplifier, SimplifyParams};
//!
//! # fn run(mesh: &TriangleMesh) -> meshslim_core::Result<()> {
//! let simplifier = QuadricErrorSimplifier::with_params(SimplifyParams::with_ratio(0.25));
//! let result = simplifier.simplify(mesh)?;
//! println!("{} triangles left", result.mesh.face_count());
//! # Ok(())
//! # }
//! ```

pub mod element;
pub mod quadric;
pub mod scheduler;
pub mod mesh;
pub mod candidates;
pub mod contraction;
pub mod driver;
pub mod params;

pub use element::{Triangle, Vertex};
pub use quadric::Quadric;
pub use scheduler::{pair_key, ContractionScheduler, PairKey, VertexPair};
pub use mesh::SimplificationMesh;
pub use driver::{target_triangle_count, QuadricErrorSimplifier, SimplificationReport, SimplifyOutcome};
pub use params::{ContractionPlacement, SimplifyParams, DEFAULT_PROXIMITY_THRESHOLD};

use meshslim_core::{Result, TriangleMesh};

/// Output of a [`MeshSimplifier`]: the simplified mesh and how it got there.
#[derive(Debug, Clone)]
pub struct SimplificationResult {
    pub mesh: TriangleMesh,
    pub report: SimplificationReport,
}

/// Simplify a mesh by reducing the number of faces/vertices
pub trait MeshSimplifier {
    /// Simplify `mesh`, keeping the share of triangles configured on the
    /// simplifier.
    fn simplify(&self, mesh: &TriangleMesh) -> Result<SimplificationResult>;
}
