//! Simplification driver
//!
//! Pops the cheapest valid candidate and contracts it until the live
//! triangle count reaches the target. Contractions are never undone.

use crate::mesh::SimplificationMesh;
use crate::params::SimplifyParams;
use crate::{MeshSimplifier, SimplificationResult};
use meshslim_core::{Error, Result, TriangleMesh};
use serde::{Deserialize, Serialize};

/// Terminal state of a simplification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimplifyOutcome {
    /// The target triangle count was reached.
    Done,
    /// The candidate queue ran dry before the target was reached.
    Exhausted,
}

/// Summary of one simplification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplificationReport {
    pub outcome: SimplifyOutcome,
    pub original_triangles: usize,
    pub target_triangles: usize,
    pub final_triangles: usize,
    pub final_vertices: usize,
    pub contractions: usize,
    pub discarded_candidates: usize,
    pub total_error: f64,
}

impl SimplificationReport {
    /// Summarise the latest `simplify` call on `mesh`, which asked for
    /// `ratio`.
    pub fn from_mesh(mesh: &SimplificationMesh, ratio: f64, outcome: SimplifyOutcome) -> Self {
        let original = mesh.run_start_triangle_count();
        Self {
            outcome,
            original_triangles: original,
            target_triangles: target_triangle_count(original, ratio),
            final_triangles: mesh.live_triangle_count(),
            final_vertices: mesh.live_vertex_count(),
            contractions: mesh.contractions(),
            discarded_candidates: mesh.scheduler().discarded(),
            total_error: mesh.total_error(),
        }
    }

    /// Ratio of live triangles actually kept (final / original).
    pub fn achieved_ratio(&self) -> f64 {
        if self.original_triangles == 0 {
            1.0
        } else {
            self.final_triangles as f64 / self.original_triangles as f64
        }
    }
}

/// `floor(live * ratio)`, never above `live`.
pub fn target_triangle_count(live: usize, ratio: f64) -> usize {
    if ratio >= 1.0 {
        live
    } else {
        (live as f64 * ratio).floor() as usize
    }
}

fn check_ratio(ratio: f64) -> Result<()> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidData(format!(
            "ratio must be a positive number, got {}",
            ratio
        )))
    }
}

impl SimplificationMesh {
    /// Contract candidates until at most `floor(live * ratio)` triangles
    /// remain, or until no valid candidate is left.
    pub fn simplify(&mut self, ratio: f64) -> Result<SimplifyOutcome> {
        check_ratio(ratio)?;
        let start = self.live_triangles;
        self.run_start_triangles = start;
        let target = target_triangle_count(start, ratio);
        log::info!(
            "Start simplifying. Ratio: {}, triangles: {} -> {}",
            ratio,
            start,
            target
        );

        while self.live_triangles > target {
            let pair = match self.pop_valid_candidate() {
                Some(pair) => pair,
                None => {
                    log::warn!(
                        "Candidate queue exhausted at {}/{} triangles (target {})",
                        self.live_triangles,
                        start,
                        target
                    );
                    return Ok(SimplifyOutcome::Exhausted);
                }
            };
            if self.contract(&pair)? {
                log::debug!("Current triangles: {}/{}", self.live_triangles, start);
            }
        }

        log::debug!(
            "Simplification done after {} contractions, {} stale candidates discarded",
            self.contractions,
            self.scheduler.discarded()
        );
        Ok(SimplifyOutcome::Done)
    }
}

/// Quadric-error-metric simplifier running the full
/// load / quadrics / pairs / contract / export pipeline.
#[derive(Debug, Clone, Default)]
pub struct QuadricErrorSimplifier {
    pub params: SimplifyParams,
}

impl QuadricErrorSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: SimplifyParams) -> Self {
        Self { params }
    }
}

impl MeshSimplifier for QuadricErrorSimplifier {
    fn simplify(&self, mesh: &TriangleMesh) -> Result<SimplificationResult> {
        check_ratio(self.params.ratio)?;

        let mut arena = SimplificationMesh::from_triangle_mesh(mesh)?;
        arena.set_placement(self.params.placement);
        arena.accumulate_quadrics();
        arena.generate_candidates(self.params.proximity_threshold)?;
        let outcome = arena.simplify(self.params.ratio)?;

        let report = SimplificationReport::from_mesh(&arena, self.params.ratio, outcome);
        log::info!(
            "Simplified to {} triangles ({:.3} of original), total error {}",
            report.final_triangles,
            report.achieved_ratio(),
            report.total_error
        );

        Ok(SimplificationResult {
            mesh: arena.export(),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshslim_core::Point3d;

    fn make_tetrahedron() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.5, 1.0, 0.0),
                Point3d::new(0.5, 0.5, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
    }

    #[test]
    fn test_target_triangle_count() {
        assert_eq!(target_triangle_count(12, 0.5), 6);
        assert_eq!(target_triangle_count(7, 0.5), 3);
        assert_eq!(target_triangle_count(12, 1.0), 12);
        assert_eq!(target_triangle_count(12, 3.0), 12);
        assert_eq!(target_triangle_count(12, 0.01), 0);
    }

    #[test]
    fn test_invalid_ratio() {
        let mut mesh = SimplificationMesh::from_triangle_mesh(&make_tetrahedron()).unwrap();
        mesh.accumulate_quadrics();
        assert!(mesh.simplify(0.0).is_err());
        assert!(mesh.simplify(-0.5).is_err());
        assert!(mesh.simplify(f64::NAN).is_err());
    }

    #[test]
    fn test_ratio_one_is_immediately_done() {
        let mut mesh = SimplificationMesh::from_triangle_mesh(&make_tetrahedron()).unwrap();
        mesh.accumulate_quadrics();
        mesh.generate_candidates(0.01).unwrap();
        assert_eq!(mesh.simplify(1.0).unwrap(), SimplifyOutcome::Done);
        assert_eq!(mesh.contractions(), 0);
        assert_eq!(mesh.live_triangle_count(), 4);
    }

    #[test]
    fn test_exhausted_without_candidates() {
        let mut mesh = SimplificationMesh::from_triangle_mesh(&make_tetrahedron()).unwrap();
        mesh.accumulate_quadrics();
        assert_eq!(mesh.simplify(0.5).unwrap(), SimplifyOutcome::Exhausted);
        assert_eq!(mesh.live_triangle_count(), 4);
    }

    #[test]
    fn test_tetrahedron_simplification() {
        let mut mesh = SimplificationMesh::from_triangle_mesh(&make_tetrahedron()).unwrap();
        mesh.accumulate_quadrics();
        mesh.generate_candidates(0.01).unwrap();
        assert_eq!(mesh.simplify(0.5).unwrap(), SimplifyOutcome::Done);
        assert!(mesh.live_triangle_count() <= 2);
        assert!(mesh.check_consistency().is_ok());
    }

    #[test]
    fn test_simplifier_report() {
        let s = QuadricErrorSimplifier::with_params(SimplifyParams::with_ratio(0.5));
        let result = s.simplify(&make_tetrahedron()).unwrap();
        assert_eq!(result.report.outcome, SimplifyOutcome::Done);
        assert_eq!(result.report.original_triangles, 4);
        assert_eq!(result.report.target_triangles, 2);
        assert_eq!(result.report.final_triangles, result.mesh.face_count());
        assert_eq!(result.report.final_vertices, result.mesh.vertex_count());
        assert!(result.report.contractions >= 1);
        assert!(result.report.achieved_ratio() <= 0.5);
    }

    #[test]
    fn test_report_covers_latest_run_only() {
        let mut mesh = SimplificationMesh::load(
            (0..5)
                .flat_map(|y| {
                    (0..5).map(move |x| {
                        Point3d::new(x as f64, y as f64, (x * y) as f64 * 0.1)
                    })
                })
                .collect(),
            &(0..4usize)
                .flat_map(|y| {
                    (0..4usize).flat_map(move |x| {
                        let tl = y * 5 + x;
                        [[tl, tl + 5, tl + 1], [tl + 1, tl + 5, tl + 6]]
                    })
                })
                .collect::<Vec<[usize; 3]>>(),
        )
        .unwrap();
        mesh.accumulate_quadrics();
        mesh.generate_candidates(0.01).unwrap();

        assert_eq!(mesh.simplify(0.5).unwrap(), SimplifyOutcome::Done);
        let after_first = mesh.live_triangle_count();
        assert!(after_first <= 16);

        let outcome = mesh.simplify(0.5).unwrap();
        let report = SimplificationReport::from_mesh(&mesh, 0.5, outcome);
        assert_eq!(report.original_triangles, after_first);
        assert_eq!(report.target_triangles, after_first / 2);
        assert!(report.final_triangles <= report.target_triangles);
        assert!(report.achieved_ratio() <= 0.5);
    }

    #[test]
    fn test_simplifier_rejects_bad_ratio() {
        let s = QuadricErrorSimplifier::with_params(SimplifyParams::with_ratio(0.0));
        assert!(s.simplify(&make_tetrahedron()).is_err());
    }
}
