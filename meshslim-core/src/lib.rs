//! Core data structures for meshslim
//!
//! This crate provides the value types shared by the simplification engine,
//! the OBJ reader/writer and the command-line tool: points, indexed triangle
//! meshes and the workspace error type.

pub mod point;
pub mod mesh;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
