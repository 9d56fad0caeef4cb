//! Export parametric wing and fin models to the XFlr5 analysis format.
//!
//! The library turns a set of cubic Bézier guide curves (leading edge,
//! trailing edge, optional twist/thickness/interpolation curves) and a pair
//! of airfoil cross-section meshes into an XFlr5 aircraft XML file plus the
//! airfoil coordinate `.dat` files it references.

pub mod airfoil;
pub mod algorithms;
pub mod config;
pub mod errors;
pub mod export;
pub mod geometry;
pub mod section;
