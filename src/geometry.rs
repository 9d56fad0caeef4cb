pub mod bezier;
pub mod curve3;
pub mod distances3;
