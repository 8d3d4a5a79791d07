//! Interpolation helpers shared by curve sampling and baking.

pub mod functions;
