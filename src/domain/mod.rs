// Domain layer: deposition models and the port the upload flow talks through.

pub mod model;
pub mod ports;
