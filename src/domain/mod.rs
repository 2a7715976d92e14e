// Domain layer: notebook values and the ports the build driver talks through.

pub mod model;
pub mod notebook;
pub mod ports;
