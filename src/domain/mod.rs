// Domain layer: payload model, text encodings and ports. No HTTP here.

pub mod encoding;
pub mod model;
pub mod ports;
