// Domain layer: neutral models and ports. No host-specific types here.

pub mod model;
pub mod ports;
