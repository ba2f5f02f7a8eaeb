// Domain layer: row models and ports (interfaces). No external dependencies beyond std/serde.

pub mod model;
pub mod ports;
