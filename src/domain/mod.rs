// Domain layer: lead model, outbound email and the sender port. No I/O here.

pub mod model;
pub mod ports;
