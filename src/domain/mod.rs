// Domain layer: part records, pricing results and the remote evaluation port.

pub mod model;
pub mod ports;
