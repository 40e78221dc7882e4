// Domain layer: request/message models and the collaborator ports.

pub mod model;
pub mod ports;
