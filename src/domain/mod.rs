// Domain layer: job postings, skill sets and the ports the pipeline is built on.

pub mod model;
pub mod ports;
