// Domain layer: record model and the fetcher port. No transport code here.

pub mod model;
pub mod ports;
