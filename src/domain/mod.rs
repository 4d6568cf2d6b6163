// Domain layer: artwork/valuation models and the port to the valuation service.

pub mod model;
pub mod ports;
