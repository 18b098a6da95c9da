// Domain layer: the property model mirrored from the CMS and the ports the
// core talks through.

pub mod model;
pub mod ports;
