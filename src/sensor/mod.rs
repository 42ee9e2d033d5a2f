mod decoder;
mod smoothing;
mod transport;

pub use decoder::*;
pub use smoothing::*;
pub use transport::*;
