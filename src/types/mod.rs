pub mod bar;
pub mod instrument;
pub mod signal;

pub use bar::*;
pub use instrument::*;
pub use signal::*;
