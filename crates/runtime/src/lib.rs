pub mod frame;
pub mod load;

pub use frame::*;
pub use load::*;
