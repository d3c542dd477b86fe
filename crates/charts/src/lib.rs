pub mod animation;
pub mod composer;
pub mod options;
pub mod radar;
pub mod selector;
pub mod series;

pub use animation::*;
pub use composer::*;
pub use options::*;
pub use radar::*;
pub use selector::*;
pub use series::*;
