pub mod city_data;
pub mod error;
pub mod locations;

pub use city_data::*;
pub use error::*;
pub use locations::*;
