pub mod brightness;
pub mod config;
pub mod constants;
pub mod driver;
pub mod marker;
pub mod positions;
pub mod price;
pub mod scheduler;

pub use brightness::*;
pub use config::*;
pub use constants::*;
pub use driver::*;
pub use marker::*;
pub use positions::*;
pub use price::*;
pub use scheduler::*;
