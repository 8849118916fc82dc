pub mod config_loader;
pub mod domain;
pub mod infrastructure;
pub mod strategies;

pub use domain::constants::*;
pub use domain::enums::*;
pub use domain::events::*;
pub use domain::model::book::*;
pub use domain::model::exchange::*;
pub use domain::model::order::*;
pub use domain::traits::*;
pub use infrastructure::exchange::sim::*;
pub use strategies::inside_spread::*;
