pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod percentiles;
pub mod pipeline;
pub mod positions;
pub mod prototypes;
pub mod rates;
pub mod rosters;
pub mod schema;
pub mod season_merge;
pub mod table;

pub use error::TableError;
pub use positions::Position;
pub use table::{Cell, StatTable};
