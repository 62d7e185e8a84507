pub mod climate;
pub mod dates;
pub mod db;
mod routes;
mod startup;
mod templates;
mod utils;

pub use climate::{Climate, Error, PrecipitationByDate};
pub use dates::{normalize_date_input, year_ago, DateInputError};
pub use db::*;
pub use routes::*;
pub use startup::*;
pub use utils::*;
