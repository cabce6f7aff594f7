pub mod auth;
pub mod csv;

pub use auth::{is_authorized, parse_expiration, token_expiration};
pub use csv::rows_to_csv;
