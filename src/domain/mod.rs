pub mod models;
pub mod services;
pub mod errors;
pub mod validation;

pub use models::*;
pub use services::*;
pub use errors::*;
pub use validation::*;
