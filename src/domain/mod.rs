pub mod models;
pub mod calculator;
pub mod forms;
pub mod services;
pub mod errors;

pub use models::*;
pub use calculator::*;
pub use forms::*;
pub use services::*;
pub use errors::*;
