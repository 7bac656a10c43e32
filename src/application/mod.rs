pub mod ports;
pub mod services;
pub mod use_cases;

pub use services::*;
pub use use_cases::*;
