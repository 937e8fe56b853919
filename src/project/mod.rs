pub mod availability;
pub mod lock;
pub mod paths;
