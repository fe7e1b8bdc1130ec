pub mod menu_service;
pub mod order_service;

pub use menu_service::*;
pub use order_service::*;
