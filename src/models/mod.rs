pub mod cart;
pub mod menu;
pub mod order;
pub mod order_log;

pub use cart::*;
pub use menu::*;
pub use order::*;
pub use order_log::*;
