pub mod cart;
pub mod menu;
pub mod order;

pub use cart::cart_config;
pub use menu::menu_config;
pub use order::order_config;
