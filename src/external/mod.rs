pub mod order_form;
pub mod sheets;

pub use order_form::*;
pub use sheets::*;
