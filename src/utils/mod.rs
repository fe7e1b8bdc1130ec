pub mod datetime;
pub mod quantity;

pub use datetime::{timestamp_is_on, today_date_strings};
pub use quantity::split_quantity_suffix;
