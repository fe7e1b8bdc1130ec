use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 订单纪录表的一行。栏位按位置取：
/// 时间戳、昵称、区域、店家、品项文字、金额。
/// 时间戳由外部表单在写入时产生，这边只当字串用。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmittedOrderRecord {
    pub timestamp: String,
    pub user_name: String,
    pub region: String,
    pub shop: String,
    pub items: String,
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodayOrdersResponse {
    pub orders: Vec<SubmittedOrderRecord>,
    pub total_amount: i64,
}
