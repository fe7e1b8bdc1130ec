use crate::models::order::OrderLine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// 一个点餐 session 的购物车。一个购物车同一时间只属于一家店。
#[derive(Debug, Clone)]
pub struct CartSession {
    pub id: Uuid,
    pub active_region: Option<String>,
    pub active_shop: Option<String>,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
}

impl CartSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            active_region: None,
            active_shop: None,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn total(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total).sum()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartView {
    pub session_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop: Option<String>,
    pub lines: Vec<OrderLine>,
    pub line_count: usize,
    pub total: i64,
}

impl From<&CartSession> for CartView {
    fn from(cart: &CartSession) -> Self {
        Self {
            session_id: cart.id,
            region: cart.active_region.clone(),
            shop: cart.active_shop.clone(),
            lines: cart.lines.clone(),
            line_count: cart.lines.len(),
            total: cart.total(),
        }
    }
}

/// 给店家小抄里的一条：同样配置折叠成一条并累计数量
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummaryEntry {
    pub text: String,
    pub count: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorSummary {
    pub shop: String,
    pub entries: Vec<SummaryEntry>,
    pub total_count: u32,
    /// 可以直接复制贴给店家的文字
    pub copy_text: String,
}
