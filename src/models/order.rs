use crate::models::menu::AddOn;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// 甜度（固定选项，对应表单上的下拉选单）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sweetness {
    Normal,
    Half,
    Light,
    None,
}

impl std::fmt::Display for Sweetness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sweetness::Normal => write!(f, "正常糖"),
            Sweetness::Half => write!(f, "半糖"),
            Sweetness::Light => write!(f, "微糖"),
            Sweetness::None => write!(f, "無糖"),
        }
    }
}

/// 冰块/温度（固定选项）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IceLevel {
    NormalIce,
    LessIce,
    LightIce,
    NoIce,
    RoomTemp,
    Warm,
    Hot,
}

impl std::fmt::Display for IceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IceLevel::NormalIce => write!(f, "正常冰"),
            IceLevel::LessIce => write!(f, "少冰"),
            IceLevel::LightIce => write!(f, "微冰"),
            IceLevel::NoIce => write!(f, "去冰"),
            IceLevel::RoomTemp => write!(f, "常溫"),
            IceLevel::Warm => write!(f, "溫"),
            IceLevel::Hot => write!(f, "熱"),
        }
    }
}

/// 饮料类品项的甜度/冰块组合
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Customization {
    pub sweetness: Sweetness,
    pub ice: IceLevel,
}

impl std::fmt::Display for Customization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.sweetness, self.ice)
    }
}

/// 购物车中的一条订单行。
/// 数量与单价都保留结构化栏位，" x{n}" 只存在于 display_text，
/// 用来维持与既有订单纪录相同的文字格式。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub shop: String,
    pub region: String,
    pub item_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
    pub addons: Vec<AddOn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub quantity: u32,
    /// 单份价格（含加料）
    pub unit_total: i64,
    pub line_total: i64,
    pub display_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddLineRequest {
    pub region: String,
    pub category: String,
    pub shop: String,
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweetness: Option<Sweetness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ice: Option<IceLevel>,
    #[serde(default)]
    pub addons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// 换店家时需要明确带 true 才会清空原购物车
    #[serde(default)]
    pub confirm_shop_switch: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitOrderRequest {
    pub session_id: Uuid,
    pub user_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitOrderResponse {
    /// 带好五个栏位的外部表单网址，前端直接转址即可
    pub redirect_url: String,
    pub shop: String,
    pub region: String,
    pub item_text: String,
    pub total: i64,
}
