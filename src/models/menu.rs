use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 菜单表中没有区域/分类栏位时使用的预设值
pub const DEFAULT_GROUP: &str = "其他";

/// 每层选单的第 0 个选项，代表「还没选」
pub const PLACEHOLDER_OPTION: &str = "請選擇...";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum ItemKind {
    #[serde(rename = "drink")]
    Drink,
    #[serde(rename = "food")]
    Food,
    #[serde(rename = "addon")]
    Addon,
}

impl ItemKind {
    /// 宽容解析表格中的类型栏位，未知值一律当作餐点
    pub fn parse_cell(cell: &str) -> Self {
        match cell.trim() {
            "drink" | "飲料" | "饮料" => ItemKind::Drink,
            "addon" | "加料" | "加購" => ItemKind::Addon,
            _ => ItemKind::Food,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Drink => write!(f, "drink"),
            ItemKind::Food => write!(f, "food"),
            ItemKind::Addon => write!(f, "addon"),
        }
    }
}

/// 菜单表的一行：一个可点的品项（或一条店家共用加料）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuRow {
    pub region: String,
    pub category: String,
    pub shop: String,
    pub item_name: String,
    pub unit_price: i64,
    pub kind: ItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addon_spec: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct AddOn {
    pub label: String,
    pub price_delta: i64,
}

/// 四层筛选：区域 → 分类 → 店家 → 品项，粗的一层没选好，细的不算数
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MenuFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

/// 逐层收窄的结果。每层的选项只在更粗的层都选定后才会给出，
/// 顺序维持表格里第一次出现的顺序。
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MenuNarrowing {
    pub regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shops: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    /// hint 校验后实际生效的选择
    pub selected: MenuFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<MenuRow>,
    pub addons: Vec<AddOn>,
}

/// 解析品项自带的加料字串，例如 "珍珠:10,椰果:10"。
/// 接受全形逗号/顿号与全形冒号，格式不对的片段直接跳过。
pub fn parse_addon_spec(spec: &str) -> Vec<AddOn> {
    let mut addons = Vec::new();
    for entry in spec.split([',', '、', '，']) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some((label, price)) = entry.split_once([':', '：']) else {
            continue;
        };
        let label = label.trim();
        let Ok(price_delta) = price.trim().parse::<i64>() else {
            continue;
        };
        if label.is_empty() || price_delta < 0 {
            continue;
        }
        addons.push(AddOn {
            label: label.to_string(),
            price_delta,
        });
    }
    addons
}

/// 合并品项加料与店家共用加料（kind = addon 的行）。
/// 先放品项自带的，再放店家共用的；标签相同时店家共用价格覆盖，
/// 位置保持第一次出现的顺序。
pub fn merge_addons(item_row: &MenuRow, shop_rows: &[MenuRow]) -> Vec<AddOn> {
    let mut merged: Vec<AddOn> = item_row
        .addon_spec
        .as_deref()
        .map(parse_addon_spec)
        .unwrap_or_default();

    for row in shop_rows {
        if row.kind != ItemKind::Addon || row.shop != item_row.shop {
            continue;
        }
        match merged.iter_mut().find(|a| a.label == row.item_name) {
            Some(existing) => existing.price_delta = row.unit_price,
            None => merged.push(AddOn {
                label: row.item_name.clone(),
                price_delta: row.unit_price,
            }),
        }
    }

    merged
}

/// 给前端的下拉选单内容：已出现的层都在第 0 个位置补上占位选项
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuOptionsResponse {
    pub regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shops: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    pub selected: MenuFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<MenuRow>,
    pub addons: Vec<AddOn>,
}

impl From<MenuNarrowing> for MenuOptionsResponse {
    fn from(narrowing: MenuNarrowing) -> Self {
        let with_placeholder = |mut options: Vec<String>| {
            options.insert(0, PLACEHOLDER_OPTION.to_string());
            options
        };
        Self {
            regions: with_placeholder(narrowing.regions),
            categories: narrowing.categories.map(with_placeholder),
            shops: narrowing.shops.map(with_placeholder),
            items: narrowing.items.map(with_placeholder),
            selected: narrowing.selected,
            resolved: narrowing.resolved,
            addons: narrowing.addons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(shop: &str, item: &str, price: i64, kind: ItemKind) -> MenuRow {
        MenuRow {
            region: "台北".to_string(),
            category: DEFAULT_GROUP.to_string(),
            shop: shop.to_string(),
            item_name: item.to_string(),
            unit_price: price,
            kind,
            addon_spec: None,
        }
    }

    #[test]
    fn test_parse_addon_spec() {
        let addons = parse_addon_spec("珍珠:10,椰果:10");
        assert_eq!(addons.len(), 2);
        assert_eq!(addons[0].label, "珍珠");
        assert_eq!(addons[0].price_delta, 10);
        assert_eq!(addons[1].label, "椰果");
    }

    #[test]
    fn test_parse_addon_spec_fullwidth_and_garbage() {
        let addons = parse_addon_spec("珍珠：10、布丁:15,沒有價格,:5,仙草:abc");
        assert_eq!(addons.len(), 2);
        assert_eq!(addons[0].label, "珍珠");
        assert_eq!(addons[1].label, "布丁");
        assert_eq!(addons[1].price_delta, 15);
    }

    #[test]
    fn test_parse_cell_defaults_to_food() {
        assert_eq!(ItemKind::parse_cell("飲料"), ItemKind::Drink);
        assert_eq!(ItemKind::parse_cell("addon"), ItemKind::Addon);
        assert_eq!(ItemKind::parse_cell("主餐"), ItemKind::Food);
        assert_eq!(ItemKind::parse_cell(""), ItemKind::Food);
    }

    #[test]
    fn test_merge_addons_shop_rows_override_price() {
        let mut item = row("50嵐", "珍珠奶茶", 50, ItemKind::Drink);
        item.addon_spec = Some("珍珠:10,椰果:10".to_string());

        let shop_rows = vec![
            row("50嵐", "珍珠", 15, ItemKind::Addon),
            row("50嵐", "布丁", 10, ItemKind::Addon),
            row("別家", "不相干", 99, ItemKind::Addon),
        ];

        let merged = merge_addons(&item, &shop_rows);
        assert_eq!(merged.len(), 3);
        // 珍珠保持第一个位置，价格被店家共用行覆盖
        assert_eq!(merged[0], AddOn { label: "珍珠".to_string(), price_delta: 15 });
        assert_eq!(merged[1].label, "椰果");
        assert_eq!(merged[2].label, "布丁");
    }

    #[test]
    fn test_merge_addons_without_spec() {
        let item = row("50嵐", "四季春茶", 35, ItemKind::Drink);
        let shop_rows = vec![row("50嵐", "珍珠", 10, ItemKind::Addon)];
        let merged = merge_addons(&item, &shop_rows);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].label, "珍珠");
    }
}
