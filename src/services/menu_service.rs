use crate::error::{AppError, AppResult};
use crate::external::MenuSheet;
use crate::models::*;
use std::sync::Arc;

#[derive(Clone)]
pub struct MenuService {
    menu_sheet: Arc<MenuSheet>,
}

impl MenuService {
    pub fn new(menu_sheet: Arc<MenuSheet>) -> Self {
        Self { menu_sheet }
    }

    /// 取目前菜单并逐层收窄。filters 同时扮演分享连结 hint 的角色：
    /// 值不在当层选项里就静默退回未选，不报错。
    pub async fn options(&self, filters: &MenuFilters) -> MenuNarrowing {
        let rows = self.menu_sheet.rows().await;
        narrow(&rows, filters)
    }

    /// 点餐用：四层都要选到具体值，解析出唯一品项与可用加料
    pub async fn resolve_item(&self, filters: &MenuFilters) -> AppResult<(MenuRow, Vec<AddOn>)> {
        let rows = self.menu_sheet.rows().await;
        let narrowing = narrow(&rows, filters);
        let Some(resolved) = narrowing.resolved else {
            return Err(AppError::ValidationError(
                "品項不存在或尚未選齊區域/分類/店家/品項".to_string(),
            ));
        };
        Ok((resolved, narrowing.addons))
    }
}

/// 收窄一张菜单表。kind = addon 的行不进可点清单，
/// 只用来补店家共用加料。
pub fn narrow(rows: &[MenuRow], filters: &MenuFilters) -> MenuNarrowing {
    let selectable: Vec<&MenuRow> = rows.iter().filter(|r| r.kind != ItemKind::Addon).collect();

    let mut narrowing = MenuNarrowing {
        regions: distinct(selectable.iter().map(|r| r.region.as_str())),
        ..Default::default()
    };

    let Some(region) = pick(&filters.region, &narrowing.regions) else {
        return narrowing;
    };
    let in_region: Vec<&MenuRow> = selectable
        .iter()
        .copied()
        .filter(|r| r.region == region)
        .collect();
    narrowing.categories = Some(distinct(in_region.iter().map(|r| r.category.as_str())));
    narrowing.selected.region = Some(region);

    let Some(category) = pick(&filters.category, narrowing.categories.as_ref().unwrap()) else {
        return narrowing;
    };
    let in_category: Vec<&MenuRow> = in_region
        .iter()
        .copied()
        .filter(|r| r.category == category)
        .collect();
    narrowing.shops = Some(distinct(in_category.iter().map(|r| r.shop.as_str())));
    narrowing.selected.category = Some(category);

    let Some(shop) = pick(&filters.shop, narrowing.shops.as_ref().unwrap()) else {
        return narrowing;
    };
    let in_shop: Vec<&MenuRow> = in_category
        .iter()
        .copied()
        .filter(|r| r.shop == shop)
        .collect();
    narrowing.items = Some(distinct(in_shop.iter().map(|r| r.item_name.as_str())));
    narrowing.selected.shop = Some(shop);

    let Some(item) = pick(&filters.item, narrowing.items.as_ref().unwrap()) else {
        return narrowing;
    };

    // 同一家店内 (店家, 品項) 视为唯一，取第一笔
    if let Some(row) = in_shop.iter().copied().find(|r| r.item_name == item) {
        narrowing.addons = merge_addons(row, rows);
        narrowing.resolved = Some(row.clone());
    }
    narrowing.selected.item = Some(item);

    narrowing
}

/// 选定值要是当层的有效选项才算数，否则当作没选（hint 静默失效）
fn pick(selected: &Option<String>, options: &[String]) -> Option<String> {
    selected
        .as_ref()
        .filter(|v| options.iter().any(|o| o == *v))
        .cloned()
}

/// 去重但保持第一次出现的顺序，不排序
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
