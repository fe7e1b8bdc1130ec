use crate::config::{MenuSourceConfig, OrderLogConfig};
use crate::error::{AppError, AppResult};
use crate::models::{DEFAULT_GROUP, ItemKind, MenuRow, SubmittedOrderRecord};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct CachedRows<T> {
    rows: Vec<T>,
    fetched_at: Instant,
}

/// 发布成 CSV 的菜单试算表。
/// 快取按时间过期；抓取或解析失败时退成空表，空表同样进快取，
/// 等下一轮 TTL 到了再重抓。
pub struct MenuSheet {
    client: Client,
    config: MenuSourceConfig,
    cache: Mutex<Option<CachedRows<MenuRow>>>,
}

impl MenuSheet {
    pub fn new(config: MenuSourceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            cache: Mutex::new(None),
        }
    }

    pub async fn rows(&self) -> Vec<MenuRow> {
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref()
            && cached.fetched_at.elapsed() < ttl
        {
            return cached.rows.clone();
        }

        let rows = match self.fetch().await {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("Failed to fetch menu sheet, serving empty menu: {e:?}");
                Vec::new()
            }
        };
        *cache = Some(CachedRows {
            rows: rows.clone(),
            fetched_at: Instant::now(),
        });
        rows
    }

    async fn fetch(&self) -> AppResult<Vec<MenuRow>> {
        let body = self
            .client
            .get(&self.config.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let rows = parse_menu_csv(&body)?;
        log::info!("Menu sheet refreshed, rows: {}", rows.len());
        Ok(rows)
    }
}

/// 订单纪录试算表（外部表单写入，这边只读）
pub struct OrderLogSheet {
    client: Client,
    config: OrderLogConfig,
    cache: Mutex<Option<CachedRows<SubmittedOrderRecord>>>,
}

impl OrderLogSheet {
    pub fn new(config: OrderLogConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            cache: Mutex::new(None),
        }
    }

    pub async fn rows(&self) -> Vec<SubmittedOrderRecord> {
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref()
            && cached.fetched_at.elapsed() < ttl
        {
            return cached.rows.clone();
        }

        let rows = match self.fetch().await {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("Failed to fetch order log sheet, serving empty log: {e:?}");
                Vec::new()
            }
        };
        *cache = Some(CachedRows {
            rows: rows.clone(),
            fetched_at: Instant::now(),
        });
        rows
    }

    async fn fetch(&self) -> AppResult<Vec<SubmittedOrderRecord>> {
        let body = self
            .client
            .get(&self.config.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_order_log_csv(&body)
    }
}

/// 按表头别名解析菜单表。区域/分类栏位可以整栏缺席，
/// 缺席时每行补上预设值；缺店家/品项/价格的行直接跳过。
fn parse_menu_csv(body: &str) -> AppResult<Vec<MenuRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader.headers()?.clone();
    let find_col = |aliases: &[&str]| -> Option<usize> {
        headers
            .iter()
            .position(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
    };

    let region_col = find_col(&["region", "區域", "区域", "地區"]);
    let category_col = find_col(&["category", "分類", "分类"]);
    let shop_col = find_col(&["shop", "店家"]);
    let item_col = find_col(&["item", "item_name", "品項", "品项", "品名"]);
    let price_col = find_col(&["price", "unit_price", "價格", "价格"]);
    let kind_col = find_col(&["kind", "type", "類型", "类型"]);
    let addon_col = find_col(&["addons", "addon_spec", "加料", "加購", "加购"]);

    let (Some(shop_col), Some(item_col), Some(price_col)) = (shop_col, item_col, price_col) else {
        return Err(AppError::ExternalApiError(
            "菜单表缺少店家/品項/價格栏位".to_string(),
        ));
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");
        let opt_cell = |idx: Option<usize>| idx.map(&cell).unwrap_or("");

        let shop = cell(shop_col);
        let item_name = cell(item_col);
        let Ok(unit_price) = cell(price_col).parse::<i64>() else {
            continue;
        };
        if shop.is_empty() || item_name.is_empty() || unit_price < 0 {
            continue;
        }

        let region = match opt_cell(region_col) {
            "" => DEFAULT_GROUP,
            v => v,
        };
        let category = match opt_cell(category_col) {
            "" => DEFAULT_GROUP,
            v => v,
        };
        let addon_spec = match opt_cell(addon_col) {
            "" => None,
            v => Some(v.to_string()),
        };

        rows.push(MenuRow {
            region: region.to_string(),
            category: category.to_string(),
            shop: shop.to_string(),
            item_name: item_name.to_string(),
            unit_price,
            kind: ItemKind::parse_cell(opt_cell(kind_col)),
            addon_spec,
        });
    }
    Ok(rows)
}

/// 订单纪录表按栏位位置解析：时间戳、昵称、区域、店家、品项、金额。
/// 第一行是表头，栏位不够的行跳过，金额解析不了就当 0。
fn parse_order_log_csv(body: &str) -> AppResult<Vec<SubmittedOrderRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < 6 {
            continue;
        }
        let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("").to_string();
        let timestamp = cell(0);
        if timestamp.is_empty() {
            continue;
        }
        rows.push(SubmittedOrderRecord {
            timestamp,
            user_name: cell(1),
            region: cell(2),
            shop: cell(3),
            items: cell(4),
            total: cell(5).parse::<i64>().unwrap_or(0),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_menu_csv_full_columns() {
        let body = "區域,分類,店家,品項,價格,類型,加料\n\
                    台北,手搖飲,50嵐,珍珠奶茶,50,drink,\"珍珠:10,椰果:10\"\n\
                    台北,手搖飲,50嵐,珍珠,10,addon,\n\
                    台北,便當,阿明雞腿飯,招牌雞腿飯,120,food,\n";
        let rows = parse_menu_csv(body).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].shop, "50嵐");
        assert_eq!(rows[0].kind, ItemKind::Drink);
        assert_eq!(rows[0].addon_spec.as_deref(), Some("珍珠:10,椰果:10"));
        assert_eq!(rows[1].kind, ItemKind::Addon);
        assert_eq!(rows[2].unit_price, 120);
    }

    #[test]
    fn test_parse_menu_csv_missing_region_and_category() {
        let body = "店家,品項,價格,類型\n50嵐,四季春茶,35,drink\n";
        let rows = parse_menu_csv(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].region, DEFAULT_GROUP);
        assert_eq!(rows[0].category, DEFAULT_GROUP);
    }

    #[test]
    fn test_parse_menu_csv_skips_bad_rows() {
        let body = "店家,品項,價格\n50嵐,珍珠奶茶,50\n50嵐,壞價格,abc\n,沒店家,30\n";
        let rows = parse_menu_csv(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_name, "珍珠奶茶");
    }

    #[test]
    fn test_parse_menu_csv_requires_core_columns() {
        let body = "店家,品項\n50嵐,珍珠奶茶\n";
        assert!(parse_menu_csv(body).is_err());
    }

    #[test]
    fn test_parse_order_log_csv() {
        let body = "時間戳記,暱稱,區域,店家,品項,金額\n\
                    2026/8/7 下午 1:23:45,小明,台北,50嵐,珍珠奶茶 (半糖/少冰) x2,120\n\
                    2026/08/07 09:00:00,小華,台北,阿明雞腿飯,招牌雞腿飯,壞金額\n\
                    短行,只有兩欄\n";
        let rows = parse_order_log_csv(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user_name, "小明");
        assert_eq!(rows[0].total, 120);
        assert_eq!(rows[1].total, 0);
    }
}
