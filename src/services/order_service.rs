use crate::config::OrderingConfig;
use crate::error::{AppError, AppResult};
use crate::external::{OrderFormClient, OrderLogSheet};
use crate::models::*;
use crate::services::MenuService;
use crate::utils::{split_quantity_suffix, timestamp_is_on, today_date_strings};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderService {
    menu_service: MenuService,
    order_log: Arc<OrderLogSheet>,
    order_form: Arc<OrderFormClient>,
    ordering: OrderingConfig,
    sessions: Arc<Mutex<HashMap<Uuid, CartSession>>>,
}

impl OrderService {
    pub fn new(
        menu_service: MenuService,
        order_log: Arc<OrderLogSheet>,
        order_form: Arc<OrderFormClient>,
        ordering: OrderingConfig,
    ) -> Self {
        Self {
            menu_service,
            order_log,
            order_form,
            ordering,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn create_session(&self) -> SessionCreatedResponse {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.lock().await;
        sessions.insert(id, CartSession::new(id));
        log::info!("Created ordering session: {id}");
        SessionCreatedResponse { session_id: id }
    }

    pub async fn cart(&self, session_id: Uuid) -> AppResult<CartView> {
        let sessions = self.sessions.lock().await;
        let cart = get_cart(&sessions, session_id)?;
        Ok(CartView::from(cart))
    }

    /// 解析选到的品项、组合成订单行、套用购物车的换店规则
    pub async fn add_line(&self, session_id: Uuid, request: AddLineRequest) -> AppResult<CartView> {
        let filters = MenuFilters {
            region: Some(request.region.clone()),
            category: Some(request.category.clone()),
            shop: Some(request.shop.clone()),
            item: Some(request.item.clone()),
        };
        let (row, available_addons) = self.menu_service.resolve_item(&filters).await?;

        let customization = match (request.sweetness, request.ice) {
            (Some(sweetness), Some(ice)) => Some(Customization { sweetness, ice }),
            (None, None) => None,
            _ => {
                return Err(AppError::ValidationError(
                    "甜度和冰塊要一起選".to_string(),
                ));
            }
        };

        let line = compose(
            &row,
            customization,
            &available_addons,
            &request.addons,
            request.note.as_deref(),
            request.quantity.unwrap_or(1),
            self.ordering.max_quantity,
        )?;

        let mut sessions = self.sessions.lock().await;
        let cart = get_cart_mut(&mut sessions, session_id)?;
        push_line(cart, line, request.confirm_shop_switch)?;
        Ok(CartView::from(&*cart))
    }

    pub async fn clear_cart(&self, session_id: Uuid) -> AppResult<CartView> {
        let mut sessions = self.sessions.lock().await;
        let cart = get_cart_mut(&mut sessions, session_id)?;
        cart.lines.clear();
        log::info!("Cart cleared: {session_id}");
        Ok(CartView::from(&*cart))
    }

    /// 给店家的小抄：目前店家的行，折叠同样配置后累计数量
    pub async fn vendor_summary(&self, session_id: Uuid) -> AppResult<VendorSummary> {
        let sessions = self.sessions.lock().await;
        let cart = get_cart(&sessions, session_id)?;
        let Some(shop) = cart.active_shop.clone() else {
            return Err(AppError::ValidationError(
                "購物車還沒有內容，沒有可以整理的小抄".to_string(),
            ));
        };
        let (entries, total_count) = summarize(&cart.lines, &shop);
        let copy_text = render_copy_text(&shop, &entries);
        Ok(VendorSummary {
            shop,
            entries,
            total_count,
            copy_text,
        })
    }

    /// 产生外部表单的预填网址。送出是 fire-and-forget 转址，
    /// 没有回执，所以这里不清购物车，由使用者自己清。
    pub async fn submit(&self, request: &SubmitOrderRequest) -> AppResult<SubmitOrderResponse> {
        let user_name = request.user_name.trim();
        if user_name.is_empty() {
            return Err(AppError::ValidationError("請先輸入暱稱".to_string()));
        }

        let sessions = self.sessions.lock().await;
        let cart = get_cart(&sessions, request.session_id)?;
        if cart.lines.is_empty() {
            return Err(AppError::ValidationError("購物車是空的".to_string()));
        }
        let (Some(shop), Some(region)) = (cart.active_shop.clone(), cart.active_region.clone())
        else {
            return Err(AppError::ValidationError("購物車是空的".to_string()));
        };

        let item_text = cart
            .lines
            .iter()
            .map(|l| l.display_text.as_str())
            .collect::<Vec<_>>()
            .join("、");
        let total = cart.total();
        let redirect_url = self
            .order_form
            .submission_url(user_name, &region, &shop, &item_text, total);

        log::info!(
            "Order prepared for submission: session={}, shop={}, lines={}, total={}",
            request.session_id,
            shop,
            cart.lines.len(),
            total
        );

        Ok(SubmitOrderResponse {
            redirect_url,
            shop,
            region,
            item_text,
            total,
        })
    }

    /// 今天的订单总表：拿订单纪录表，按 UTC+8 的今天做字串比对过滤
    pub async fn today_orders(&self) -> TodayOrdersResponse {
        let rows = self.order_log.rows().await;
        let (padded, unpadded) = today_date_strings();
        let orders: Vec<SubmittedOrderRecord> = rows
            .into_iter()
            .filter(|r| timestamp_is_on(&r.timestamp, &padded, &unpadded))
            .collect();
        let total_amount = orders.iter().map(|o| o.total).sum();
        TodayOrdersResponse {
            orders,
            total_amount,
        }
    }
}

fn get_cart(sessions: &HashMap<Uuid, CartSession>, id: Uuid) -> AppResult<&CartSession> {
    sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("找不到點餐 session: {id}")))
}

fn get_cart_mut(sessions: &mut HashMap<Uuid, CartSession>, id: Uuid) -> AppResult<&mut CartSession> {
    sessions
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("找不到點餐 session: {id}")))
}

/// 把一个已解析的品项组合成订单行。
/// 文字格式：品名、饮料的 " (甜度/冰塊)"、每个加料一个 "+名稱 "、
/// 备注、数量大于 1 时的 " x{n}"，最后去掉行尾空白。
pub fn compose(
    base_row: &MenuRow,
    customization: Option<Customization>,
    available_addons: &[AddOn],
    chosen_addons: &[String],
    note: Option<&str>,
    quantity: u32,
    max_quantity: u32,
) -> AppResult<OrderLine> {
    if base_row.kind == ItemKind::Addon {
        return Err(AppError::ValidationError(format!(
            "加料不能單獨點：{}",
            base_row.item_name
        )));
    }
    match (base_row.kind, customization.is_some()) {
        (ItemKind::Drink, false) => {
            return Err(AppError::ValidationError(
                "飲料要選甜度和冰塊".to_string(),
            ));
        }
        (ItemKind::Food, true) => {
            return Err(AppError::ValidationError(
                "只有飲料才能選甜度和冰塊".to_string(),
            ));
        }
        _ => {}
    }
    if quantity == 0 || quantity > max_quantity {
        return Err(AppError::ValidationError(format!(
            "數量要在 1 到 {max_quantity} 之間"
        )));
    }

    // 照点选顺序取加料，名称要在这个品项可用的加料里
    let mut addons = Vec::with_capacity(chosen_addons.len());
    for label in chosen_addons {
        let Some(addon) = available_addons.iter().find(|a| &a.label == label) else {
            return Err(AppError::ValidationError(format!("沒有這個加料：{label}")));
        };
        addons.push(addon.clone());
    }

    let note = note
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    let mut text = base_row.item_name.clone();
    if let Some(customization) = &customization {
        text.push_str(&format!(" ({customization})"));
    }
    if !addons.is_empty() {
        text.push(' ');
        for addon in &addons {
            text.push_str(&format!("+{} ", addon.label));
        }
    }
    if let Some(note) = &note {
        if !text.ends_with(' ') {
            text.push(' ');
        }
        text.push_str(note);
    }
    if quantity > 1 {
        text.push_str(&format!(" x{quantity}"));
    }
    let display_text = text.trim_end().to_string();

    let unit_total = base_row.unit_price + addons.iter().map(|a| a.price_delta).sum::<i64>();
    let line_total = unit_total * i64::from(quantity);

    Ok(OrderLine {
        shop: base_row.shop.clone(),
        region: base_row.region.clone(),
        item_name: base_row.item_name.clone(),
        customization,
        addons,
        note,
        quantity,
        unit_total,
        line_total,
        display_text,
    })
}

/// 一车只装一家店：车里已有别家的东西时要明确确认才会清掉换店，
/// 绝不默默清空。
pub fn push_line(cart: &mut CartSession, line: OrderLine, confirm_shop_switch: bool) -> AppResult<()> {
    if let Some(active_shop) = cart.active_shop.clone()
        && active_shop != line.shop
        && !cart.lines.is_empty()
    {
        if !confirm_shop_switch {
            return Err(AppError::ShopSwitchConfirmationRequired(format!(
                "購物車裡是 {active_shop} 的餐點，換到 {} 會整車清空",
                line.shop
            )));
        }
        log::info!(
            "Cart {} switching shop: {} -> {}",
            cart.id,
            active_shop,
            line.shop
        );
        cart.lines.clear();
    }

    cart.active_shop = Some(line.shop.clone());
    cart.active_region = Some(line.region.clone());
    cart.lines.push(line);
    Ok(())
}

/// 分组键是去掉数量后缀的显示文字，顺序保持第一次出现
pub fn summarize(lines: &[OrderLine], shop: &str) -> (Vec<SummaryEntry>, u32) {
    let mut entries: Vec<SummaryEntry> = Vec::new();
    for line in lines.iter().filter(|l| l.shop == shop) {
        let (text, quantity) = split_quantity_suffix(&line.display_text);
        match entries.iter_mut().find(|e| e.text == text) {
            Some(entry) => entry.count += quantity,
            None => entries.push(SummaryEntry {
                text,
                count: quantity,
            }),
        }
    }
    let total_count = entries.iter().map(|e| e.count).sum();
    (entries, total_count)
}

fn render_copy_text(shop: &str, entries: &[SummaryEntry]) -> String {
    let mut text = format!("老闆你好，我要點餐 ({shop})：\n");
    for entry in entries {
        if entry.count > 1 {
            text.push_str(&format!("- {} x{}\n", entry.text, entry.count));
        } else {
            text.push_str(&format!("- {}\n", entry.text));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drink_row() -> MenuRow {
        MenuRow {
            region: "台北".to_string(),
            category: "手搖飲".to_string(),
            shop: "50嵐".to_string(),
            item_name: "珍珠奶茶".to_string(),
            unit_price: 50,
            kind: ItemKind::Drink,
            addon_spec: Some("珍珠:10,椰果:10".to_string()),
        }
    }

    fn food_row() -> MenuRow {
        MenuRow {
            region: "台北".to_string(),
            category: "便當".to_string(),
            shop: "阿明雞腿飯".to_string(),
            item_name: "招牌雞腿飯".to_string(),
            unit_price: 120,
            kind: ItemKind::Food,
            addon_spec: None,
        }
    }

    fn pearl_addons() -> Vec<AddOn> {
        parse_addon_spec("珍珠:10,椰果:10")
    }

    fn half_less() -> Option<Customization> {
        Some(Customization {
            sweetness: Sweetness::Half,
            ice: IceLevel::LessIce,
        })
    }

    #[test]
    fn test_compose_full_scenario() {
        let line = compose(
            &drink_row(),
            half_less(),
            &pearl_addons(),
            &["珍珠".to_string()],
            None,
            2,
            20,
        )
        .unwrap();
        assert_eq!(line.display_text, "珍珠奶茶 (半糖/少冰) +珍珠  x2");
        assert_eq!(line.unit_total, 60);
        assert_eq!(line.line_total, 120);
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_compose_minimal_drink_trims_trailing_space() {
        let line = compose(&drink_row(), half_less(), &pearl_addons(), &[], None, 1, 20).unwrap();
        assert_eq!(line.display_text, "珍珠奶茶 (半糖/少冰)");
        assert_eq!(line.line_total, 50);
    }

    #[test]
    fn test_compose_food_has_no_customization_segment() {
        let line = compose(&food_row(), None, &[], &[], None, 1, 20).unwrap();
        assert!(!line.display_text.contains('('));
        assert!(!line.display_text.contains('/'));
        assert_eq!(line.display_text, "招牌雞腿飯");
    }

    #[test]
    fn test_compose_drink_customization_has_single_slash() {
        for sweetness in [Sweetness::Normal, Sweetness::Half, Sweetness::Light, Sweetness::None] {
            for ice in [IceLevel::NormalIce, IceLevel::NoIce, IceLevel::Hot] {
                let line = compose(
                    &drink_row(),
                    Some(Customization { sweetness, ice }),
                    &[],
                    &[],
                    None,
                    1,
                    20,
                )
                .unwrap();
                let open = line.display_text.find('(').unwrap();
                let close = line.display_text.find(')').unwrap();
                let segment = &line.display_text[open + 1..close];
                assert_eq!(segment.matches('/').count(), 1);
            }
        }
    }

    #[test]
    fn test_compose_note_and_quantity() {
        let line = compose(
            &food_row(),
            None,
            &[],
            &[],
            Some("  不要香菜  "),
            3,
            20,
        )
        .unwrap();
        assert_eq!(line.display_text, "招牌雞腿飯 不要香菜 x3");
        assert_eq!(line.note.as_deref(), Some("不要香菜"));
        assert_eq!(line.line_total, 360);
    }

    #[test]
    fn test_compose_rejects_addon_row() {
        let mut row = drink_row();
        row.kind = ItemKind::Addon;
        row.item_name = "珍珠".to_string();
        assert!(compose(&row, None, &[], &[], None, 1, 20).is_err());
    }

    #[test]
    fn test_compose_rejects_drink_without_customization() {
        assert!(compose(&drink_row(), None, &[], &[], None, 1, 20).is_err());
    }

    #[test]
    fn test_compose_rejects_customized_food() {
        assert!(compose(&food_row(), half_less(), &[], &[], None, 1, 20).is_err());
    }

    #[test]
    fn test_compose_rejects_unknown_addon() {
        let result = compose(
            &drink_row(),
            half_less(),
            &pearl_addons(),
            &["仙草".to_string()],
            None,
            1,
            20,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_compose_quantity_bounds() {
        assert!(compose(&food_row(), None, &[], &[], None, 0, 20).is_err());
        assert!(compose(&food_row(), None, &[], &[], None, 21, 20).is_err());
        assert!(compose(&food_row(), None, &[], &[], None, 20, 20).is_ok());
    }

    #[test]
    fn test_push_line_requires_confirmation_to_switch_shop() {
        let mut cart = CartSession::new(Uuid::new_v4());
        let drink = compose(&drink_row(), half_less(), &[], &[], None, 1, 20).unwrap();
        push_line(&mut cart, drink, false).unwrap();

        let food = compose(&food_row(), None, &[], &[], None, 1, 20).unwrap();
        // 没确认：报错、购物车不动
        let err = push_line(&mut cart, food.clone(), false).unwrap_err();
        assert!(matches!(err, AppError::ShopSwitchConfirmationRequired(_)));
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.active_shop.as_deref(), Some("50嵐"));

        // 确认后整车清空换店
        push_line(&mut cart, food, true).unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.active_shop.as_deref(), Some("阿明雞腿飯"));
    }

    #[test]
    fn test_push_line_same_shop_accumulates() {
        let mut cart = CartSession::new(Uuid::new_v4());
        let a = compose(&drink_row(), half_less(), &[], &[], None, 1, 20).unwrap();
        let b = compose(&drink_row(), half_less(), &[], &[], None, 2, 20).unwrap();
        push_line(&mut cart, a, false).unwrap();
        push_line(&mut cart, b, false).unwrap();
        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.total(), 150);
    }

    #[test]
    fn test_summarize_folds_quantity_suffixes() {
        let mut cart = CartSession::new(Uuid::new_v4());
        let x2 = compose(&drink_row(), half_less(), &[], &[], None, 2, 20).unwrap();
        let x3 = compose(&drink_row(), half_less(), &[], &[], None, 3, 20).unwrap();
        push_line(&mut cart, x2, false).unwrap();
        push_line(&mut cart, x3, false).unwrap();

        let (entries, total) = summarize(&cart.lines, "50嵐");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "珍珠奶茶 (半糖/少冰)");
        assert_eq!(entries[0].count, 5);
        assert_eq!(total, 5);
    }

    #[test]
    fn test_summarize_grand_total_equals_quantity_sum() {
        let mut cart = CartSession::new(Uuid::new_v4());
        for quantity in [1u32, 2, 4] {
            let line = compose(&drink_row(), half_less(), &[], &[], None, quantity, 20).unwrap();
            push_line(&mut cart, line, false).unwrap();
        }
        let (_, total) = summarize(&cart.lines, "50嵐");
        assert_eq!(total, cart.lines.iter().map(|l| l.quantity).sum::<u32>());
    }

    #[test]
    fn test_summarize_filters_other_shops() {
        let mut cart = CartSession::new(Uuid::new_v4());
        let line = compose(&food_row(), None, &[], &[], None, 1, 20).unwrap();
        push_line(&mut cart, line, false).unwrap();
        let (entries, total) = summarize(&cart.lines, "50嵐");
        assert!(entries.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_render_copy_text() {
        let entries = vec![
            SummaryEntry {
                text: "珍珠奶茶 (半糖/少冰)".to_string(),
                count: 5,
            },
            SummaryEntry {
                text: "四季春茶 (無糖/去冰)".to_string(),
                count: 1,
            },
        ];
        let text = render_copy_text("50嵐", &entries);
        assert_eq!(
            text,
            "老闆你好，我要點餐 (50嵐)：\n- 珍珠奶茶 (半糖/少冰) x5\n- 四季春茶 (無糖/去冰)\n"
        );
    }
}
