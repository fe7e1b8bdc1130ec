use crate::models::*;
use crate::services::MenuService;
use actix_web::{HttpResponse, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/menu/options",
    tag = "menu",
    params(
        ("region" = Option<String>, Query, description = "区域（分享连结 hint，无效值静默忽略）"),
        ("category" = Option<String>, Query, description = "分类"),
        ("shop" = Option<String>, Query, description = "店家"),
        ("item" = Option<String>, Query, description = "品項")
    ),
    responses(
        (status = 200, description = "逐层收窄后的选单内容", body = MenuOptionsResponse)
    )
)]
pub async fn get_options(
    menu_service: web::Data<MenuService>,
    query: web::Query<MenuFilters>,
) -> Result<HttpResponse> {
    let narrowing = menu_service.options(&query).await;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": MenuOptionsResponse::from(narrowing)
    })))
}

pub fn menu_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/menu").route("/options", web::get().to(get_options)));
}
