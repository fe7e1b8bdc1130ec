use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/orders/submit",
    tag = "order",
    request_body = SubmitOrderRequest,
    responses(
        (status = 200, description = "外部表单预填网址与订单汇总", body = SubmitOrderResponse),
        (status = 400, description = "昵称空白或购物车是空的"),
        (status = 404, description = "session 不存在")
    )
)]
pub async fn submit_order(
    order_service: web::Data<OrderService>,
    request: web::Json<SubmitOrderRequest>,
) -> Result<HttpResponse> {
    match order_service.submit(&request).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/today",
    tag = "order",
    responses(
        (status = 200, description = "今天（UTC+8）的订单总表", body = TodayOrdersResponse)
    )
)]
pub async fn get_today_orders(order_service: web::Data<OrderService>) -> Result<HttpResponse> {
    let response = order_service.today_orders().await;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": response
    })))
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("/submit", web::post().to(submit_order))
            .route("/today", web::get().to(get_today_orders)),
    );
}
