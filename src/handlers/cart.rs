use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/sessions",
    tag = "cart",
    responses(
        (status = 200, description = "建立点餐 session", body = SessionCreatedResponse)
    )
)]
pub async fn create_session(order_service: web::Data<OrderService>) -> Result<HttpResponse> {
    let created = order_service.create_session().await;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": created
    })))
}

#[utoipa::path(
    get,
    path = "/cart/{session_id}",
    tag = "cart",
    params(
        ("session_id" = Uuid, Path, description = "点餐 session")
    ),
    responses(
        (status = 200, description = "购物车内容", body = CartView),
        (status = 404, description = "session 不存在")
    )
)]
pub async fn get_cart(
    order_service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match order_service.cart(path.into_inner()).await {
        Ok(cart) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": cart
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/cart/{session_id}/lines",
    tag = "cart",
    request_body = AddLineRequest,
    params(
        ("session_id" = Uuid, Path, description = "点餐 session")
    ),
    responses(
        (status = 200, description = "加入订单行后的购物车", body = CartView),
        (status = 400, description = "选择不完整或参数错误"),
        (status = 404, description = "session 不存在"),
        (status = 409, description = "换店需要明确确认")
    )
)]
pub async fn add_line(
    order_service: web::Data<OrderService>,
    path: web::Path<Uuid>,
    request: web::Json<AddLineRequest>,
) -> Result<HttpResponse> {
    match order_service
        .add_line(path.into_inner(), request.into_inner())
        .await
    {
        Ok(cart) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": cart
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/cart/{session_id}",
    tag = "cart",
    params(
        ("session_id" = Uuid, Path, description = "点餐 session")
    ),
    responses(
        (status = 200, description = "清空后的购物车", body = CartView),
        (status = 404, description = "session 不存在")
    )
)]
pub async fn clear_cart(
    order_service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match order_service.clear_cart(path.into_inner()).await {
        Ok(cart) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": cart
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/cart/{session_id}/summary",
    tag = "cart",
    params(
        ("session_id" = Uuid, Path, description = "点餐 session")
    ),
    responses(
        (status = 200, description = "给店家的小抄", body = VendorSummary),
        (status = 400, description = "购物车没有内容"),
        (status = 404, description = "session 不存在")
    )
)]
pub async fn get_summary(
    order_service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match order_service.vendor_summary(path.into_inner()).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cart_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/sessions").route("", web::post().to(create_session)))
        .service(
            web::scope("/cart")
                .route("/{session_id}", web::get().to(get_cart))
                .route("/{session_id}", web::delete().to(clear_cart))
                .route("/{session_id}/lines", web::post().to(add_line))
                .route("/{session_id}/summary", web::get().to(get_summary)),
        );
}
