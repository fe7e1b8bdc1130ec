use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::menu::get_options,
        handlers::cart::create_session,
        handlers::cart::get_cart,
        handlers::cart::add_line,
        handlers::cart::clear_cart,
        handlers::cart::get_summary,
        handlers::order::submit_order,
        handlers::order::get_today_orders,
    ),
    components(
        schemas(
            ItemKind,
            MenuRow,
            AddOn,
            MenuFilters,
            MenuNarrowing,
            MenuOptionsResponse,
            Sweetness,
            IceLevel,
            Customization,
            OrderLine,
            AddLineRequest,
            SubmitOrderRequest,
            SubmitOrderResponse,
            SessionCreatedResponse,
            CartView,
            SummaryEntry,
            VendorSummary,
            SubmittedOrderRecord,
            TodayOrdersResponse,
        )
    ),
    tags(
        (name = "menu", description = "Menu narrowing API"),
        (name = "cart", description = "Cart and session API"),
        (name = "order", description = "Order submission and daily dashboard API"),
    ),
    info(
        title = "Menu Magician Backend API",
        version = "1.0.0",
        description = "點餐魔術師 group ordering REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
