use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use menu_magician_backend::{
    config::Config,
    external::{MenuSheet, OrderFormClient, OrderLogSheet},
    handlers,
    middlewares::create_cors,
    services::{MenuService, OrderService},
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 两张外部表：菜单（读）与订单纪录（读），还有写入用的外部表单
    let menu_sheet = Arc::new(MenuSheet::new(config.menu_source.clone()));
    let order_log = Arc::new(OrderLogSheet::new(config.order_log.clone()));
    let order_form = Arc::new(OrderFormClient::new(config.order_form.clone()));

    // 启动时先抓一次菜单把快取暖起来；抓不到也照常启动（退成空菜单）
    let warm_rows = menu_sheet.rows().await;
    if warm_rows.is_empty() {
        log::warn!("Menu is empty at startup, check menu_source.url");
    }

    // 创建服务
    let menu_service = MenuService::new(menu_sheet.clone());
    let order_service = OrderService::new(
        menu_service.clone(),
        order_log.clone(),
        order_form.clone(),
        config.ordering.clone(),
    );

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(menu_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::menu_config)
                    .configure(handlers::cart_config)
                    .configure(handlers::order_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
