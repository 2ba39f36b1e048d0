use std::time::Duration;

use actix_cors::Cors;
use actix_web::http::{Method, header::HeaderName};
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use rust_expo_portal::config::AppConfig;
use rust_expo_portal::models::AppStartTime;
use rust_expo_portal::routes;
use rust_expo_portal::runtime::lifetime;
use rust_expo_portal::utils::{json_error_handler, query_error_handler};

/// 初始化日志，开发环境输出带源码位置的文本，其余环境输出 JSON
///
/// 返回的 guard 需要保持到进程结束，否则缓冲中的日志会丢失。
fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.app.log_level))
        .with_writer(writer)
        .with_level(true);

    if config.is_development() {
        builder
            .with_ansi(true)
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        builder.with_ansi(false).json().init();
    }
    guard
}

/// 按配置构建 CORS，来源列表包含 `*` 时允许任意来源
fn build_cors(config: &AppConfig) -> Cors {
    let cors = &config.cors;
    let mut builder = Cors::default().max_age(cors.max_age);

    if cors.allowed_origins.iter().any(|o| o == "*") {
        builder = builder.allow_any_origin();
    } else {
        for origin in &cors.allowed_origins {
            builder = builder.allowed_origin(origin);
        }
        builder = builder.supports_credentials();
    }

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();
    let headers: Vec<HeaderName> = cors
        .allowed_headers
        .iter()
        .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok())
        .collect();

    builder.allowed_methods(methods).allowed_headers(headers)
}

/// 监听目标，unix 平台配置了 socket 路径时优先使用
enum Listen {
    #[cfg(unix)]
    Socket(String),
    Tcp(String),
}

fn listen_target(config: &AppConfig) -> Listen {
    #[cfg(unix)]
    if let Some(path) = config.unix_socket_path() {
        return Listen::Socket(path.to_string());
    }
    Listen::Tcp(config.server_bind_address())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    setup_panic!();

    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();
    let _log_guard = init_tracing(config);

    info!(
        "{} v{} ({}) starting",
        config.app.system_name,
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    let startup = lifetime::startup::prepare_server_startup().await;
    let storage = startup.storage.clone();
    let cache = startup.cache.clone();

    debug!(
        "Startup finished in {} ms, {} workers",
        chrono::Utc::now()
            .signed_duration_since(app_start_time.start_datetime)
            .num_milliseconds(),
        config.server.workers
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(config))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add((
                        "Keep-Alive",
                        format!("timeout={}", config.server.timeouts.keep_alive),
                    ))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(routes::configure_auth_routes)
            .configure(routes::configure_user_routes)
            .configure(routes::configure_project_routes)
            .configure(routes::configure_submissions_routes)
            .configure(routes::configure_admin_routes)
            .configure(routes::configure_file_routes)
            // SPA 回退，必须最后注册
            .configure(routes::configure_frontend_routes)
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(config.server.timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    let server = match listen_target(config) {
        #[cfg(unix)]
        Listen::Socket(path) => {
            warn!("Listening on unix socket {}", path);
            if std::path::Path::new(&path).exists() {
                std::fs::remove_file(&path)?;
            }
            server.bind_uds(&path)?.run()
        }
        Listen::Tcp(address) => {
            warn!("Listening on http://{}", address);
            server.bind(address)?.run()
        }
    };

    tokio::select! {
        res = server => res?,
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Shutdown signal received, server stopped");
        }
    }

    Ok(())
}
