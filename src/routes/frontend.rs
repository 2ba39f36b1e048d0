//! 展示页前端资源
//!
//! 前端构建产物通过 rust-embed 编译进二进制。未命中的路径回退到 index.html，
//! 以 `api/` 开头的路径除外，它们返回 JSON 形式的 404。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const INDEX: &str = "index.html";

fn mime_for(path: &str) -> &'static str {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match ext {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        "woff" => "font/woff",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// 构建产物在 `assets/` 下且文件名带 hash，可以长期缓存
fn is_immutable(path: &str) -> bool {
    path.starts_with("assets/") && !path.ends_with(".html")
}

/// 把 index.html 中的 `%SYSTEM_NAME%` 替换为配置中的站点名称
fn render_index(content: &[u8], system_name: &str) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace("%SYSTEM_NAME%", system_name)
        .into_bytes()
}

/// 解析请求路径对应的资源，未命中时回退到 index.html
fn resolve(path: &str) -> Option<(String, Vec<u8>)> {
    let path = path.trim_start_matches('/');
    if !path.is_empty()
        && let Some(file) = FrontendAssets::get(path)
    {
        return Some((path.to_string(), file.data.into_owned()));
    }
    FrontendAssets::get(INDEX).map(|file| (INDEX.to_string(), file.data.into_owned()))
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let tail = req.match_info().query("tail");

    if tail.trim_start_matches('/').starts_with("api/") {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "接口不存在",
        )));
    }

    let system_name = &AppConfig::get().app.system_name;

    let Some((path, data)) = resolve(tail) else {
        return Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(format!(
                "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{system_name}</title></head>\
                 <body><h1>{system_name}</h1><p>前端资源未构建。</p></body></html>"
            )));
    };

    let mime = mime_for(&path);
    let body = if path == INDEX {
        render_index(&data, system_name)
    } else {
        data
    };

    let mut response = HttpResponse::Ok();
    response.content_type(mime);
    if is_immutable(&path) {
        response.insert_header(("Cache-Control", "public, max-age=31536000, immutable"));
    } else {
        response.insert_header(("Cache-Control", "no-cache"));
    }
    Ok(response.body(body))
}

/// 配置前端路由，必须最后注册
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("index.html"), "text/html; charset=utf-8");
        assert_eq!(mime_for("assets/app.1a2b.js"), "application/javascript; charset=utf-8");
        assert_eq!(mime_for("poster"), "application/octet-stream");
    }

    #[test]
    fn test_only_hashed_assets_are_immutable() {
        assert!(is_immutable("assets/index.1a2b.css"));
        assert!(!is_immutable("index.html"));
        assert!(!is_immutable("favicon.ico"));
    }

    #[test]
    fn test_render_index_injects_name() {
        let html = b"<title>%SYSTEM_NAME%</title>";
        assert_eq!(
            render_index(html, "Expo Polnes"),
            b"<title>Expo Polnes</title>".to_vec()
        );
    }
}
