use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::listing::ListingParams;
use crate::services::ProjectService;

// 懒加载的全局 ProjectService 实例
static PROJECT_SERVICE: Lazy<ProjectService> = Lazy::new(ProjectService::new_lazy);

pub async fn list_projects(
    req: HttpRequest,
    query: web::Query<ListingParams>,
) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE.list_projects(&req, query.into_inner()).await
}

pub async fn list_programs() -> ActixResult<HttpResponse> {
    PROJECT_SERVICE.list_programs().await
}

// 配置路由
pub fn configure_project_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/projects")
            .route("", web::get().to(list_projects))
            .route("/programs", web::get().to(list_programs)),
    );
}
