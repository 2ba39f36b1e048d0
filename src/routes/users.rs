//! 管理员账号管理路由，整个 scope 需要管理员角色

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{CreateUserRequest, UserListParams};
use crate::services::UserService;
use crate::utils::SafeIDI64;

static USERS: Lazy<UserService> = Lazy::new(UserService::new_lazy);

async fn list(req: HttpRequest, query: web::Query<UserListParams>) -> ActixResult<HttpResponse> {
    USERS.list_users(query.into_inner(), &req).await
}

async fn create(
    req: HttpRequest,
    body: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USERS.create_user(body.into_inner(), &req).await
}

async fn detail(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    USERS.get_user(id.0, &req).await
}

pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(RequireRole::new_any(UserRole::admin_roles()))
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list))
                    .route(web::post().to(create)),
            )
            .route("/{id}", web::get().to(detail)),
    );
}
