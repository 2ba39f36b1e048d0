pub mod admin;

pub mod auth;

pub mod users;

pub mod projects;

pub mod submissions;

pub mod files;

pub mod frontend;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use files::configure_file_routes;
pub use frontend::configure_frontend_routes;
pub use projects::configure_project_routes;
pub use submissions::configure_submissions_routes;
pub use users::configure_user_routes;
