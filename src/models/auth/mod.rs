pub mod requests;
pub mod responses;
pub mod session;

pub use requests::{LoginRequest, RegisterRequest, UpdateProfileRequest};
pub use responses::LoginResponse;
pub use session::Actor;
