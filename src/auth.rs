mod authenticated_user;
mod bearer;

pub use authenticated_user::AuthenticatedUser;
pub use bearer::BearerToken;
