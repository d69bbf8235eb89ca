pub mod competition;
pub mod credential;
pub mod notification;
pub mod role;
pub mod role_permission;
pub mod user;
pub mod user_badge;
