pub mod auth;
pub mod badge;
pub mod competition;
pub mod credential;
pub mod notification;
