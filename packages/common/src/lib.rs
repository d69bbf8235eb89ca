pub mod competition_status;
pub mod credential_status;
pub mod event;
pub mod notification_kind;
pub mod storage;

pub use competition_status::CompetitionStatus;
pub use credential_status::{CredentialStatus, ParseStatusError, ReviewAction};
pub use notification_kind::NotificationKind;
