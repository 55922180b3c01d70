pub mod email;
pub mod notification;
pub mod retry;
pub mod transaction;
