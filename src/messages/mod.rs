pub mod log;
pub mod types;

pub use log::MessageLog;
pub use types::{AudioAttachment, Message, MessageContent, Sender};
