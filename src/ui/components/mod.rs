//! UI components
//!
//! Each component borrows the state it renders plus the [`Theme`](crate::ui::Theme).

pub mod banner;
pub mod header;
pub mod input_bar;
pub mod message_list;

pub use banner::{AlertDialog, Banner};
pub use header::{Header, TUTOR_NAME};
pub use input_bar::InputBar;
pub use message_list::MessageList;
