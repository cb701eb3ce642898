pub mod conversation;
pub mod message;
pub mod read_receipt;
pub mod typing;
pub mod user;

pub use conversation::{Conversation, ConversationKind};
pub use message::{Message, MessageView};
pub use read_receipt::ReadReceipt;
pub use typing::TypingIndicator;
pub use user::User;
