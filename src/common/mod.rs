pub mod types;

pub use types::{Direction, MessagePage, MessageRecord, ReadMessagesQuery, WriteMessageBody};
