use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Event channel closed")]
    ChannelClosed,
}
