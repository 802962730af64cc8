pub mod error;
pub mod game_journal;
pub mod operation_log;
pub mod recorder;
pub mod speech_log;

pub use error::JournalError;
pub use game_journal::GameJournal;
pub use operation_log::{OperationDetails, OperationKind, OperationLog, OperationLogEntry};
pub use recorder::{ChannelRecorder, GameRecorder, JournalEvent, LogRecorder, NoopRecorder};
pub use speech_log::SpeechLog;
