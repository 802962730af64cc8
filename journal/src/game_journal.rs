use types::{AllSpeeches, GamePhase, PlayerId, Round, Speech};

use crate::{
    GameRecorder, JournalEvent, NoopRecorder, OperationLog, OperationLogEntry, SpeechLog,
};

pub struct GameJournal {
    speeches: SpeechLog,
    operations: OperationLog,
    recorder: Box<dyn GameRecorder>,
}

impl std::fmt::Debug for GameJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameJournal")
            .field("speeches", &self.speeches.len())
            .field("operations", &self.operations.len())
            .finish()
    }
}

impl Default for GameJournal {
    fn default() -> Self {
        Self::new(Box::new(NoopRecorder))
    }
}

impl GameJournal {
    pub fn new(recorder: Box<dyn GameRecorder>) -> Self {
        Self {
            speeches: SpeechLog::new(),
            operations: OperationLog::new(),
            recorder,
        }
    }

    pub fn speeches(&self) -> &SpeechLog {
        &self.speeches
    }

    pub fn all_speeches(&self) -> &AllSpeeches {
        self.speeches.all()
    }

    pub fn operations(&self) -> &[OperationLogEntry] {
        self.operations.entries()
    }

    pub fn recent_operations(&self, count: usize) -> &[OperationLogEntry] {
        self.operations.recent(count)
    }

    pub fn add_speech(&mut self, round: Round, speech: Speech) {
        self.speeches.add(round, speech.clone());
        self.emit(JournalEvent::Speech { round, speech });
    }

    pub fn announce(&mut self, round: Round, content: impl Into<String>) {
        self.add_speech(round, Speech::system(content));
    }

    pub fn log_phase_change(&mut self, phase: GamePhase, round: Round) {
        let entry = self.operations.log_phase_change(phase, round).clone();
        self.emit(JournalEvent::Operation(entry));
    }

    pub fn log_player_request(&mut self, player_id: PlayerId, action: &str) {
        let entry = self.operations.log_player_request(player_id, action).clone();
        self.emit(JournalEvent::Operation(entry));
    }

    pub fn log_player_response(&mut self, player_id: PlayerId, action: &str, result: Option<&str>) {
        let entry = self
            .operations
            .log_player_response(player_id, action, result)
            .clone();
        self.emit(JournalEvent::Operation(entry));
    }

    pub fn log_system_action(&mut self, message: impl Into<String>) {
        let entry = self.operations.log_system_action(message).clone();
        self.emit(JournalEvent::Operation(entry));
    }

    pub fn log_result(&mut self, message: impl Into<String>) {
        let entry = self.operations.log_result(message).clone();
        self.emit(JournalEvent::Operation(entry));
    }

    pub fn log_phase_complete(&mut self, phase: GamePhase) {
        let entry = self.operations.log_phase_complete(phase).clone();
        self.emit(JournalEvent::Operation(entry));
    }

    // A recorder that fails once is dropped for the rest of the game.
    fn emit(&mut self, event: JournalEvent) {
        if let Err(err) = self.recorder.record(&event) {
            tracing::warn!("Recorder failed to take journal event, detaching it: {err}");
            self.recorder = Box::new(NoopRecorder);
        }
    }
}
