use types::{AllSpeeches, Round, Speech};

#[derive(Clone, Debug, Default)]
pub struct SpeechLog {
    speeches: AllSpeeches,
}

impl SpeechLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, round: Round, speech: Speech) {
        self.speeches.entry(round).or_default().push(speech);
    }

    pub fn round(&self, round: Round) -> &[Speech] {
        self.speeches.get(&round).map_or(&[], Vec::as_slice)
    }

    pub fn all(&self) -> &AllSpeeches {
        &self.speeches
    }

    pub fn len(&self) -> usize {
        self.speeches.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
