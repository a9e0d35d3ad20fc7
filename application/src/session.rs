use domain::session::{ChatHistory, DocumentInfo, Message};
use infrastructure::vector_index::VectorIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Indexed,
}

/// Everything one user interaction sequence owns: the transcript, the
/// indexed document and its vectors. Mutated only through `RagService`.
#[derive(Debug, Default)]
pub struct Session {
    pub id: String,
    pub(crate) history: ChatHistory,
    pub(crate) document: Option<DocumentInfo>,
    pub(crate) index: VectorIndex,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        if self.document.is_some() {
            SessionState::Indexed
        } else {
            SessionState::Empty
        }
    }

    pub fn is_document_processed(&self) -> bool {
        self.document.is_some()
    }

    pub fn document(&self) -> Option<&DocumentInfo> {
        self.document.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        self.history.messages()
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub(crate) fn clear(&mut self) {
        self.history.clear();
        self.document = None;
        self.index.clear();
    }
}
