use application::session::{Session, SessionState};
use domain::errors::RagError;
use domain::models::Document;
use domain::session::Role;
use tests::{harness, harness_with, letter_vector, FakeEmbeddingModel, FakeLanguageModel};

const SOLAR: &str = "The sun is a star. Planets orbit the sun in elliptical paths. \
Mercury is the closest planet to the sun and Neptune is the farthest.";
const COOKING: &str = "Bread needs flour, water, yeast and salt. Knead the dough, \
let it rise, then bake it in a hot oven until golden.";

fn doc(name: &str, text: &str) -> Document {
    Document::new(name, text.as_bytes().to_vec())
}

#[tokio::test]
async fn ingest_indexes_document_and_stores_upload() {
    let h = harness("ok");
    let mut session = Session::new("s");

    let text = "A".repeat(1500);
    let report = h.service.ingest(&mut session, doc("a.pdf", &text)).await.unwrap();

    assert_eq!(report.chunk_count, 2);
    assert_eq!(report.characters, 1500);
    assert_eq!(report.filename, "a.pdf");
    assert_eq!(std::fs::read(&report.stored_at).unwrap(), text.as_bytes());
    assert!(report.stored_at.starts_with(h.store_dir.path()));

    assert_eq!(session.state(), SessionState::Indexed);
    assert!(session.is_document_processed());
    let starts: Vec<usize> = session.index().entries().iter().map(|e| e.chunk.start).collect();
    assert_eq!(starts, vec![0, 800]);
    assert!(session
        .index()
        .entries()
        .iter()
        .all(|e| e.chunk.char_len() <= 1000));
    assert_eq!(session.document().unwrap().chunk_count, 2);
}

#[tokio::test]
async fn ask_uses_retrieved_context_and_records_turn() {
    let h = harness("Mercury is closest.");
    let mut session = Session::new("s");
    h.service.ingest(&mut session, doc("solar.pdf", SOLAR)).await.unwrap();

    let answer = h
        .service
        .ask(&mut session, "  Which planet is closest to the sun?  ")
        .await
        .unwrap();

    assert_eq!(answer.text, "Mercury is closest.");
    assert_eq!(answer.query, "Which planet is closest to the sun?");
    assert!(!answer.sources.is_empty());
    assert!(answer.sources.len() <= h.service.top_k());

    let prompt = h.language_model.last_prompt().unwrap();
    assert!(prompt.contains("Query-Which planet is closest to the sun?"));
    assert!(prompt.contains("Mercury"));

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "Which planet is closest to the sun?");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "Mercury is closest.");
}

#[tokio::test]
async fn search_hits_come_from_the_document_in_similarity_order() {
    let h = harness_with(
        |mut c| {
            c.chunk_size = 40;
            c.chunk_overlap = 10;
            c.top_k = 3;
            c
        },
        FakeEmbeddingModel::new(),
        FakeLanguageModel::answering("ok"),
    );
    let mut session = Session::new("s");
    h.service.ingest(&mut session, doc("solar.pdf", SOLAR)).await.unwrap();
    assert!(session.index().len() > 3);

    let query = "Neptune farthest";
    let hits = session.index().search(&letter_vector(query), 3).unwrap();
    assert_eq!(hits.len(), 3);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    for hit in &hits {
        let expected: String = SOLAR
            .chars()
            .skip(hit.chunk.start)
            .take(hit.chunk.char_len())
            .collect();
        assert_eq!(hit.chunk.text, expected);
        assert_eq!(hit.chunk.source, "solar.pdf");
    }
}

#[tokio::test]
async fn ask_with_empty_index_still_calls_the_model() {
    let h = harness("I don't know.");
    let mut session = Session::new("s");

    let answer = h.service.ask(&mut session, "What is this about?").await.unwrap();

    assert!(answer.sources.is_empty());
    assert_eq!(answer.text, "I don't know.");
    assert_eq!(h.embedding_model.calls(), 0);
    let prompts = h.language_model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Context-\nAnswer:"));
    assert_eq!(session.messages().len(), 2);
}

#[tokio::test]
async fn new_upload_replaces_previous_document_and_history() {
    let h = harness("answer");
    let mut session = Session::new("s");
    h.service.ingest(&mut session, doc("solar.pdf", SOLAR)).await.unwrap();
    h.service.ask(&mut session, "Q1 about planets").await.unwrap();
    assert_eq!(session.messages().len(), 2);

    h.service.ingest(&mut session, doc("bread.pdf", COOKING)).await.unwrap();

    assert!(session.messages().is_empty());
    assert_eq!(session.document().unwrap().filename, "bread.pdf");
    assert!(session
        .index()
        .entries()
        .iter()
        .all(|e| e.chunk.source == "bread.pdf" && !e.chunk.text.contains("sun")));

    h.service.ask(&mut session, "How is bread baked?").await.unwrap();
    let prompt = h.language_model.last_prompt().unwrap();
    assert!(!prompt.contains("Mercury"));
    assert!(!prompt.contains("Q1 about planets"));
}

#[tokio::test]
async fn reset_gives_no_context_not_a_stale_answer() {
    let h = harness("answer");
    let mut session = Session::new("s");
    h.service.ingest(&mut session, doc("solar.pdf", SOLAR)).await.unwrap();
    h.service.ask(&mut session, "Which planet is farthest?").await.unwrap();

    h.service.reset(&mut session);
    assert_eq!(session.state(), SessionState::Empty);
    assert!(session.index().is_empty());
    assert!(session.messages().is_empty());

    let answer = h.service.ask(&mut session, "Which planet is farthest?").await.unwrap();
    assert!(answer.sources.is_empty());
    let prompt = h.language_model.last_prompt().unwrap();
    assert!(!prompt.contains("Neptune"));
}

#[tokio::test]
async fn clear_history_keeps_the_document() {
    let h = harness("answer");
    let mut session = Session::new("s");
    h.service.ingest(&mut session, doc("solar.pdf", SOLAR)).await.unwrap();
    h.service.ask(&mut session, "Which planet is farthest?").await.unwrap();

    h.service.clear_history(&mut session);

    assert!(session.messages().is_empty());
    assert_eq!(session.state(), SessionState::Indexed);
    let answer = h.service.ask(&mut session, "Which planet is farthest?").await.unwrap();
    assert!(!answer.sources.is_empty());
}

#[tokio::test]
async fn failed_ingestion_leaves_session_empty() {
    let h = harness("answer");
    let mut session = Session::new("s");
    h.service.ingest(&mut session, doc("solar.pdf", SOLAR)).await.unwrap();

    let empty = h.service.ingest(&mut session, doc("empty.pdf", "")).await;
    assert!(matches!(empty, Err(RagError::Ingestion(_))));
    assert_eq!(session.state(), SessionState::Empty);
    assert!(session.index().is_empty());

    let blank = h.service.ingest(&mut session, doc("blank.pdf", "  \n\t ")).await;
    assert!(matches!(blank, Err(RagError::Ingestion(_))));

    let binary = h
        .service
        .ingest(&mut session, Document::new("bin.pdf", vec![0xff, 0xfe, 0x00]))
        .await;
    assert!(matches!(binary, Err(RagError::Ingestion(_))));
    assert_eq!(session.state(), SessionState::Empty);
}

#[tokio::test]
async fn embedding_failure_during_ingest_is_surfaced() {
    let h = harness_with(
        |c| c,
        FakeEmbeddingModel::failing_on("Neptune"),
        FakeLanguageModel::answering("answer"),
    );
    let mut session = Session::new("s");

    let result = h.service.ingest(&mut session, doc("solar.pdf", SOLAR)).await;

    assert!(matches!(result, Err(RagError::Embedding(_))));
    assert_eq!(session.state(), SessionState::Empty);
    assert!(session.index().is_empty());
}

#[tokio::test]
async fn generation_failure_leaves_history_unchanged() {
    let h = harness("first answer");
    let mut session = Session::new("s");
    h.service.ingest(&mut session, doc("solar.pdf", SOLAR)).await.unwrap();
    h.service.ask(&mut session, "first?").await.unwrap();

    h.language_model
        .set_reply(Err(RagError::Generation("timed out".to_string())));
    let failed = h.service.ask(&mut session, "second?").await;
    assert!(matches!(failed, Err(RagError::Generation(_))));
    assert_eq!(session.messages().len(), 2);

    h.language_model.set_reply(Ok("   \n".to_string()));
    let blank = h.service.ask(&mut session, "third?").await;
    assert!(matches!(blank, Err(RagError::Generation(_))));
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.state(), SessionState::Indexed);
}

#[tokio::test]
async fn blank_query_is_rejected_without_model_calls() {
    let h = harness("answer");
    let mut session = Session::new("s");

    let result = h.service.ask(&mut session, "   ").await;

    assert!(matches!(result, Err(RagError::EmptyQuery)));
    assert!(h.language_model.prompts().is_empty());
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn invalid_chunk_settings_are_rejected() {
    let store_dir = tempfile::tempdir().unwrap();
    let mut config = tests::test_config(&store_dir);
    config.chunk_overlap = config.chunk_size;
    let result = application::rag_service::RagService::new(
        &config,
        Box::new(tests::Utf8Extractor),
        std::sync::Arc::new(FakeEmbeddingModel::new()),
        std::sync::Arc::new(FakeLanguageModel::answering("x")),
    );
    assert!(matches!(result, Err(RagError::InvalidSettings(_))));
}
