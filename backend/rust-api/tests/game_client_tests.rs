use serde_json::json;
use std::sync::Arc;

mod common;
use common::{create_test_state, question_json};
use sparky_api::{
    create_router,
    services::{
        game_store::GameStore,
        question_client::{ClientError, QuestionClient},
        quiz_round::{QuizRound, QUESTIONS_PER_ROUND},
        state_storage::FileStorage,
    },
};

/// Serves a fresh in-memory store on an ephemeral port.
async fn spawn_server() -> String {
    let app = create_router(create_test_state());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", address)
}

async fn import(client: &reqwest::Client, base_url: &str, body: serde_json::Value) {
    let response = client
        .post(format!("{}/questions", base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_level_falls_back_to_space_pool() {
    let base_url = spawn_server().await;
    import(
        &reqwest::Client::new(),
        &base_url,
        json!([question_json(Some("s1"), &["space"]), question_json(Some("l1"), &["level1"])]),
    )
    .await;

    let client = QuestionClient::new(&base_url);
    let level1 = client.questions_for_level(1, QUESTIONS_PER_ROUND).await.unwrap();
    assert_eq!(level1.len(), 1);
    assert_eq!(level1[0].id, "l1");

    let level3 = client.questions_for_level(3, QUESTIONS_PER_ROUND).await.unwrap();
    assert_eq!(level3.len(), 1);
    assert_eq!(level3[0].id, "s1");
}

#[tokio::test]
async fn test_unknown_question_attempt_reports_not_found() {
    let base_url = spawn_server().await;
    let client = QuestionClient::new(base_url);

    let err = client
        .record_attempt(&sparky_api::models::RecordAttemptRequest {
            question_id: "ghost".into(),
            is_correct: true,
        })
        .await
        .unwrap_err();

    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Question not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_full_round_rewards_player_and_records_attempts() {
    let base_url = spawn_server().await;
    import(
        &reqwest::Client::new(),
        &base_url,
        json!([
            question_json(Some("q1"), &["level1"]),
            question_json(Some("q2"), &["level1"]),
            question_json(Some("q3"), &["level1"])
        ]),
    )
    .await;

    let client = QuestionClient::new(&base_url);
    let questions = client.questions_for_level(1, QUESTIONS_PER_ROUND).await.unwrap();
    let mut round = QuizRound::new(1, questions).unwrap();

    // Answer the first question wrong, the rest right
    let mut first = true;
    while let Some(question) = round.current_question() {
        let pick = question
            .answers
            .iter()
            .position(|a| a.is_correct != first)
            .unwrap();
        first = false;
        let outcome = round.answer(pick).unwrap();
        client.record_attempt(&outcome.attempt).await.unwrap();
    }

    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));
    let mut store = GameStore::load(storage.clone());
    round.reward().unwrap().apply(&mut store);

    assert_eq!(store.coins(), 52);
    assert_eq!(store.gears(), 1);
    assert!(store.is_unlocked(2));
    assert_eq!(store.level_score(1).map(|s| s.stars), Some(2));

    // Progress survives a restart
    let reloaded = GameStore::load(storage);
    assert_eq!(reloaded.state(), store.state());

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.len(), 3);
    assert_eq!(stats.iter().map(|s| s.total_attempts).sum::<u64>(), 3);
    assert_eq!(stats.iter().map(|s| s.correct_count).sum::<u64>(), 2);
}
