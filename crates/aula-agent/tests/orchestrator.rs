// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use aula_core::{AcademicStore, AulaError, LlmResponse, Role, ToolCall};
use aula_test_utils::{PERIOD, STUDENT_ID, ScriptedLlm, TestHarness};

fn roles(messages: &[aula_core::types::Message]) -> Vec<Role> {
    messages.iter().map(|m| m.role).collect()
}

#[tokio::test]
async fn tool_rounds_then_answer_persist_every_message_once() {
    let llm = ScriptedLlm::with_responses(vec![
        ScriptedLlm::tool_call("call_a", "listar_disciplinas", "{}"),
        ScriptedLlm::tool_call("call_b", "consultar_frequencia", r#"{"discipline":"DB201"}"#),
        LlmResponse::text("Você tem 4 faltas em Databases."),
    ]);
    let harness = TestHarness::builder().with_llm(llm).build().await.unwrap();

    let reply = harness.ask("quantas faltas em bancos?").await.unwrap();
    assert_eq!(reply.answer, "Você tem 4 faltas em Databases.");
    assert_eq!(reply.rounds, 2);

    let messages = harness.messages(&reply.conversation_id).await.unwrap();
    assert_eq!(
        roles(&messages),
        [
            Role::User,
            Role::Assistant,
            Role::Tool,
            Role::Assistant,
            Role::Tool,
            Role::Assistant
        ]
    );
    assert_eq!(messages[2].tool_call_id.as_deref(), Some("call_a"));
    assert_eq!(messages[4].tool_call_id.as_deref(), Some("call_b"));
    assert!(messages[4].content.as_deref().unwrap().contains("\"absences\":4"));
    assert_eq!(harness.llm.invocations().await, 3);
}

#[tokio::test]
async fn tool_calls_are_echoed_verbatim_with_one_result_each() {
    let calls = vec![
        ToolCall::function("call_1", "consultar_media", r#"{"discipline":"SE101"}"#),
        ToolCall::function("call_2", "proxima_aula", "{}"),
    ];
    let llm = ScriptedLlm::with_responses(vec![
        LlmResponse::tool_calls(calls.clone()),
        LlmResponse::text("pronto"),
    ]);
    let harness = TestHarness::builder().with_llm(llm).build().await.unwrap();
    harness.ask("média e próxima aula").await.unwrap();

    let requests = harness.llm.requests().await;
    assert_eq!(requests.len(), 2);
    let first = &requests[0];
    assert_eq!(first.messages[0].role, Role::System);
    assert_eq!(first.messages[0].content.as_deref(), Some("You are a test assistant."));
    assert_eq!(first.tools.len(), 10);

    let second = &requests[1].messages;
    let n = second.len();
    assert_eq!(second[n - 3].calls(), calls.as_slice());
    assert_eq!(second[n - 2].tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(second[n - 1].tool_call_id.as_deref(), Some("call_2"));
    assert!(second[n - 1].content.as_deref().unwrap().contains("Calculus I"));
}

#[tokio::test]
async fn endless_tool_calls_fail_at_the_round_bound() {
    let harness = TestHarness::builder()
        .with_llm(ScriptedLlm::always_calling("listar_disciplinas", "{}"))
        .with_max_tool_rounds(3)
        .build()
        .await
        .unwrap();

    let err = harness.ask("loop").await.unwrap_err();
    assert!(matches!(err, AulaError::ToolRoundsExceeded { rounds: 3 }), "got {err:?}");
    assert!(err.to_string().starts_with("assistant could not complete the request"));
    assert_eq!(harness.llm.invocations().await, 4);

    let conversations = harness.orchestrator.conversations("user-1").await.unwrap();
    let messages = harness.messages(&conversations[0].id).await.unwrap();
    assert_eq!(roles(&messages), [Role::User]);
}

#[tokio::test]
async fn tool_errors_are_fed_back_not_fatal() {
    let llm = ScriptedLlm::with_responses(vec![
        ScriptedLlm::tool_call("call_x", "apagar_tudo", "{}"),
        ScriptedLlm::tool_call("call_y", "consultar_media", "{broken"),
        ScriptedLlm::tool_call("call_z", "consultar_media", r#"{"discipline":"Astronomy"}"#),
        LlmResponse::text("Desculpe, não encontrei essa disciplina."),
    ]);
    let harness = TestHarness::builder().with_llm(llm).build().await.unwrap();

    let reply = harness.ask("média de astronomia?").await.unwrap();
    assert_eq!(reply.rounds, 3);

    let messages = harness.messages(&reply.conversation_id).await.unwrap();
    let tool_results: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .map(|m| m.content.as_deref().unwrap())
        .collect();
    assert_eq!(tool_results[0], r#"{"error":"function 'apagar_tudo' is not mapped"}"#);
    assert!(tool_results[1].contains("invalid arguments"));
    assert!(tool_results[2].contains("no course matching 'Astronomy'"));
}

#[tokio::test]
async fn llm_failure_is_fatal_and_keeps_only_the_user_message() {
    let llm = ScriptedLlm::with_responses(vec![ScriptedLlm::tool_call(
        "call_1",
        "listar_disciplinas",
        "{}",
    )]);
    llm.push_failure(502, "Bad Gateway").await;
    let harness = TestHarness::builder().with_llm(llm).build().await.unwrap();

    let err = harness.ask("oi").await.unwrap_err();
    assert_eq!(err.status(), Some(502));

    let conversations = harness.orchestrator.conversations("user-1").await.unwrap();
    let messages = harness.messages(&conversations[0].id).await.unwrap();
    assert_eq!(roles(&messages), [Role::User]);
}

#[tokio::test]
async fn slow_model_times_out() {
    let harness = TestHarness::builder()
        .with_llm(ScriptedLlm::new().with_delay(Duration::from_secs(5)))
        .with_call_timeout(Duration::from_millis(300))
        .build()
        .await
        .unwrap();

    let err = harness.ask("oi").await.unwrap_err();
    match err {
        AulaError::Timeout { operation, .. } => assert_eq!(operation, "llm invoke"),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn follow_up_turn_replays_the_transcript() {
    let harness = TestHarness::builder().build().await.unwrap();
    let first = harness.ask("primeira").await.unwrap();
    let second = harness.ask_in(&first.conversation_id, "segunda").await.unwrap();
    assert_eq!(first.conversation_id, second.conversation_id);

    let requests = harness.llm.requests().await;
    let replayed: Vec<Option<&str>> = requests[1]
        .messages
        .iter()
        .map(|m| m.content.as_deref())
        .collect();
    assert_eq!(
        replayed,
        [
            Some("You are a test assistant."),
            Some("primeira"),
            Some("mock response"),
            Some("segunda")
        ]
    );
}

#[tokio::test]
async fn concurrent_turns_on_one_conversation_do_not_interleave() {
    let harness = TestHarness::builder()
        .with_llm(ScriptedLlm::new().with_delay(Duration::from_millis(50)))
        .build()
        .await
        .unwrap();
    let conversation = harness.ask("abre").await.unwrap().conversation_id;

    let (a, b) = tokio::join!(
        harness.ask_in(&conversation, "um"),
        harness.ask_in(&conversation, "dois")
    );
    a.unwrap();
    b.unwrap();

    let messages = harness.messages(&conversation).await.unwrap();
    assert_eq!(
        roles(&messages),
        [
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant
        ]
    );
}

#[tokio::test]
async fn foreign_or_missing_conversation_is_not_found() {
    let harness = TestHarness::builder().empty().build().await.unwrap();
    let reply = harness.ask("oi").await.unwrap();

    let stranger = harness
        .request("posso ver?")
        .in_conversation(reply.conversation_id.clone());
    let stranger = aula_agent::TurnRequest {
        user_id: "intruder".into(),
        ..stranger
    };
    let err = harness.orchestrator.handle_turn(stranger).await.unwrap_err();
    assert!(matches!(err, AulaError::NotFound { entity: "conversation", .. }));

    let err = harness.ask_in("missing", "oi").await.unwrap_err();
    assert!(matches!(err, AulaError::NotFound { .. }));
    assert_eq!(harness.messages(&reply.conversation_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn score_entry_through_the_loop_recomputes_the_enrollment() {
    let llm = ScriptedLlm::with_responses(vec![
        ScriptedLlm::tool_call(
            "call_1",
            "lancar_nota",
            r#"{"discipline":"Software Engineering","evaluation":"Prova 2","score":8}"#,
        ),
        LlmResponse::text("Nota lançada; sua média agora é 7.7 e você está aprovado."),
    ]);
    let harness = TestHarness::builder().with_llm(llm).build().await.unwrap();
    harness.ask("tirei 8 na prova 2 de engenharia").await.unwrap();

    let views = harness
        .storage
        .enrollments_for_student(STUDENT_ID, Some(PERIOD))
        .await
        .unwrap();
    let se = views.iter().find(|v| v.course.code == "SE101").unwrap();
    assert_eq!(se.enrollment.average, 7.7);
    assert_eq!(se.enrollment.status.to_string(), "approved");
}
