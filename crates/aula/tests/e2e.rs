// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end conversations over seeded academic records.
//!
//! A scripted LLM stands in for the chat-completions endpoint; storage, the
//! tool catalog and the orchestration loop are real.

use aula_core::types::Message;
use aula_core::{AulaError, LlmResponse, Role, ToolCall};
use aula_test_utils::{ScriptedLlm, TestHarness};
use serde_json::Value;

fn tool_result(messages: &[Message], call_id: &str) -> Value {
    let message = messages
        .iter()
        .find(|m| m.role == Role::Tool && m.tool_call_id.as_deref() == Some(call_id))
        .unwrap_or_else(|| panic!("no result for {call_id}"));
    serde_json::from_str(message.content.as_deref().unwrap()).unwrap()
}

#[tokio::test]
async fn average_by_course_name() {
    let llm = ScriptedLlm::with_responses(vec![
        ScriptedLlm::tool_call(
            "call_1",
            "consultar_media",
            r#"{"discipline":"Software Engineering"}"#,
        ),
        LlmResponse::text("Sua média em Software Engineering é 7.5."),
    ]);
    let harness = TestHarness::builder().with_llm(llm).build().await.unwrap();

    let reply = harness.ask("qual minha média em engenharia de software?").await.unwrap();
    assert!(reply.answer.contains("7.5"));

    let messages = harness.messages(&reply.conversation_id).await.unwrap();
    let report = tool_result(&messages, "call_1");
    assert_eq!(report["code"], "SE101");
    assert_eq!(report["average"], 7.5);
    assert_eq!(report["status"], "in_progress");
    assert_eq!(report["method"], "weighted");
}

#[tokio::test]
async fn absence_recorded_then_queried_in_one_turn() {
    let llm = ScriptedLlm::with_responses(vec![
        ScriptedLlm::tool_call("call_1", "registrar_falta", r#"{"discipline":"DB201"}"#),
        ScriptedLlm::tool_call("call_2", "consultar_frequencia", r#"{"discipline":"DB201"}"#),
        LlmResponse::text("Falta registrada; agora são 5."),
    ]);
    let harness = TestHarness::builder().with_llm(llm).build().await.unwrap();

    let reply = harness.ask("faltei hoje em bancos de dados").await.unwrap();
    assert_eq!(reply.rounds, 2);

    let messages = harness.messages(&reply.conversation_id).await.unwrap();
    let recorded = tool_result(&messages, "call_1");
    assert_eq!(recorded["date"], "2025-11-17");
    assert_eq!(recorded["absences"], 5);

    let attendance = tool_result(&messages, "call_2");
    assert_eq!(attendance["absences"], 5);
    assert_eq!(attendance["records"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn several_calls_in_one_round_answer_in_order() {
    let llm = ScriptedLlm::with_responses(vec![
        LlmResponse::tool_calls(vec![
            ToolCall::function("call_a", "situacao_geral", "{}"),
            ToolCall::function("call_b", "proxima_aula", "{}"),
        ]),
        LlmResponse::text("Calculus I está em risco; a próxima aula é hoje às 14:00."),
    ]);
    let harness = TestHarness::builder().with_llm(llm).build().await.unwrap();

    let reply = harness.ask("como estou?").await.unwrap();
    assert_eq!(reply.rounds, 1);

    let messages = harness.messages(&reply.conversation_id).await.unwrap();
    let ids: Vec<_> = messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .map(|m| m.tool_call_id.as_deref().unwrap())
        .collect();
    assert_eq!(ids, ["call_a", "call_b"]);

    let overview = tool_result(&messages, "call_a");
    assert_eq!(overview["at_risk"][0]["code"], "MAT101");
    let next = tool_result(&messages, "call_b");
    assert_eq!(next["class"]["code"], "MAT101");
    assert_eq!(next["days_until"], 0);
}

#[tokio::test]
async fn unseeded_student_gets_tool_errors_not_failures() {
    let llm = ScriptedLlm::with_responses(vec![
        ScriptedLlm::tool_call("call_1", "consultar_media", r#"{"discipline":"SE101"}"#),
        LlmResponse::text("Não encontrei essa disciplina."),
    ]);
    let harness = TestHarness::builder()
        .with_llm(llm)
        .empty()
        .build()
        .await
        .unwrap();

    let reply = harness.ask("minha média?").await.unwrap();
    let messages = harness.messages(&reply.conversation_id).await.unwrap();
    let result = tool_result(&messages, "call_1");
    assert!(result["error"].as_str().is_some(), "got: {result}");
}

#[tokio::test]
async fn round_bound_surfaces_as_could_not_complete() {
    let harness = TestHarness::builder()
        .with_llm(ScriptedLlm::always_calling("listar_disciplinas", "{}"))
        .with_max_tool_rounds(2)
        .build()
        .await
        .unwrap();

    let err = harness.ask("loop").await.unwrap_err();
    assert!(matches!(err, AulaError::ToolRoundsExceeded { rounds: 2 }));
    assert!(err.to_string().starts_with("assistant could not complete the request"));
}
