//! The bounded two-phase tool loop
//!
//! ```text
//! FirstCompletion ──(no calls)──────────────────────────────▶ Done
//!       │
//!       ▼
//!   Executing ──▶ ContinueDecision ──(failure, budget left)──▶ FirstCompletion
//!                        │
//!                        ▼
//!                 FinalCompletion ──────────────────────────▶ Done
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use crate::decode::{self, CallSource};
use crate::error::Result;
use crate::logging::SharedLogger;
use crate::providers::{new_call_id, LlmAdapter};
use crate::tools::ToolBackend;
use crate::types::{CompletionOptions, Message, ToolCallRecord, ToolDescriptor, ToolPolicy, Transcript};

use super::context::{LoopState, RequestContext};
use super::outcome::OrchestrationOutcome;

/// Maximum tool-execution rounds per call
pub const MAX_TOOL_CHAIN: u32 = 3;

/// Drives completions and tool execution for one conversation turn
pub struct Orchestrator {
    llm: Arc<dyn LlmAdapter>,
    tools: Arc<dyn ToolBackend>,
    options: CompletionOptions,
    max_tool_chain: u32,
    logger: SharedLogger,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LlmAdapter>,
        tools: Arc<dyn ToolBackend>,
        options: CompletionOptions,
        logger: SharedLogger,
    ) -> Self {
        Self {
            llm,
            tools,
            options,
            max_tool_chain: MAX_TOOL_CHAIN,
            logger,
        }
    }

    /// Lower the round budget (values above `MAX_TOOL_CHAIN` are clamped)
    pub fn with_max_tool_chain(mut self, rounds: u32) -> Self {
        self.max_tool_chain = rounds.min(MAX_TOOL_CHAIN);
        self
    }

    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }

    pub fn llm(&self) -> &Arc<dyn LlmAdapter> {
        &self.llm
    }

    pub fn tools(&self) -> &Arc<dyn ToolBackend> {
        &self.tools
    }

    /// Run one turn with the default options
    ///
    /// `catalog` is fetched from the tool backend when `None`.
    pub async fn run(&self, transcript: &Transcript, catalog: Option<Vec<ToolDescriptor>>) -> Result<OrchestrationOutcome> {
        self.run_with_options(transcript, catalog, self.options.clone()).await
    }

    pub async fn run_with_options(
        &self,
        transcript: &Transcript,
        catalog: Option<Vec<ToolDescriptor>>,
        options: CompletionOptions,
    ) -> Result<OrchestrationOutcome> {
        let catalog = match catalog {
            Some(catalog) => catalog,
            None => self.tools.list_tools().await,
        };
        let mut ctx = RequestContext::new(transcript, catalog, options);
        self.logger.debug(&format!(
            "[Orchestrator] Starting: {} messages, {} tools",
            ctx.transcript.len(),
            ctx.catalog.len()
        ));

        loop {
            ctx.transition(LoopState::FirstCompletion);
            let completion = self
                .llm
                .complete(&ctx.transcript, &ctx.options, &ctx.catalog, ToolPolicy::Auto)
                .await?;

            let decoded = decode::decode(completion);
            for ignored in &decoded.ignored {
                self.logger.debug(&format!("[Orchestrator] Ignored tool-call candidate: {}", ignored));
            }

            if !decoded.has_tool_calls() {
                self.logger.debug("[Orchestrator] No tool calls, returning completion");
                return Ok(self.finish(ctx, decoded.content));
            }

            if decoded.source != CallSource::Structured {
                self.logger.debug(&format!("[Orchestrator] Decoded tool call from {:?} text", decoded.source));
            }

            ctx.transition(LoopState::Executing);
            let calls = unique_ids(decoded.tool_calls);
            let results = self.tools.execute_all(&calls).await;
            ctx.transcript.record_round(decoded.content, calls, &results)?;
            ctx.rounds += 1;

            ctx.transition(LoopState::ContinueDecision);
            let failed = results.iter().filter(|r| !r.success).count();
            self.logger.info(&format!(
                "[Orchestrator] Round {}: {} tool calls, {} failed",
                ctx.rounds,
                results.len(),
                failed
            ));
            ctx.results.extend(results);

            if failed == 0 {
                break;
            }
            if ctx.rounds >= self.max_tool_chain {
                self.logger.warn(&format!(
                    "[Orchestrator] Tool chain limit ({}) reached with failures",
                    self.max_tool_chain
                ));
                break;
            }
        }

        ctx.transition(LoopState::FinalCompletion);
        let final_completion = self
            .llm
            .complete(&ctx.transcript, &ctx.options, &ctx.catalog, ToolPolicy::Disabled)
            .await?;

        Ok(self.finish(ctx, final_completion.content))
    }

    /// One completion without tools
    pub async fn complete_plain(&self, transcript: &Transcript) -> Result<OrchestrationOutcome> {
        let mut ctx = RequestContext::new(transcript, Vec::new(), self.options.clone());
        ctx.transition(LoopState::FinalCompletion);
        let completion = self
            .llm
            .complete(&ctx.transcript, &ctx.options, &[], ToolPolicy::Disabled)
            .await?;
        Ok(self.finish(ctx, completion.content))
    }

    fn finish(&self, mut ctx: RequestContext, content: String) -> OrchestrationOutcome {
        ctx.transition(LoopState::Done);
        ctx.transcript.push(Message::assistant(content.clone()));
        OrchestrationOutcome {
            content,
            tool_results: std::mem::take(&mut ctx.results),
            final_response: true,
            rounds: ctx.rounds,
            transcript: std::mem::take(&mut ctx.transcript),
            states: ctx.into_states(),
        }
    }
}

/// Replace empty or repeated call ids so every result maps to one call
fn unique_ids(calls: Vec<ToolCallRecord>) -> Vec<ToolCallRecord> {
    let mut seen = HashSet::new();
    calls
        .into_iter()
        .map(|mut call| {
            if call.id.is_empty() || !seen.insert(call.id.clone()) {
                call.id = new_call_id();
                seen.insert(call.id.clone());
            }
            call
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::providers::{Completion, MockAdapter, MockReply};
    use crate::tools::OfflineTools;
    use crate::types::MessageRole;

    fn logger() -> SharedLogger {
        Arc::new(NoOpLogger::new())
    }

    fn orchestrator(llm: Arc<MockAdapter>) -> Orchestrator {
        Orchestrator::new(llm, Arc::new(OfflineTools::new()), CompletionOptions::new("mock-model"), logger())
    }

    fn user(text: &str) -> Transcript {
        let mut t = Transcript::new();
        t.push(Message::user(text));
        t
    }

    fn call(id: &str, name: &str, args: &str) -> MockReply {
        Completion::with_tool_calls("", vec![ToolCallRecord::new(id, name, args)]).into()
    }

    #[tokio::test]
    async fn test_no_tool_calls_skips_final_completion() {
        let llm = Arc::new(MockAdapter::fixed("Hello there", logger()));
        let outcome = orchestrator(llm.clone()).run(&user("hi"), None).await.unwrap();

        assert_eq!(outcome.content, "Hello there");
        assert!(outcome.tool_results.is_empty());
        assert_eq!(outcome.rounds, 0);
        assert!(outcome.final_response);
        assert_eq!(llm.call_count(), 1);
        assert_eq!(llm.requests()[0].tools.len(), 3);
        assert_eq!(outcome.states, vec![LoopState::FirstCompletion, LoopState::Done]);
    }

    #[tokio::test]
    async fn test_successful_round_then_final_completion() {
        let llm = Arc::new(MockAdapter::scripted(
            vec![
                call("call_1", "get_product_details", r#"{"query":"router"}"#),
                Completion::text("The Wireless Router costs $149.99.").into(),
            ],
            logger(),
        ));
        let input = user("Find the router");
        let outcome = orchestrator(llm.clone()).run(&input, None).await.unwrap();

        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.content, "The Wireless Router costs $149.99.");
        assert!(outcome.tool_results[0].success);

        let requests = llm.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].policy, ToolPolicy::Auto);
        assert_eq!(requests[1].policy, ToolPolicy::Disabled);
        assert_eq!(requests[1].tools.len(), 3);

        let roles: Vec<_> = requests[1].transcript.iter().map(|m| m.role()).collect();
        assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant, MessageRole::Tool]);
        assert!(requests[1].transcript.validate().is_ok());

        // Caller's transcript is untouched
        assert_eq!(input.len(), 1);
        assert_eq!(outcome.transcript.len(), 4);

        assert_eq!(
            outcome.states,
            vec![
                LoopState::FirstCompletion,
                LoopState::Executing,
                LoopState::ContinueDecision,
                LoopState::FinalCompletion,
                LoopState::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_rounds_loop_back_before_final_completion() {
        let llm = Arc::new(MockAdapter::fixed("giving up", logger()));
        llm.push_reply(call("call_1", "foo_bar", "{}"));
        llm.push_reply(call("call_2", "foo_bar", "{}"));
        let outcome = orchestrator(llm).with_max_tool_chain(2).run(&user("x"), None).await.unwrap();

        use LoopState::*;
        assert_eq!(
            outcome.states,
            vec![
                FirstCompletion,
                Executing,
                ContinueDecision,
                FirstCompletion,
                Executing,
                ContinueDecision,
                FinalCompletion,
                Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_plain_completion_skips_tool_states() {
        let llm = Arc::new(MockAdapter::fixed("plain", logger()));
        let outcome = orchestrator(llm.clone()).complete_plain(&user("x")).await.unwrap();

        assert_eq!(outcome.content, "plain");
        assert_eq!(outcome.states, vec![LoopState::FinalCompletion, LoopState::Done]);
        assert_eq!(llm.requests()[0].policy, ToolPolicy::Disabled);
    }

    #[tokio::test]
    async fn test_failures_continue_until_budget() {
        let llm = Arc::new(MockAdapter::fixed("Sorry, that tool is unavailable.", logger()));
        for _ in 0..MAX_TOOL_CHAIN + 1 {
            llm.push_reply(call("call_x", "foo_bar", "{}"));
        }
        let outcome = orchestrator(llm.clone()).run(&user("do it"), None).await.unwrap();

        assert_eq!(outcome.rounds, MAX_TOOL_CHAIN);
        // The final completion ignores tool calls
        assert_eq!(outcome.content, "");
        assert_eq!(outcome.tool_results.len(), 3);
        assert!(outcome.tool_results.iter().all(|r| !r.success));
        // Three tool-enabled completions plus the final one
        assert_eq!(llm.call_count(), 4);
        assert_eq!(llm.requests()[3].policy, ToolPolicy::Disabled);
    }

    #[tokio::test]
    async fn test_later_round_without_calls_returns_accumulated_results() {
        let llm = Arc::new(MockAdapter::scripted(
            vec![
                call("call_1", "foo_bar", "{}"),
                Completion::text("I could not find that tool.").into(),
            ],
            logger(),
        ));
        let outcome = orchestrator(llm.clone()).run(&user("x"), None).await.unwrap();

        assert_eq!(outcome.content, "I could not find that tool.");
        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.tool_results.len(), 1);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_lowered_chain_limit() {
        let llm = Arc::new(MockAdapter::fixed("giving up", logger()));
        llm.push_reply(call("call_1", "foo_bar", "{}"));
        llm.push_reply(call("call_2", "foo_bar", "{}"));
        let limited = orchestrator(llm.clone()).with_max_tool_chain(1);

        let outcome = limited.run(&user("x"), None).await.unwrap();

        assert_eq!(outcome.rounds, 1);
        assert!(outcome.used_tools());
        assert_eq!(outcome.failed_results().count(), 1);
        assert_eq!(llm.call_count(), 2);
        assert_eq!(orchestrator(Arc::new(MockAdapter::new(logger()))).with_max_tool_chain(10).max_tool_chain, MAX_TOOL_CHAIN);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let llm = Arc::new(MockAdapter::error("connection refused", logger()));
        let err = orchestrator(llm).run(&user("x"), None).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_supplied_catalog_is_used() {
        let llm = Arc::new(MockAdapter::fixed("ok", logger()));
        orchestrator(llm.clone()).run(&user("x"), Some(Vec::new())).await.unwrap();
        assert!(llm.requests()[0].tools.is_empty());
    }

    #[test]
    fn test_unique_ids() {
        let calls = unique_ids(vec![
            ToolCallRecord::new("a", "x", "{}"),
            ToolCallRecord::new("a", "y", "{}"),
            ToolCallRecord::new("", "z", "{}"),
        ]);
        assert_eq!(calls[0].id, "a");
        assert_ne!(calls[1].id, "a");
        assert!(calls[2].id.starts_with("call_"));
    }
}
