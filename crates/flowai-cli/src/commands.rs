//! Command implementations

use std::sync::Arc;
use std::time::Duration;

use flowai_core::decode::DecodeError;
use flowai_core::tools::is_success;
use flowai_core::{
    create_client, ChatSession, EnvSecretStore, Error, LlmAdapter, Orchestrator, Result, Settings, SharedLogger,
    ToolBackend, ToolBridge, ToolCallRecord,
};

pub struct ChatArgs {
    pub message: String,
    pub system: Option<String>,
    pub model: Option<String>,
    pub no_tools: bool,
    pub json: bool,
}

fn bridge(settings: &Settings, logger: SharedLogger) -> ToolBridge {
    ToolBridge::new(settings.mcp_base_url.clone(), logger)
}

pub async fn chat(settings: &Settings, logger: SharedLogger, args: ChatArgs) -> Result<()> {
    let llm = create_client(settings, &EnvSecretStore::new(), logger.clone());
    let mut options = settings.completion_options();
    if let Some(model) = args.model {
        options.model = model;
    }

    let orchestrator = Orchestrator::new(Arc::new(llm), Arc::new(bridge(settings, logger.clone())), options, logger);
    let mut session = ChatSession::new(Arc::new(orchestrator));
    session.set_tools_enabled(!args.no_tools);
    if let Some(system) = args.system {
        session.start_with_system(system);
    }

    let outcome = session.send(args.message).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome).map_err(DecodeError::from)?);
        return Ok(());
    }

    if outcome.used_tools() {
        for result in &outcome.tool_results {
            let marker = if result.success { "ok" } else { "failed" };
            println!("[tool {}] {}", marker, result.content_json);
        }
        println!();
    }
    println!("{}", outcome.content);
    Ok(())
}

pub async fn models(settings: &Settings, logger: SharedLogger) -> Result<()> {
    let llm = create_client(settings, &EnvSecretStore::new(), logger);
    for model in llm.models().await {
        println!("{}", model);
    }
    Ok(())
}

pub async fn tools(settings: &Settings, logger: SharedLogger) -> Result<()> {
    for tool in bridge(settings, logger).list_tools().await {
        println!("{:<24} {}", tool.name, tool.description);
    }
    Ok(())
}

pub async fn tool(settings: &Settings, logger: SharedLogger, name: &str, args: &str) -> Result<()> {
    let call = ToolCallRecord::new("cli", name, args);
    call.arguments().map_err(DecodeError::from)?;

    let result = bridge(settings, logger).execute(&call).await;
    let pretty = result
        .payload()
        .and_then(|p| serde_json::to_string_pretty(&p).ok())
        .unwrap_or_else(|| result.content_json.clone());
    println!("{}", pretty);

    let succeeded = result.payload().as_ref().is_some_and(is_success);
    if succeeded {
        Ok(())
    } else {
        Err(Error::ToolFailure {
            name: name.to_string(),
            payload: result.content_json,
        })
    }
}

pub async fn health(settings: &Settings, logger: SharedLogger, wait: u32) -> Result<()> {
    let bridge = bridge(settings, logger);
    let ready = bridge.wait_until_ready(wait.max(1), Duration::from_secs(1)).await;
    if ready {
        println!("Tool server at {} is up", settings.mcp_base_url);
        Ok(())
    } else {
        println!("Tool server at {} is not responding", settings.mcp_base_url);
        Err(Error::Rpc(flowai_core::RpcError::InvalidResponse(format!(
            "no healthy response from {}/health",
            settings.mcp_base_url
        ))))
    }
}
