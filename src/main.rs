use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use sre_assistant::adapters::ai::{OpenAIConfig, OpenAIProvider};
use sre_assistant::adapters::documents::InMemoryDocumentIndex;
use sre_assistant::adapters::http::{
    api_router, ChatHandlers, ClusterHandlers, DocumentHandlers, HttpSettings,
};
use sre_assistant::adapters::kubernetes::{KubernetesClient, KubernetesConfig as ClientConfig};
use sre_assistant::application::{
    AgentLoop, AgentLoopConfig, AnalyzePodsHandler, SendMessageHandler, ToolDispatcher,
};
use sre_assistant::config::{AppConfig, ConfigError, LogFormat, ServerConfig, ValidationError};
use sre_assistant::domain::agent::{ConversationContextBuilder, TOOL_CATALOG};
use sre_assistant::ports::{AIError, ClusterError, DocumentIndex};

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("reasoning engine setup failed: {0}")]
    Engine(#[from] AIError),

    #[error("kubernetes client setup failed: {0}")]
    Cluster(#[from] ClusterError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

fn init_logging(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match server.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_logging(&config.server);

    tracing::info!(
        environment = ?config.server.environment,
        model = %config.ai.model,
        kubernetes_api = %config.kubernetes.api_url,
        "Starting SRE assistant"
    );

    // Reasoning engine
    let openai = OpenAIConfig::new(config.ai.openai_api_key.clone().unwrap_or_default())
        .with_model(&config.ai.model)
        .with_base_url(&config.ai.base_url)
        .with_timeout(config.ai.timeout())
        .with_max_retries(config.ai.max_retries)
        .with_embedding_model(&config.ai.embedding_model);
    let provider = Arc::new(OpenAIProvider::new(openai)?);

    // Cluster access
    let k8s = &config.kubernetes;
    let client_config = match &k8s.kubeconfig_path {
        Some(path) => {
            tracing::info!(kubeconfig = %path, "Using kubeconfig for cluster access");
            let from_file = ClientConfig::from_kubeconfig(path)?;
            let insecure = from_file.accept_invalid_certs || k8s.accept_invalid_certs;
            from_file.with_accept_invalid_certs(insecure)
        }
        None => {
            let mut in_cluster =
                ClientConfig::new(&k8s.api_url).with_accept_invalid_certs(k8s.accept_invalid_certs);
            if let Some(token) = &k8s.token {
                in_cluster = in_cluster.with_token(token);
            }
            if let Some(path) = &k8s.token_path {
                in_cluster = in_cluster.with_token_path(path);
            }
            if let Some(path) = &k8s.ca_cert_path {
                in_cluster = in_cluster.with_ca_cert_path(path);
            }
            in_cluster
        }
    }
    .with_timeout(k8s.timeout());
    let cluster = Arc::new(KubernetesClient::new(client_config)?);

    // Runbook index
    let extensions = config.documents.extensions();
    let index = Arc::new(
        InMemoryDocumentIndex::new(&config.documents.collection_name).with_embedder(provider.clone()),
    );
    if let Some(dir) = &config.documents.seed_directory {
        match index.index_directory(Path::new(dir), &extensions).await {
            Ok(indexed) => tracing::info!(directory = %dir, indexed, "Seeded runbook index"),
            Err(err) => tracing::warn!(directory = %dir, error = %err, "Could not seed runbook index"),
        }
    }

    // Agent
    let dispatcher = ToolDispatcher::new(Arc::new(TOOL_CATALOG.clone()), config.agent.tool_timeout());
    let agent = AgentLoop::new(
        provider,
        dispatcher,
        AgentLoopConfig {
            max_tool_rounds: config.agent.max_tool_rounds,
            engine_timeout: config.agent.engine_timeout(),
            temperature: config.ai.temperature,
            max_tokens: config.ai.max_tokens,
        },
    );

    let default_namespace = k8s.default_namespace.clone();
    let send_message = SendMessageHandler::new(
        cluster.clone(),
        index.clone(),
        ConversationContextBuilder::new(&config.agent.greeting_marker),
        agent.clone(),
        default_namespace.clone(),
    );
    let analyze_pods = AnalyzePodsHandler::new(cluster.clone(), index.clone(), agent, k8s.timeout())
        .with_context_builder(ConversationContextBuilder::new(&config.agent.greeting_marker));

    let app = api_router(
        ChatHandlers::new(Arc::new(send_message), Arc::new(analyze_pods), default_namespace.clone()),
        ClusterHandlers::new(cluster, default_namespace, k8s.timeout()),
        DocumentHandlers::new(index, extensions),
        &HttpSettings {
            request_timeout: config.server.request_timeout(),
            cors_origins: config.server.cors_origins_list(),
        },
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
