use crate::cli::ServeArgs;
use anyhow::Context;
use std::sync::Arc;
use swingcoach_llm::ChatClient;
use swingcoach_server::AppState;

pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let llm_config = args.llm.llm_config();
    if llm_config.api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set; feedback and chat requests will fail");
    }
    tracing::info!(
        pose_url = %args.pipeline.pose_url,
        ffmpeg = %args.pipeline.ffmpeg.display(),
        model = %llm_config.model,
        "starting swingcoach"
    );

    let llm = ChatClient::new(llm_config).context("failed to build chat client")?;
    let pipeline = args.pipeline.build();
    let state = Arc::new(AppState::new(
        args.server_config(),
        Arc::new(pipeline),
        Arc::new(llm),
    ));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime
        .block_on(swingcoach_server::serve(state))
        .context("HTTP server failed")?;
    Ok(())
}
