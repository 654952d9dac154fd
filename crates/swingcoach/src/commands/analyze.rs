use crate::cli::AnalyzeArgs;
use anyhow::{bail, Context};
use swingcoach_llm::{compose_feedback, ChatClient};
use swingcoach_vision::VideoAnalyzer;
use tokio_util::sync::CancellationToken;

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    if !args.file.is_file() {
        bail!("video not found: {}", args.file.display());
    }

    let pipeline = args.pipeline.build();
    let summary = pipeline
        .analyze(&args.file, &CancellationToken::new())
        .with_context(|| format!("failed to analyze {}", args.file.display()))?;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    if args.feedback {
        let llm = ChatClient::new(args.llm.llm_config()).context("failed to build chat client")?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let feedback = runtime
            .block_on(compose_feedback(&llm, &summary))
            .context("failed to get coaching feedback")?;
        println!();
        println!("{}", feedback);
    }
    Ok(())
}
