use crate::client::{ChatCompletion, LlmError};
use crate::types::ChatTurn;
use swingcoach_core::SwingSummary;

pub const FEEDBACK_PREAMBLE: &str = "Here's what I found in your swing:\n\n";

pub fn build_feedback_prompt(summary: &SwingSummary) -> String {
    format!(
        "You are a golf swing coach. A pose-tracking analysis of a golfer's swing video \
         produced these metrics:\n\
         - Average hip rotation: {} degrees\n\
         - Average shoulder tilt: {} degrees\n\
         - Club path: {}\n\n\
         Explain what these numbers suggest about the swing, point out the most likely \
         faults, and recommend two or three drills to improve. Keep it concise and encouraging.",
        summary.hip_rotation, summary.shoulder_tilt, summary.club_path
    )
}

pub fn wrap_feedback(feedback: &str) -> String {
    format!("{}{}", FEEDBACK_PREAMBLE, feedback)
}

/// Single-turn coaching request; the reply comes back wrapped in the preamble
pub async fn compose_feedback(
    llm: &dyn ChatCompletion,
    summary: &SwingSummary,
) -> Result<String, LlmError> {
    let prompt = [ChatTurn::user(build_feedback_prompt(summary))];
    let reply = llm.complete(&prompt).await?;
    Ok(wrap_feedback(&reply.content))
}
