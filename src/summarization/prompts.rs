//! Prompt templates and generation parameters.

pub const DEFAULT_TASK: &str = "Summarize";

pub const SUMMARY_MAX_TOKENS: u32 = 100;
pub const SUMMARY_TEMPERATURE: f32 = 0.5;

pub const STEPS_MAX_TOKENS: u32 = 200;
pub const STEPS_TEMPERATURE: f32 = 0.7;

pub fn summary_prompt(task: &str, text: &str) -> String {
    format!("{} the following ticket notes:\n\n{}\n\nResult:", task, text)
}

pub fn resolution_steps_prompt(incident_number: &str, text: &str) -> String {
    format!(
        "Provide detailed resolution steps for incident {}:\n\n{}\n\nSteps:",
        incident_number, text
    )
}
