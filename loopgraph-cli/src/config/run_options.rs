//! Optional overrides for a run (CLI args or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options) and
//! [`run_with_options`](crate::run_with_options).

use loopgraph::ToolChoiceMode;

/// Optional overrides for a run. Only set fields override the env-based config;
/// the boolean switches can only turn a behavior on.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Override sampling temperature (0–2).
    pub temperature: Option<f32>,
    /// Override tool choice mode (auto, none, required).
    pub tool_choice: Option<ToolChoiceMode>,
    /// Override the step limit of one run.
    pub max_steps: Option<usize>,
    /// Wall-clock deadline of one run, in seconds.
    pub timeout_secs: Option<u64>,
    /// Retries for transient model or search failures.
    pub max_retries: Option<usize>,
    /// Turn tool failures into Tool messages instead of aborting.
    pub handle_tool_errors: bool,
    /// Service every requested tool call, not only the first.
    pub all_tool_calls: bool,
    /// Debug-level logs.
    pub verbose: bool,
}
