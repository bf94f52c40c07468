//! Agent binary: parses the user message, runs the agent loop and prints the transcript.

use clap::Parser;
use loopgraph_cli::{
    format_transcript, init_tracing, run_with_config, AgentState, CancellationToken, RunConfig,
    RunError, RunOptions, ToolChoiceMode,
};

#[derive(Parser, Debug)]
#[command(name = "loopgraph")]
#[command(about = "Research agent: answers a question, calling web search when needed")]
struct Args {
    /// User message (may also be given as positional arguments).
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Positional user message, used when -m/--message is absent.
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// Maximum node invocations in one run.
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Wall-clock deadline of the run, in seconds.
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Sampling temperature (0–2).
    #[arg(long)]
    temperature: Option<f32>,

    /// Tool choice: auto, none or required.
    #[arg(long, value_name = "MODE")]
    tool_choice: Option<ToolChoiceMode>,

    /// Retries for transient model or search failures.
    #[arg(long, value_name = "N")]
    max_retries: Option<usize>,

    /// Feed tool failures back to the model instead of aborting.
    #[arg(long)]
    handle_tool_errors: bool,

    /// Run every requested tool call, not only the first.
    #[arg(long)]
    all_tool_calls: bool,

    /// Print the transcript as JSON.
    #[arg(long)]
    json: bool,

    /// Debug-level logs on stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn user_message(&self) -> String {
        if let Some(ref m) = self.message {
            return m.clone();
        }
        if self.rest.is_empty() {
            return "What is the weather in Paris?".to_string();
        }
        self.rest.join(" ").trim().to_string()
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            temperature: self.temperature,
            tool_choice: self.tool_choice,
            max_steps: self.max_steps,
            timeout_secs: self.timeout_secs,
            max_retries: self.max_retries,
            handle_tool_errors: self.handle_tool_errors,
            all_tool_calls: self.all_tool_calls,
            verbose: self.verbose,
        }
    }
}

fn print_state(state: &AgentState, json: bool) {
    if json {
        match serde_json::to_string_pretty(state) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("error: cannot encode transcript: {}", e),
        }
    } else {
        print!("{}", format_transcript(state.messages()));
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    if let Err(e) = init_tracing(args.verbose) {
        eprintln!("warning: tracing not initialized: {}", e);
    }

    let mut config = match RunConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    config.apply_options(&args.run_options());

    let cancellation = CancellationToken::new();
    let on_ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling run");
            on_ctrl_c.cancel();
        }
    });

    let input = args.user_message();
    match run_with_config(&config, &input, cancellation).await {
        Ok(state) => print_state(&state, args.json),
        Err(e) => {
            eprintln!("error: {}", e);
            let partial = e
                .downcast_ref::<RunError>()
                .and_then(RunError::partial_state);
            if let Some(state) = partial {
                eprintln!("partial transcript ({} messages):", state.len());
                print_state(state, args.json);
            }
            std::process::exit(1);
        }
    }
}
