//! Plain-text rendering of a transcript, one line per message.

use loopgraph::Message;

/// Renders `messages` as `[Human] ...`, `[Model] ...` and `[Tool:<name>] ...` lines.
///
/// Tool calls requested by a model message follow it as indented `-> name(args)` lines.
pub fn format_transcript(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        match message {
            Message::Human { content } => out.push_str(&format!("[Human] {}\n", content)),
            Message::Model {
                content,
                tool_calls,
            } => {
                out.push_str(&format!("[Model] {}\n", content));
                for call in tool_calls {
                    out.push_str(&format!("  -> {}({})\n", call.name, call.args));
                }
            }
            Message::Tool { content, name, .. } => {
                out.push_str(&format!("[Tool:{}] {}\n", name, content))
            }
        }
    }
    out
}
