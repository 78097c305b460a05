//! Slash commands handled locally, without involving the model.

use console::style;
use hubchat_mcp::McpTool;

/// What the REPL should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Keep reading input.
    Continue,
    /// Leave the REPL.
    Exit,
}

/// Handle a slash command. The caller has already checked for the leading
/// slash; unknown commands print a hint and continue.
pub fn handle_command(input: &str, tools: &[McpTool]) -> CommandAction {
    match input.trim().to_lowercase().as_str() {
        "/tools" => {
            show_tools(tools);
            CommandAction::Continue
        }
        "/help" => {
            show_help();
            CommandAction::Continue
        }
        "/exit" => {
            println!("Goodbye!");
            CommandAction::Exit
        }
        other => {
            println!("Unknown command: {other}");
            println!("Type /help for available commands.\n");
            CommandAction::Continue
        }
    }
}

fn show_tools(tools: &[McpTool]) {
    if tools.is_empty() {
        println!("No tools available.\n");
        return;
    }

    println!("Available tools:");
    for tool in tools {
        println!("  • {}", style(&tool.name).cyan());
        if !tool.description.is_empty() {
            println!("    {}", tool.description);
        }
    }
    println!();
}

fn show_help() {
    println!("Available commands:");
    println!("  /tools  - List available tools");
    println!("  /help   - Show this help message");
    println!("  /exit   - Exit the chat");
    println!();
}
