//! Command-line REPL acting as the selection source
//!
//! Stands in for the host DAW during development: each command becomes an
//! event on the same channel a real host integration would feed.

use anyhow::Result;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;

use crate::encoder::Color;
use crate::selection::{Selection, SelectionEvent};

/// Command parsed from one REPL line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Selection(SelectionEvent),
    SetEnabled(bool),
    ListPorts,
    Quit,
}

/// Parse one REPL line; `None` for blank lines, `Err` message for bad input
pub fn parse_command(line: &str) -> Result<Option<ReplCommand>, String> {
    let mut parts = line.split_whitespace();
    let command = match parts.next() {
        Some(c) => c,
        None => return Ok(None),
    };

    match command {
        "select" => {
            let rest: Vec<&str> = parts.collect();
            // Last token is the color, everything before it the track name
            let (color_str, name_parts) = match rest.split_last() {
                Some(split) => split,
                None => return Err("usage: select <name> <#RRGGBB>".to_string()),
            };
            if name_parts.is_empty() {
                return Err("usage: select <name> <#RRGGBB>".to_string());
            }
            let color: Color = color_str.parse().map_err(|e| format!("{}", e))?;
            let name = name_parts.join(" ");
            Ok(Some(ReplCommand::Selection(SelectionEvent::Changed(
                Selection::new(name, color),
            ))))
        }
        "clear" => Ok(Some(ReplCommand::Selection(SelectionEvent::Cleared))),
        "enable" => Ok(Some(ReplCommand::SetEnabled(true))),
        "disable" => Ok(Some(ReplCommand::SetEnabled(false))),
        "ports" => Ok(Some(ReplCommand::ListPorts)),
        "exit" | "quit" => Ok(Some(ReplCommand::Quit)),
        "help" => {
            print_help();
            Ok(None)
        }
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  select <name> <#RRGGBB>  simulate selecting a track");
    println!("  clear                    simulate clearing the selection");
    println!("  enable | disable         toggle color transmission");
    println!("  ports                    list MIDI output ports");
    println!("  exit                     quit");
}

/// Blocking REPL loop feeding commands into the event channel
pub fn run_repl(tx: mpsc::Sender<ReplCommand>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline("trackcolor> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match parse_command(&line) {
                    Ok(Some(command)) => {
                        let quit = command == ReplCommand::Quit;
                        if tx.blocking_send(command).is_err() {
                            break;
                        }
                        if quit {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(msg) => println!("{}", msg),
                }
            }
            Err(_) => {
                let _ = tx.blocking_send(ReplCommand::Quit);
                break;
            }
        }
    }

    Ok(())
}
