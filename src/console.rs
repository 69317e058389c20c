//! Line-oriented stdin trigger
//!
//! | input             | effect                       |
//! |-------------------|------------------------------|
//! | empty line, `snap`| request a snapshot           |
//! | `pic <name>`      | set the picture file name    |
//! | `matrix <name>`   | set the matrix file name     |
//! | `quit`, `q`       | end the session              |

use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::profiler::ControlHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Snapshot,
    PictureName(String),
    MatrixName(String),
    Quit,
    Help,
    Unknown(String),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match word.to_ascii_lowercase().as_str() {
            "" | "snap" => ConsoleCommand::Snapshot,
            "pic" => ConsoleCommand::PictureName(rest.trim().to_string()),
            "matrix" => ConsoleCommand::MatrixName(rest.trim().to_string()),
            "quit" | "q" => ConsoleCommand::Quit,
            "help" | "?" => ConsoleCommand::Help,
            _ => ConsoleCommand::Unknown(line.to_string()),
        }
    }
}

/// Applies `command`. Returns `false` once the console should stop reading.
pub fn dispatch(command: ConsoleCommand, control: &ControlHandle) -> bool {
    match command {
        ConsoleCommand::Snapshot => control.request_snapshot(),
        ConsoleCommand::PictureName(name) => {
            info!(name = %name, "Picture name set");
            control.set_picture_name(name);
        }
        ConsoleCommand::MatrixName(name) => {
            info!(name = %name, "Matrix name set");
            control.set_matrix_name(name);
        }
        ConsoleCommand::Quit => {
            control.request_shutdown();
            return false;
        }
        ConsoleCommand::Help => {
            info!("Commands: <enter>|snap, pic <name>, matrix <name>, quit");
        }
        ConsoleCommand::Unknown(line) => warn!(input = %line, "Unknown command"),
    }
    true
}

/// Feeds every line of `reader` to [`dispatch`] until EOF or `quit`.
pub fn read_commands<R: BufRead>(reader: R, control: &ControlHandle) -> io::Result<()> {
    for line in reader.lines() {
        if !dispatch(ConsoleCommand::parse(&line?), control) {
            break;
        }
        if control.shutdown_requested() {
            break;
        }
    }
    Ok(())
}

/// Reads commands from stdin on a background thread.
pub fn spawn_console(control: ControlHandle) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            match read_commands(stdin.lock(), &control) {
                Ok(()) => debug!("Console closed"),
                Err(e) => warn!(error = %e, "Console read failed"),
            }
        })
}
