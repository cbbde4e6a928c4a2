//! The interactive device used by `input` and `choose`.
//!
//! The engine never touches stdin/stdout directly: prompts and answers go
//! through a [`Console`], injected by the host. [`StdConsole`] is the terminal,
//! [`ScriptedConsole`] replays canned answers and records what was shown, and
//! [`ClosedConsole`] behaves like a device with no input at all.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// Line-oriented prompt device.
pub trait Console {
    /// Shows `text` to the user as-is (no newline is appended).
    fn write(&self, text: &str) -> io::Result<()>;

    /// Reads one line without its terminator; `None` once input is exhausted.
    fn read_line(&self) -> io::Result<Option<String>>;
}

/// Terminal-backed console.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// A console with nothing to read; output is discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClosedConsole;

impl Console for ClosedConsole {
    fn write(&self, _text: &str) -> io::Result<()> {
        Ok(())
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        Ok(None)
    }
}

#[derive(Debug, Default)]
struct Script {
    answers: VecDeque<String>,
    transcript: String,
}

/// Replays pre-recorded answers and captures every prompt.
///
/// Clones share the same script, so a host can hand one clone to the engine
/// and keep another to inspect the transcript afterwards.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConsole {
    script: Rc<RefCell<Script>>,
}

impl ScriptedConsole {
    /// One answer per line of `input`.
    pub fn new(input: &str) -> Self {
        let answers = input.lines().map(str::to_string).collect();
        Self {
            script: Rc::new(RefCell::new(Script {
                answers,
                transcript: String::new(),
            })),
        }
    }

    /// Everything written so far.
    pub fn transcript(&self) -> String {
        self.script.borrow().transcript.clone()
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.script.borrow().answers.len()
    }
}

impl Console for ScriptedConsole {
    fn write(&self, text: &str) -> io::Result<()> {
        self.script.borrow_mut().transcript.push_str(text);
        Ok(())
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        Ok(self.script.borrow_mut().answers.pop_front())
    }
}
