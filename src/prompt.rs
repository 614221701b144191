//! Blocking terminal interaction.
//!
//! Every place the triage loop waits on the operator goes through
//! [`Prompter`], so the loops can be driven by a script as well as by a
//! terminal.

use std::io::{self, BufRead};

use console::Term;

pub trait Prompter {
    /// Show `prompt` and read one line of input, without the line ending.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Show `prompt` and read a single key.
    fn read_key(&mut self, prompt: &str) -> io::Result<char>;

    /// Print one line of output.
    fn show(&mut self, line: &str);
}

/// Ask until the answer is one of `y`, `yes`, `n`, `no` (any case).
pub fn ask_yes_no<P: Prompter + ?Sized>(prompter: &mut P, prompt: &str) -> io::Result<bool> {
    loop {
        let answer = prompter.read_line(prompt)?.trim().to_lowercase();
        match answer.as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => prompter.show("Invalid y/n input - try again"),
        }
    }
}

/// [`Prompter`] over the process terminal.
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.term.write_str(prompt)?;
        self.term.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_key(&mut self, prompt: &str) -> io::Result<char> {
        if !self.term.is_term() {
            return Ok(self.read_line(prompt)?.chars().next().unwrap_or('\n'));
        }

        self.term.write_str(prompt)?;
        self.term.flush()?;
        let key = self.term.read_char()?;
        // echo the key so the scroll history stays readable
        self.term.write_line(&key.to_string())?;
        Ok(key)
    }

    fn show(&mut self, line: &str) {
        if self.term.write_line(line).is_err() {
            println!("{line}");
        }
    }
}
