// Console module: the single prompt/print surface shared by the menu loop
// and the operation handlers. `LineConsole` works on any reader/writer pair
// (piped stdin, tests); `TermConsole` uses `dialoguer` on a real terminal.

use anyhow::Result;
use dialoguer::Input;
use std::io::{self, BufRead, Write};

pub trait Console {
    /// Show `prompt` and block for one line of input. Returns `None` once the
    /// input stream is exhausted. The trailing newline is stripped.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Print one line of normal output.
    fn line(&mut self, text: &str) -> Result<()>;

    /// Print one line of diagnostic output.
    fn error(&mut self, text: &str) -> Result<()>;
}

/// Plain line-oriented console. Prompts are written as `"<prompt>: "`.
pub struct LineConsole<R, W, E> {
    input: R,
    out: W,
    err: E,
}

impl<R: BufRead, W: Write, E: Write> LineConsole<R, W, E> {
    pub fn new(input: R, out: W, err: E) -> Self {
        LineConsole { input, out, err }
    }

    /// Give back the output and error writers.
    pub fn into_writers(self) -> (W, E) {
        (self.out, self.err)
    }
}

impl LineConsole<io::StdinLock<'static>, io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        LineConsole::new(io::stdin().lock(), io::stdout(), io::stderr())
    }
}

impl<R: BufRead, W: Write, E: Write> Console for LineConsole<R, W, E> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}: ", prompt)?;
        self.out.flush()?;

        // Bytes that are not UTF-8 are replaced rather than rejected, so a bad
        // line is just an unrecognised token.
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&raw);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn error(&mut self, text: &str) -> Result<()> {
        self.out.flush()?;
        writeln!(self.err, "{}", text)?;
        Ok(())
    }
}

/// Interactive console backed by `dialoguer` prompts.
pub struct TermConsole;

impl Console for TermConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        // `Input` renders its own ": " suffix.
        match Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn line(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }

    fn error(&mut self, text: &str) -> Result<()> {
        eprintln!("{}", text);
        Ok(())
    }
}
