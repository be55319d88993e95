use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// Line-oriented user interface for the agent.
#[async_trait::async_trait]
pub trait Console: Send {
    /// Show `prompt` and wait for one line. `None` means end of input.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Write one line of output for the user.
    fn print(&mut self, line: &str) -> Result<()>;
}

/// Console over the process's stdin and stdout.
pub struct StdConsole {
    stdin: BufReader<Stdin>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            stdin: BufReader::new(tokio::io::stdin()),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one line, without its line ending. Invalid UTF-8 is replaced
/// rather than rejected.
async fn read_lossy_line<R>(reader: &mut R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

#[async_trait::async_trait]
impl Console for StdConsole {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "{}", prompt).context("Failed to write prompt")?;
            stdout.flush().context("Failed to flush stdout")?;
        }

        read_lossy_line(&mut self.stdin)
            .await
            .context("Failed to read from stdin")
    }

    fn print(&mut self, line: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line).context("Failed to write to stdout")
    }
}
