use std::fs;
use std::io::{self, BufWriter, Read, Write};

use anyhow::{Context, Result};
use serde::Serialize;

/// Read the whole input, treating `-` as stdin.
pub fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
    }
}

/// A record labelled with the strategy that produced it.
#[derive(Serialize)]
pub struct Tagged<'a, T> {
    pub strategy: &'static str,
    #[serde(flatten)]
    pub record: &'a T,
}

/// Buffered JSON-lines sink.
pub struct JsonLines<W: Write> {
    out: BufWriter<W>,
    written: usize,
}

impl JsonLines<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
            written: 0,
        }
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn write_all<'a, T: Serialize + 'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a T>,
    ) -> Result<()> {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    pub fn write_tagged<'a, T: Serialize + 'a>(
        &mut self,
        strategy: &'static str,
        records: impl IntoIterator<Item = &'a T>,
    ) -> Result<()> {
        for record in records {
            self.write(&Tagged { strategy, record })?;
        }
        Ok(())
    }

    /// Flush and return the number of lines written.
    pub fn finish(mut self) -> Result<usize> {
        self.out.flush()?;
        Ok(self.written)
    }
}
