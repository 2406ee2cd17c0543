//! Interactive search over a finished index
//!
//! A blocking read-eval-print loop. It is generic over its input and output so
//! the CLI can hand it stdin/stdout and tests can hand it byte buffers.

use crate::index::{normalize_token, InvertedIndex};
use std::io::{self, BufRead, Write};

/// Prompt printed before each query
pub const PROMPT: &str = "Search (> to exit): ";

/// Input line that ends the loop
pub const EXIT_COMMAND: &str = ">";

/// Answers queries from `input` until `>` or end of input
///
/// Each query goes through the same normalization as indexed text, so
/// `"Hello,"` finds pages indexed under `hello`.
pub fn run_query_loop<R, W>(index: &InvertedIndex, input: R, mut output: W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(output, "\n{}", PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            return Ok(());
        };
        let line = line?;
        let query = line.trim();

        if query == EXIT_COMMAND {
            return Ok(());
        }
        if query.is_empty() {
            continue;
        }

        let urls = normalize_token(query)
            .map(|token| index.search(&token))
            .unwrap_or_default();

        if urls.is_empty() {
            writeln!(output, "No results found.")?;
        } else {
            writeln!(output, "Found on pages:")?;
            for url in urls {
                writeln!(output, "- {}", url)?;
            }
        }
    }
}
