//! Token stream printers.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;

use sox_lexer_core::{Lexer, Token, TokenKind};

use crate::OutputFormat;

/// Write `tokens` to `out` in `format`.
pub fn write_tokens(
    out: &mut impl Write,
    format: OutputFormat,
    tokens: &[Token<'_>],
) -> io::Result<()> {
    match format {
        OutputFormat::Raw => {
            for token in tokens {
                writeln!(out, "Token.{}\t{:?}", token.kind, token.text)?;
            }
        }
        OutputFormat::Table => {
            for token in tokens {
                writeln!(out, "{:>8}  {:<18} {:?}", token.offset, token.kind.name(), token.text)?;
            }
        }
        OutputFormat::Text => {
            for token in tokens {
                out.write_all(token.text.as_bytes())?;
            }
        }
    }
    Ok(())
}

/// Write the number of tokens of each kind, then the total.
pub fn write_stats(out: &mut impl Write, tokens: &[Token<'_>]) -> io::Result<()> {
    let mut counts: BTreeMap<TokenKind, usize> = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.kind).or_default() += 1;
    }

    writeln!(out)?;
    for (kind, count) in &counts {
        writeln!(out, "{count:>8}  {kind}")?;
    }
    writeln!(out, "{:>8}  total", tokens.len())
}

/// Write one line per lexer: aliases, name, file patterns and MIME types.
pub fn write_lexer_list(out: &mut impl Write, lexers: &[Arc<dyn Lexer>]) -> io::Result<()> {
    for lexer in lexers {
        let info = lexer.info();
        write!(out, "{:<6} {}", info.aliases.join(", "), info.name)?;
        if !info.filenames.is_empty() {
            write!(out, " (filenames {})", info.filenames.join(", "))?;
        }
        if !info.mimetypes.is_empty() {
            write!(out, " (mimetypes {})", info.mimetypes.join(", "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
