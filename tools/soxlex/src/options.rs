//! Command-line options.
//!
//! Parsed by hand: the option set is small and flat. Values may be given
//! as `--lexer sip` or `--lexer=sip`.

use std::path::PathBuf;
use std::slice;

use sox_lexer_core::TokenKind;

use crate::CliError;

pub const USAGE: &str = "\
Usage: soxlex [options] <FILE|->

Tokenize an SDP, SIP or SoX document and print its tokens.

Options:
  -l, --lexer <NAME>     Lexer to use: sdp, sip, sox (default: by file name)
  -f, --format <FORMAT>  Output format: raw, table, text (default: raw)
      --only <KIND>      Print only tokens of KIND or its sub-kinds, e.g. Name
      --stats            Append per-kind token counts
      --check            Fail unless the tokens cover the input exactly
      --list             List the available lexers
  -h, --help             Show this help

Set RUST_LOG (e.g. RUST_LOG=sox_lexers=debug) to enable logging.";

/// Where the document comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Path(PathBuf),
    /// `-`
    Stdin,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `Token.<Kind>\t"<text>"`, one token per line.
    #[default]
    Raw,
    /// Offset, kind and text in columns.
    Table,
    /// Token texts only; reproduces the input.
    Text,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "raw" => Some(OutputFormat::Raw),
            "table" => Some(OutputFormat::Table),
            "text" => Some(OutputFormat::Text),
            _ => None,
        }
    }
}

/// Options for tokenizing one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexOptions {
    pub input: Input,
    /// Lexer alias; guessed from the file name when absent.
    pub lexer: Option<String>,
    pub format: OutputFormat,
    /// Only print tokens of this kind or below it.
    pub only: Option<TokenKind>,
    pub stats: bool,
    pub check: bool,
}

impl LexOptions {
    pub fn new(input: Input) -> Self {
        LexOptions {
            input,
            lexer: None,
            format: OutputFormat::default(),
            only: None,
            stats: false,
            check: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Lex(LexOptions),
    List,
    Help,
}

/// Parse the arguments following the program name.
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let mut input = None;
    let mut lexer = None;
    let mut format = OutputFormat::default();
    let mut only = None;
    let mut stats = false;
    let mut check = false;
    let mut list = false;

    let mut rest = args.iter();
    while let Some(arg) = rest.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
            _ => (arg.as_str(), None),
        };
        match flag {
            "-h" | "--help" => return Ok(Command::Help),
            "--list" => list = switch(flag, inline)?,
            "--stats" => stats = switch(flag, inline)?,
            "--check" => check = switch(flag, inline)?,
            "-l" | "--lexer" => lexer = Some(value(flag, inline, &mut rest)?.to_owned()),
            "-f" | "--format" => {
                let name = value(flag, inline, &mut rest)?;
                format = OutputFormat::parse(name).ok_or_else(|| {
                    CliError::Usage(format!("unknown format `{name}` (expected raw, table or text)"))
                })?;
            }
            "--only" => {
                let name = value(flag, inline, &mut rest)?;
                let kind = TokenKind::from_name(name)
                    .ok_or_else(|| CliError::Usage(format!("unknown token kind `{name}`")))?;
                only = Some(kind);
            }
            "-" => set_input(&mut input, Input::Stdin)?,
            _ if flag.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option `{arg}`")));
            }
            _ => set_input(&mut input, Input::Path(PathBuf::from(arg)))?,
        }
    }

    if list {
        return Ok(Command::List);
    }
    let input = input.ok_or_else(|| CliError::Usage("missing input file".to_owned()))?;
    Ok(Command::Lex(LexOptions {
        input,
        lexer,
        format,
        only,
        stats,
        check,
    }))
}

/// A flag without a value.
fn switch(flag: &str, inline: Option<&str>) -> Result<bool, CliError> {
    match inline {
        None => Ok(true),
        Some(_) => Err(CliError::Usage(format!("`{flag}` takes no value"))),
    }
}

fn value<'a>(
    flag: &str,
    inline: Option<&'a str>,
    rest: &mut slice::Iter<'a, String>,
) -> Result<&'a str, CliError> {
    match inline {
        Some(value) => Ok(value),
        None => rest
            .next()
            .map(String::as_str)
            .ok_or_else(|| CliError::Usage(format!("`{flag}` expects a value"))),
    }
}

fn set_input(slot: &mut Option<Input>, input: Input) -> Result<(), CliError> {
    if slot.is_some() {
        return Err(CliError::Usage("only one input file may be given".to_owned()));
    }
    *slot = Some(input);
    Ok(())
}
