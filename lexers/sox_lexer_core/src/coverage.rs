//! Coverage checking.
//!
//! A finished tokenization must partition its input: token texts, in order,
//! concatenate to the input, and each token starts where the previous one
//! ended.

use crate::Token;

/// Where a token sequence stops partitioning its input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoverageGap {
    /// Absolute offset at which the next token was expected.
    pub expected: usize,
    /// Offset of the offending token, or `None` if the tokens ended early.
    pub found: Option<usize>,
}

/// Check that `tokens` exactly partition `input`, which starts at `base`.
///
/// Returns the first gap, overlap, or text mismatch.
pub fn coverage_gap(input: &str, base: usize, tokens: &[Token<'_>]) -> Option<CoverageGap> {
    let mut expected = base;
    for token in tokens {
        let local = expected - base;
        let matches_input = token.offset == expected
            && !token.text.is_empty()
            && input
                .get(local..local + token.text.len())
                .is_some_and(|slice| slice == token.text);
        if !matches_input {
            return Some(CoverageGap {
                expected,
                found: Some(token.offset),
            });
        }
        expected = token.end();
    }

    (expected != base + input.len()).then_some(CoverageGap {
        expected,
        found: None,
    })
}

/// Concatenate token texts in order.
pub fn concat_text(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|token| token.text).collect()
}
