//! Named lexers for host tools.
//!
//! The three document lexers (`sdp`, `sip`, `sox`) can be found by alias, by
//! file name or by MIME type. The header value lexer is internal to SIP and
//! not listed.

use std::sync::Arc;

use sox_lexer_core::Lexer;

use crate::{SdpLexer, SipLexer, SoxLexer};

/// Every named lexer, with default settings.
pub fn all_lexers() -> Vec<Arc<dyn Lexer>> {
    vec![
        Arc::new(SdpLexer),
        Arc::new(SipLexer::default()),
        Arc::new(SoxLexer::default()),
    ]
}

/// Find a lexer by alias (`sdp`, `sip`, `sox`), ignoring case.
pub fn find_lexer_by_name(alias: &str) -> Option<Arc<dyn Lexer>> {
    all_lexers()
        .into_iter()
        .find(|lexer| lexer.info().has_alias(alias))
}

/// Find a lexer whose filename patterns match `file_name`.
///
/// `file_name` may be a path; only its last component is matched.
pub fn find_lexer_for_filename(file_name: &str) -> Option<Arc<dyn Lexer>> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    all_lexers()
        .into_iter()
        .find(|lexer| lexer.info().matches_filename(base))
}

/// Find a lexer that declares `mimetype`, ignoring case.
pub fn find_lexer_for_mimetype(mimetype: &str) -> Option<Arc<dyn Lexer>> {
    all_lexers()
        .into_iter()
        .find(|lexer| lexer.info().has_mimetype(mimetype))
}
