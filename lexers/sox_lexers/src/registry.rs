//! MIME type → lexer lookup for SIP message bodies.

use std::fmt;
use std::sync::{Arc, LazyLock};

use rustc_hash::FxHashMap;
use sox_lexer_core::{Lexer, LexerRegistry};

use crate::SdpLexer;

static STANDARD: LazyLock<Arc<MimeRegistry>> = LazyLock::new(|| Arc::new(MimeRegistry::standard()));

/// A [`LexerRegistry`] backed by a map from MIME type to lexer.
///
/// MIME types are compared case-insensitively.
#[derive(Clone, Default)]
pub struct MimeRegistry {
    by_mimetype: FxHashMap<String, Arc<dyn Lexer>>,
}

impl MimeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        MimeRegistry::default()
    }

    /// The body lexers shipped with this crate (`application/sdp`).
    pub fn standard() -> Self {
        let mut registry = MimeRegistry::new();
        registry.register(Arc::new(SdpLexer));
        registry
    }

    /// Shared instance of [`MimeRegistry::standard`].
    pub(crate) fn shared() -> Arc<dyn LexerRegistry> {
        Arc::clone(&*STANDARD) as Arc<dyn LexerRegistry>
    }

    /// Register `lexer` under every MIME type its metadata declares.
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn register(&mut self, lexer: Arc<dyn Lexer>) {
        let mimetypes = lexer.info().mimetypes;
        if let Some((last, rest)) = mimetypes.split_last() {
            for mimetype in rest {
                self.insert(mimetype, Arc::clone(&lexer));
            }
            self.insert(last, lexer);
        }
    }

    /// Register `lexer` under `mimetype`, regardless of its metadata.
    pub fn insert(&mut self, mimetype: &str, lexer: Arc<dyn Lexer>) {
        self.by_mimetype.insert(mimetype.to_ascii_lowercase(), lexer);
    }

    /// Registered MIME types, lowercased, in no particular order.
    pub fn mimetypes(&self) -> impl Iterator<Item = &str> {
        self.by_mimetype.keys().map(String::as_str)
    }
}

impl LexerRegistry for MimeRegistry {
    fn resolve(&self, mimetype: &str) -> Option<Arc<dyn Lexer>> {
        let lexer = self.by_mimetype.get(&mimetype.to_ascii_lowercase()).cloned();
        if lexer.is_none() {
            tracing::debug!(mimetype, "no lexer registered for content type");
        }
        lexer
    }
}

impl fmt::Debug for MimeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self
            .by_mimetype
            .iter()
            .map(|(mimetype, lexer)| (mimetype.as_str(), lexer.info().name))
            .collect();
        entries.sort_unstable();
        f.debug_map().entries(entries).finish()
    }
}
