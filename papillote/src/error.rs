//! Errors surfaced by selector compilation, path queries, and the pipeline.

use facet::Facet;

/// Everything that can go wrong in papillote.
///
/// Text transforms never fail on "nothing matched"; queries that match nothing
/// return an empty list. The variants here are either bad input (selector or
/// path syntax), caller bugs (preconditions), or a pipeline whose state no
/// longer matches the text it is asked to decode.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum Error {
    /// invalid selector `{selector}` at offset {position}: {reason}
    SelectorSyntax {
        selector: String,
        position: usize,
        reason: String,
    },

    /// invalid path expression `{expression}` at offset {position}: {reason}
    PathSyntax {
        expression: String,
        position: usize,
        reason: String,
    },

    /// path expression evaluation failed: {reason}
    PathEvaluation { reason: String },

    /// precondition failed: {what}
    Precondition { what: String },

    /// internal consistency error: {detail}
    InternalConsistency { detail: String },
}

impl Error {
    pub(crate) fn precondition(what: impl Into<String>) -> Self {
        Error::Precondition { what: what.into() }
    }

    pub(crate) fn evaluation(reason: impl Into<String>) -> Self {
        Error::PathEvaluation {
            reason: reason.into(),
        }
    }
}
