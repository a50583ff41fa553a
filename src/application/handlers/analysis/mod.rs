//! Analysis handlers.

mod analyze_document;

pub use analyze_document::{
    AnalyzeDocumentCommand, AnalyzeDocumentError, AnalyzeDocumentHandler, AnalyzeDocumentResult,
};
