//! Field extraction from captured markup.
//!
//! The flow for one pass is: clean the markup, scan it for hints, truncate
//! it to the prompt budget, ask the model, then parse the first `{` to the
//! last `}` of its answer against the schema.

mod extractor;
pub mod html;
pub mod parse;
pub mod prompts;

pub use extractor::{FieldExtractor, DEFAULT_MAX_CONTENT_CHARS};
pub use html::{clean_html, PageHints};
pub use parse::{locate_json_span, parse_model_response};
