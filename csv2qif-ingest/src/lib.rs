//! csv2qif-ingest: bank CSV sources → normalized transactions

pub mod amount;
pub mod classifier;
pub mod fields;
pub mod record;
pub mod source;
pub mod statement;
pub mod tokenizer;

pub use amount::parse_amount;
pub use classifier::{Classification, Classifier, DropReason};
pub use fields::{clean_text, resolve_field};
pub use record::{header_name, RawRecord};
pub use source::Source;
pub use statement::{parse_source, parse_text};
pub use tokenizer::{detect_delimiter, tokenize, RowTokenizer};
