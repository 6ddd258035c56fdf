//! # Folio Parser
//!
//! Markup tokenizer, document tree and serializer.
//!
//! The tree is the structured representation of a Folio document. It is
//! deliberately small: elements with ordered attributes, and text. Positions
//! into the tree are plain integers (see [`ast`]) so that a located range can
//! be replaced later without holding references into the tree.

pub mod ast;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use ast::{Attribute, Document, Element, Node, PathStep, ResolvedPos};
pub use error::{ParseError, ParseResult};
pub use parser::{decode_entities, parse, parse_attributes, parse_fragment, Parser};
pub use serializer::{escape_attr, escape_text, serialize, serialize_nodes, Serializer};
pub use tokenizer::{tokenize, Token};
