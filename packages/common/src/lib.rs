//! Shared plumbing for the folio crates: host file access behind
//! [`PersistenceBridge`] and tree walking via [`Visitor`] / [`VisitorMut`].

mod error;
mod filesystem;
mod visitor;

pub use error::{PersistenceError, PersistenceResult};
pub use filesystem::{DirEntry, FileKind, MockPersistence, PersistenceBridge, RootedFileSystem};
pub use visitor::{
    walk_document, walk_document_mut, walk_element, walk_element_mut, walk_node, walk_nodes_mut,
    Visitor, VisitorMut,
};
