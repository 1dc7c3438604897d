//! # Strata
//!
//! An embedded ordered key/value index with two interchangeable substrates:
//! a fully in-memory B+ tree ([`MemTree`]) and a disk-resident B+ tree
//! ([`DiskTree`]) whose nodes are paged through any seekable
//! byte-addressable file ([`DbFile`]).
//!
//! Keys are opaque byte strings compared lexicographically; values are
//! opaque byte strings. Within one tree every key has the same length,
//! fixed by the first insert. Both substrates expose the same four
//! operations: `find`, `update`, `insert`, and `delete`.
//!
//! ```
//! use strata::MemTree;
//!
//! # fn main() -> strata::Result<()> {
//! let mut tree = MemTree::new();
//! tree.insert(b"ab", b"first")?;
//! tree.insert(b"cd", b"second")?;
//! assert_eq!(tree.find(b"ab")?, b"first");
//!
//! tree.delete(b"ab")?;
//! assert!(tree.find(b"ab").is_err());
//! # Ok(())
//! # }
//! ```
//!
//! The disk variant stores one node per fixed-size page and addresses nodes
//! by absolute file offset; see [`disktree`] for the on-disk contract. An
//! in-memory file ([`MemFile`]) makes it fully testable without real I/O:
//!
//! ```
//! use strata::{DiskTree, MemFile};
//!
//! # fn main() -> strata::Result<()> {
//! let mut tree = DiskTree::from_file(MemFile::new())?;
//! tree.insert(b"k1", b"v1")?;
//!
//! // Close, then reopen on the same backing bytes.
//! let file = tree.close()?;
//! let mut tree = DiskTree::from_file(file)?;
//! assert_eq!(tree.find(b"k1")?, b"v1");
//! # Ok(())
//! # }
//! ```

pub mod disktree;
pub mod error;
pub mod memtree;
pub mod node;
pub mod vfs;

#[cfg(test)]
mod proptests;

pub use disktree::DiskTree;
pub use error::{Result, StrataError};
pub use memtree::MemTree;
pub use vfs::{DbFile, MemFile};
