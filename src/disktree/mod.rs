//! # Disk-resident B+ tree
//!
//! Every node occupies one fixed-size page at a deterministic file offset,
//! and all references between nodes (parent, children, leaf neighbours) are
//! absolute byte offsets. A mutation reads the affected pages, rewrites the
//! decoded images in memory, and places them back at their offsets. The
//! master page at offset 0 records the root offset and the page count; its
//! presence is how an opened file is recognised as holding a tree.
//!
//! Pages are bump-allocated: the next page always lands at
//! `MASTER_PAGE_SIZE + page_count * PAGE_SIZE` and the count only grows.
//! Nodes orphaned by a merge or a root demotion keep their pages; nothing
//! is reclaimed until the last key is deleted, at which point the whole
//! file is truncated to zero.
//!
//! The tree is single-threaded and synchronous. No fsync is performed;
//! durability is the caller's concern.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Result, StrataError};
use crate::node::{
    MasterPage, Node, NodeBody, PageOffset, MASTER_PAGE_SIZE, ORDER, ORDER_HALF, PAGE_SIZE,
};
use crate::vfs::DbFile;

// ---------------------------------------------------------------------------
// Key scanning helpers
// ---------------------------------------------------------------------------

/// Index at which `key` belongs in `keys`: the count of keys that compare
/// less than or equal to it. Equal keys tie-break to the right.
fn insertion_index(keys: &[Vec<u8>], key: &[u8]) -> usize {
    let mut idx = 0;
    while idx < keys.len() && key >= keys[idx].as_slice() {
        idx += 1;
    }
    idx
}

/// Position of `key` in `keys`, if present.
fn key_index(keys: &[Vec<u8>], key: &[u8]) -> Option<usize> {
    keys.iter().position(|k| k.as_slice() == key)
}

// ---------------------------------------------------------------------------
// DiskTree
// ---------------------------------------------------------------------------

/// An ordered key/value index stored in a paged file.
///
/// Keys are arbitrary equal-length byte strings compared lexicographically;
/// values are arbitrary byte strings whose length fits in a `u16`. The key
/// length is fixed by the first insert into an empty tree.
///
/// The backing store is anything implementing [`DbFile`]; see
/// [`DiskTree::open`] for the OS-file constructor and
/// [`DiskTree::from_file`] for injecting a handle (e.g. a
/// [`MemFile`](crate::vfs::MemFile) in tests).
pub struct DiskTree<F: DbFile> {
    file: F,
    key_size: usize,
    master: Option<MasterPage>,
}

impl DiskTree<File> {
    /// Open a tree stored at `path`, creating the file if absent.
    ///
    /// # Errors
    ///
    /// * [`StrataError::Io`] — the file could not be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        DiskTree::from_file(file)
    }
}

impl<F: DbFile> DiskTree<F> {
    /// Wrap an already-open file handle.
    ///
    /// A file no larger than the master page is treated as an empty
    /// container; otherwise the master page is read and the fixed key size
    /// is restored from the root node.
    pub fn from_file(file: F) -> Result<Self> {
        let mut tree = DiskTree {
            file,
            key_size: 0,
            master: None,
        };

        let size = tree.file.len()?;
        if size > MASTER_PAGE_SIZE as u64 {
            let master = tree.read_master()?;
            tree.master = Some(master);

            let root = tree.read_node(master.root)?;
            tree.key_size = root.key_size as usize;
        }

        Ok(tree)
    }

    /// Release the tree and hand back the underlying file handle.
    pub fn close(self) -> Result<F> {
        Ok(self.file)
    }

    // -----------------------------------------------------------------------
    // Public operations
    // -----------------------------------------------------------------------

    /// Look up `key` and return a copy of its value.
    ///
    /// # Errors
    ///
    /// * [`StrataError::KeyNotFound`] — the tree is empty or the key is
    ///   absent.
    /// * [`StrataError::InvalidKeySize`] — `key` has the wrong length.
    pub fn find(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        if self.master.is_none() {
            return Err(StrataError::KeyNotFound);
        }
        if key.len() != self.key_size {
            return Err(StrataError::InvalidKeySize);
        }

        let leaf = self.find_leaf(key)?;
        let idx = key_index(&leaf.keys, key).ok_or(StrataError::KeyNotFound)?;

        Ok(leaf.values()[idx].clone())
    }

    /// Replace the value bound to `key` and persist the leaf.
    ///
    /// # Errors
    ///
    /// * [`StrataError::KeyNotFound`] — the tree is empty or the key is
    ///   absent.
    /// * [`StrataError::InvalidKeySize`] — `key` has the wrong length.
    /// * [`StrataError::InvalidData`] — `new_value` is empty or too large.
    pub fn update(&mut self, key: &[u8], new_value: &[u8]) -> Result<()> {
        if self.master.is_none() {
            return Err(StrataError::KeyNotFound);
        }
        if key.len() != self.key_size {
            return Err(StrataError::InvalidKeySize);
        }
        if new_value.is_empty() || new_value.len() > u16::MAX as usize {
            return Err(StrataError::InvalidData);
        }

        let mut leaf = self.find_leaf(key)?;
        let idx = key_index(&leaf.keys, key).ok_or(StrataError::KeyNotFound)?;
        leaf.values_mut()[idx] = new_value.to_vec();

        self.write_node(&leaf)
    }

    /// Insert a fresh key/value pair.
    ///
    /// The first insert into an empty tree creates a single-leaf root and
    /// fixes the key size for the tree's lifetime.
    ///
    /// # Errors
    ///
    /// * [`StrataError::InvalidData`] — `value` is empty or too large.
    /// * [`StrataError::InvalidKey`] — `key` is empty.
    /// * [`StrataError::KeySizeTooLarge`] — `key` is longer than
    ///   `u16::MAX` bytes.
    /// * [`StrataError::KeyAlreadyExists`] — the key is already present.
    /// * [`StrataError::InvalidKeySize`] — `key` differs from the
    ///   established key size.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if value.is_empty() {
            return Err(StrataError::InvalidData);
        }
        if key.is_empty() {
            return Err(StrataError::InvalidKey);
        }
        if key.len() > u16::MAX as usize {
            return Err(StrataError::KeySizeTooLarge);
        }
        if value.len() > u16::MAX as usize {
            return Err(StrataError::InvalidData);
        }

        if self.master.is_none() {
            let mut root = Node::leaf(MASTER_PAGE_SIZE as u64);
            root.key_size = key.len() as u16;
            root.keys.push(key.to_vec());
            root.values_mut().push(value.to_vec());

            // Encode before touching any state so an oversized payload
            // leaves the tree untouched.
            let page = root.encode()?;
            self.file.seek(SeekFrom::Start(root.offset))?;
            self.file.write_all(&page)?;

            self.key_size = key.len();
            self.master = Some(MasterPage {
                root: root.offset,
                page_count: 1,
            });
            return self.write_master();
        }

        let mut leaf = self.find_leaf(key)?;
        if key_index(&leaf.keys, key).is_some() {
            return Err(StrataError::KeyAlreadyExists);
        }
        if key.len() != self.key_size {
            return Err(StrataError::InvalidKeySize);
        }

        if leaf.num_keys() < ORDER - 1 {
            let idx = insertion_index(&leaf.keys, key);
            leaf.keys.insert(idx, key.to_vec());
            leaf.values_mut().insert(idx, value.to_vec());
            return self.write_node(&leaf);
        }

        self.split_leaf_insert(leaf, key, value)
    }

    /// Remove `key` and rebalance as needed.
    ///
    /// # Errors
    ///
    /// * [`StrataError::KeyNotFound`] — the tree is empty or the key is
    ///   absent.
    /// * [`StrataError::InvalidKeySize`] — `key` has the wrong length.
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        if self.master.is_none() {
            return Err(StrataError::KeyNotFound);
        }
        if key.len() != self.key_size {
            return Err(StrataError::InvalidKeySize);
        }

        let leaf = self.find_leaf(key)?;
        if key_index(&leaf.keys, key).is_none() {
            return Err(StrataError::KeyNotFound);
        }

        self.delete_entry(leaf, key, None)
    }

    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    /// All keys in ascending order, collected by walking the leaf chain
    /// forward from the leftmost leaf.
    pub fn leaf_keys_forward(&mut self) -> Result<Vec<Vec<u8>>> {
        let Some(master) = self.master else {
            return Ok(Vec::new());
        };

        let mut node = self.read_node(master.root)?;
        while !node.is_leaf() {
            let first = node.children()[0];
            node = self.read_node(first)?;
        }

        let mut keys = Vec::new();
        loop {
            keys.extend(node.keys.iter().cloned());
            if node.next == 0 {
                break;
            }
            node = self.read_node(node.next)?;
        }

        Ok(keys)
    }

    /// All keys in descending order, collected by walking the leaf chain
    /// backward from the rightmost leaf.
    pub fn leaf_keys_backward(&mut self) -> Result<Vec<Vec<u8>>> {
        let Some(master) = self.master else {
            return Ok(Vec::new());
        };

        let mut node = self.read_node(master.root)?;
        while !node.is_leaf() {
            let last = *node
                .children()
                .last()
                .ok_or(StrataError::InvalidPointerIndex)?;
            node = self.read_node(last)?;
        }

        let mut keys = Vec::new();
        loop {
            keys.extend(node.keys.iter().rev().cloned());
            if node.prev == 0 {
                break;
            }
            node = self.read_node(node.prev)?;
        }

        Ok(keys)
    }

    /// Level-order traversal: one `Vec` of decoded nodes per depth, root
    /// first. Empty for an empty tree.
    pub fn level_order(&mut self) -> Result<Vec<Vec<Node>>> {
        let Some(master) = self.master else {
            return Ok(Vec::new());
        };

        let mut levels = Vec::new();
        let mut current = vec![self.read_node(master.root)?];
        while !current.is_empty() {
            let mut next = Vec::new();
            for node in &current {
                if let NodeBody::Internal { children } = &node.body {
                    for &child in children {
                        next.push(self.read_node(child)?);
                    }
                }
            }
            levels.push(current);
            current = next;
        }

        Ok(levels)
    }

    // -----------------------------------------------------------------------
    // Descent
    // -----------------------------------------------------------------------

    /// Walk from the root down to the leaf that should contain `key`.
    fn find_leaf(&mut self, key: &[u8]) -> Result<Node> {
        let master = self.master.ok_or(StrataError::TreeEmpty)?;
        let mut node = self.read_node(master.root)?;

        while !node.is_leaf() {
            let idx = insertion_index(&node.keys, key);
            let child = node.children()[idx];
            node = self.read_node(child)?;
        }

        Ok(node)
    }

    // -----------------------------------------------------------------------
    // Insert: splitting
    // -----------------------------------------------------------------------

    /// Split a full leaf while inserting `(key, value)`, then propagate the
    /// separator upward.
    fn split_leaf_insert(&mut self, mut node: Node, key: &[u8], value: &[u8]) -> Result<()> {
        let new_offset = self.allocate_page()?;

        // Build the oversized scratch entry list (ORDER entries once the
        // new pair lands) and split it at ORDER_HALF.
        let idx = insertion_index(&node.keys, key);
        let mut keys = std::mem::take(&mut node.keys);
        let mut values = std::mem::take(node.values_mut());
        keys.insert(idx, key.to_vec());
        values.insert(idx, value.to_vec());

        let right_keys = keys.split_off(ORDER_HALF);
        let right_values = values.split_off(ORDER_HALF);
        node.keys = keys;
        *node.values_mut() = values;

        let mut new_node = Node::leaf(new_offset);
        new_node.key_size = self.key_size as u16;
        new_node.parent = node.parent;
        new_node.keys = right_keys;
        *new_node.values_mut() = right_values;

        // Splice the sibling into the leaf chain between `node` and its old
        // successor.
        new_node.next = node.next;
        new_node.prev = node.offset;
        node.next = new_offset;
        if new_node.next != 0 {
            let mut successor = self.read_node(new_node.next)?;
            successor.prev = new_offset;
            self.write_node(&successor)?;
        }

        // A leaf split copies the separator up: it stays as the sibling's
        // first key.
        let separator = new_node.keys[0].clone();
        self.finish_split(node, new_node, separator)
    }

    /// Split a full internal node while inserting `(key, child)`, then
    /// propagate the promoted key upward.
    fn split_internal_insert(&mut self, mut node: Node, key: &[u8], child: PageOffset) -> Result<()> {
        let new_offset = self.allocate_page()?;

        let idx = insertion_index(&node.keys, key);
        let mut keys = std::mem::take(&mut node.keys);
        let mut children = std::mem::take(node.children_mut());
        keys.insert(idx, key.to_vec());
        children.insert(idx + 1, child);

        // Keys left of ORDER_HALF stay, the key at ORDER_HALF is promoted
        // (it leaves both halves), the rest move to the sibling.
        let promoted = keys.remove(ORDER_HALF);
        let right_keys = keys.split_off(ORDER_HALF);
        let right_children = children.split_off(ORDER_HALF + 1);
        node.keys = keys;
        *node.children_mut() = children;

        let mut new_node = Node::internal(new_offset);
        new_node.key_size = self.key_size as u16;
        new_node.parent = node.parent;
        new_node.keys = right_keys;

        // Children that moved now answer to the sibling.
        for &child_offset in &right_children {
            self.reparent_child(child_offset, new_offset)?;
        }
        *new_node.children_mut() = right_children;

        self.finish_split(node, new_node, promoted)
    }

    /// Common tail of both split paths: persist the halves and place the
    /// separator in the parent, splitting it in turn if full.
    fn finish_split(&mut self, node: Node, new_node: Node, separator: Vec<u8>) -> Result<()> {
        let master = self.master.ok_or(StrataError::TreeEmpty)?;
        if node.offset == master.root {
            return self.split_root(node, new_node, separator);
        }

        self.write_node(&node)?;
        self.write_node(&new_node)?;
        self.write_master()?;

        let mut parent = self.read_node(node.parent)?;
        if parent.num_keys() < ORDER - 1 {
            let idx = insertion_index(&parent.keys, &separator);
            parent.keys.insert(idx, separator);
            parent.children_mut().insert(idx + 1, new_node.offset);
            return self.write_node(&parent);
        }

        self.split_internal_insert(parent, &separator, new_node.offset)
    }

    /// The root was split: allocate a new internal root with one separator
    /// and two children, and point the master page at it.
    fn split_root(&mut self, mut node: Node, mut new_node: Node, separator: Vec<u8>) -> Result<()> {
        let root_offset = self.allocate_page()?;

        let mut new_root = Node::internal(root_offset);
        new_root.key_size = self.key_size as u16;
        new_root.keys.push(separator);
        *new_root.children_mut() = vec![node.offset, new_node.offset];

        node.parent = root_offset;
        new_node.parent = root_offset;

        self.write_node(&new_root)?;
        self.write_node(&node)?;
        self.write_node(&new_node)?;

        if let Some(master) = self.master.as_mut() {
            master.root = root_offset;
        }
        self.write_master()
    }

    // -----------------------------------------------------------------------
    // Delete: removal, borrowing, merging
    // -----------------------------------------------------------------------

    /// Remove `(key, pointer)` from `node` and repair invariants upward.
    ///
    /// `child` identifies the pointer to drop when `node` is internal (the
    /// offset of a merged-away child); leaves drop the value parallel to
    /// the key.
    fn delete_entry(&mut self, mut node: Node, key: &[u8], child: Option<PageOffset>) -> Result<()> {
        self.remove_from_node(&mut node, key, child)?;
        self.write_node(&node)?;

        let master = self.master.ok_or(StrataError::TreeEmpty)?;
        if node.offset == master.root {
            return self.adjust_root();
        }

        let min_keys = ORDER_HALF - 1;
        if node.num_keys() >= min_keys {
            return Ok(());
        }

        // Underflow: pick a sibling (the left one when it exists) and the
        // parent key separating us from it.
        let mut parent = self.read_node(node.parent)?;
        let position = parent
            .children()
            .iter()
            .position(|&c| c == node.offset)
            .ok_or(StrataError::InvalidPointerIndex)?;

        let (sibling_idx, k_prime_idx, is_left) = if position > 0 {
            (position - 1, position - 1, true)
        } else {
            (1, 0, false)
        };

        let k_prime = parent.keys[k_prime_idx].clone();
        let sibling_offset = parent.children()[sibling_idx];
        let sibling = self.read_node(sibling_offset)?;

        if sibling.num_keys() > min_keys {
            self.borrow_from_sibling(node, sibling, &mut parent, is_left, k_prime, k_prime_idx)
        } else {
            self.merge_nodes(node, sibling, is_left, k_prime)
        }
    }

    /// Drop `key` (and the matching value or child pointer) from `node`.
    ///
    /// When a leaf loses its first key, the parent may hold a copy of it as
    /// a separator; it is repointed at the leaf's new minimum.
    fn remove_from_node(
        &mut self,
        node: &mut Node,
        key: &[u8],
        child: Option<PageOffset>,
    ) -> Result<()> {
        let key_idx = key_index(&node.keys, key).ok_or(StrataError::InvalidKeyIndex)?;
        node.keys.remove(key_idx);

        match (&mut node.body, child) {
            (NodeBody::Leaf { values }, None) => {
                values.remove(key_idx);
            }
            (NodeBody::Internal { children }, Some(dead)) => {
                let ptr_idx = children
                    .iter()
                    .position(|&c| c == dead)
                    .ok_or(StrataError::InvalidPointerIndex)?;
                children.remove(ptr_idx);
            }
            _ => return Err(StrataError::InvalidPointerIndex),
        }

        if node.is_leaf() && node.parent != 0 && key_idx == 0 && node.num_keys() > 0 {
            let mut parent = self.read_node(node.parent)?;
            if let Some(idx) = key_index(&parent.keys, key) {
                parent.keys[idx] = node.keys[0].clone();
                self.write_node(&parent)?;
            }
        }

        Ok(())
    }

    /// The root lost its last key: either promote its only child or, if it
    /// was a leaf, wipe the file so the next insert starts fresh.
    fn adjust_root(&mut self) -> Result<()> {
        let master = self.master.ok_or(StrataError::TreeEmpty)?;
        let root = self.read_node(master.root)?;
        if root.num_keys() > 0 {
            return Ok(());
        }

        match &root.body {
            NodeBody::Internal { children } => {
                // The old root's page is orphaned; pages are never reused.
                let new_root_offset = children[0];
                let mut new_root = self.read_node(new_root_offset)?;
                new_root.parent = 0;
                self.write_node(&new_root)?;

                if let Some(master) = self.master.as_mut() {
                    master.root = new_root_offset;
                }
                self.write_master()
            }
            NodeBody::Leaf { .. } => {
                self.file.truncate(0)?;
                self.file.seek(SeekFrom::Start(0))?;
                self.master = None;
                Ok(())
            }
        }
    }

    /// Move one entry from a richer sibling into `node`.
    fn borrow_from_sibling(
        &mut self,
        mut node: Node,
        mut sibling: Node,
        parent: &mut Node,
        is_left: bool,
        k_prime: Vec<u8>,
        k_prime_idx: usize,
    ) -> Result<()> {
        if !node.is_leaf() {
            if is_left {
                // The separator comes down as our new first key; the
                // sibling's last child and last key move out.
                let last_key = sibling.keys.len() - 1;
                let moved_key = sibling.keys.remove(last_key);
                let last_child = sibling.children().len() - 1;
                let moved_child = sibling.children_mut().remove(last_child);

                node.keys.insert(0, k_prime);
                node.children_mut().insert(0, moved_child);
                parent.keys[k_prime_idx] = moved_key;

                self.reparent_child(moved_child, node.offset)?;
            } else {
                // Mirror image: separator appends to us, the sibling's
                // first key replaces it in the parent.
                let moved_key = sibling.keys.remove(0);
                let moved_child = sibling.children_mut().remove(0);

                node.keys.push(k_prime);
                node.children_mut().push(moved_child);
                parent.keys[k_prime_idx] = moved_key;

                self.reparent_child(moved_child, node.offset)?;
            }
        } else if is_left {
            // Leaves borrow the entry itself; the parent separator becomes
            // the borrowed key.
            let last = sibling.keys.len() - 1;
            let moved_key = sibling.keys.remove(last);
            let moved_value = sibling.values_mut().remove(last);

            node.keys.insert(0, moved_key.clone());
            node.values_mut().insert(0, moved_value);
            parent.keys[k_prime_idx] = moved_key;
        } else {
            let moved_key = sibling.keys.remove(0);
            let moved_value = sibling.values_mut().remove(0);

            node.keys.push(moved_key);
            node.values_mut().push(moved_value);
            // The sibling's old second key is its new minimum.
            parent.keys[k_prime_idx] = sibling.keys[0].clone();
        }

        self.write_node(&node)?;
        self.write_node(&sibling)?;
        self.write_node(parent)
    }

    /// Fold `node` and its sibling into one node and drop the dead
    /// separator from the parent.
    fn merge_nodes(
        &mut self,
        node: Node,
        sibling: Node,
        is_left: bool,
        k_prime: Vec<u8>,
    ) -> Result<()> {
        // Canonicalise: `left` survives, `right` is merged away.
        let (mut left, mut right) = if is_left { (sibling, node) } else { (node, sibling) };

        if !left.is_leaf() {
            // The separator must come down first so the key count stays one
            // short of the child count.
            left.keys.push(k_prime.clone());
            left.keys.append(&mut right.keys);

            let moved: Vec<PageOffset> = right.children_mut().drain(..).collect();
            for &child_offset in &moved {
                self.reparent_child(child_offset, left.offset)?;
            }
            left.children_mut().extend(moved);
        } else {
            left.keys.append(&mut right.keys);
            let mut values = std::mem::take(right.values_mut());
            left.values_mut().append(&mut values);

            // Unlink the merged-away leaf from the chain.
            left.next = right.next;
            if right.next != 0 {
                let mut successor = self.read_node(right.next)?;
                successor.prev = left.offset;
                self.write_node(&successor)?;
            }
        }

        self.write_node(&right)?;
        self.write_node(&left)?;

        let parent = self.read_node(right.parent)?;
        self.delete_entry(parent, &k_prime, Some(right.offset))
    }

    // -----------------------------------------------------------------------
    // Paging
    // -----------------------------------------------------------------------

    /// Hand out the next page offset and bump the page count. The caller is
    /// responsible for persisting the master page before returning.
    fn allocate_page(&mut self) -> Result<PageOffset> {
        let master = self.master.as_mut().ok_or(StrataError::TreeEmpty)?;
        let offset = MASTER_PAGE_SIZE as u64 + master.page_count * PAGE_SIZE as u64;
        master.page_count += 1;
        Ok(offset)
    }

    /// Read and decode the node page at `offset`.
    ///
    /// # Errors
    ///
    /// * [`StrataError::TreeEmpty`] — no tree in the file.
    /// * [`StrataError::InvalidReadIndex`] — `offset` is past the live
    ///   region.
    /// * [`StrataError::UnexpectedSize`] — fewer than `PAGE_SIZE` bytes
    ///   were available.
    fn read_node(&mut self, offset: PageOffset) -> Result<Node> {
        let master = self.master.ok_or(StrataError::TreeEmpty)?;
        let live_end =
            MASTER_PAGE_SIZE as u64 + master.page_count.saturating_sub(1) * PAGE_SIZE as u64;
        if master.page_count == 0 || offset > live_end {
            return Err(StrataError::InvalidReadIndex);
        }

        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; PAGE_SIZE];
        self.file.read_exact(&mut buf).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => StrataError::UnexpectedSize,
            _ => StrataError::Io(err),
        })?;

        Ok(Node::decode(&buf, offset))
    }

    /// Encode `node` and write its page image at the node's own offset.
    fn write_node(&mut self, node: &Node) -> Result<()> {
        let buf = node.encode()?;
        self.file.seek(SeekFrom::Start(node.offset))?;
        self.file.write_all(&buf)?;
        Ok(())
    }

    fn read_master(&mut self) -> Result<MasterPage> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut buf = vec![0u8; MASTER_PAGE_SIZE];
        self.file.read_exact(&mut buf).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => StrataError::UnexpectedSize,
            _ => StrataError::Io(err),
        })?;

        Ok(MasterPage::decode(&buf))
    }

    fn write_master(&mut self) -> Result<()> {
        let master = self.master.ok_or(StrataError::TreeEmpty)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&master.encode())?;
        Ok(())
    }

    /// Rewrite a child's parent reference in place.
    fn reparent_child(&mut self, child_offset: PageOffset, parent: PageOffset) -> Result<()> {
        let mut child = self.read_node(child_offset)?;
        child.parent = parent;
        self.write_node(&child)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
