//! Arena-backed item tree of one layout.
//!
//! Items are stored in a flat vector and addressed by [`ItemId`]. Parent
//! links are plain indices, so nothing in the tree owns anything else.

use crate::item::Item;

/// Index of an item within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub usize);

#[derive(Debug, Clone)]
struct Node {
    item: Item,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
}

/// Items of one layout. Children keep document order, which is also
/// paint order.
#[derive(Debug, Clone, Default)]
pub struct ItemTree {
    nodes: Vec<Node>,
    roots: Vec<ItemId>,
}

impl ItemTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item under `parent`, or at top level.
    pub fn push(&mut self, parent: Option<ItemId>, item: Item) -> ItemId {
        let id = ItemId(self.nodes.len());
        self.nodes.push(Node {
            item,
            parent,
            children: Vec::new(),
        });
        match parent.and_then(|p| self.nodes.get_mut(p.0)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.nodes.get(id.0).map(|n| &n.item)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.nodes.get_mut(id.0).map(|n| &mut n.item)
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    /// Siblings of `id`, itself included.
    pub fn siblings(&self, id: ItemId) -> &[ItemId] {
        match self.parent(id) {
            Some(p) => self.children(p),
            None => &self.roots,
        }
    }

    /// The sibling laid out just before `id`.
    pub fn previous_sibling(&self, id: ItemId) -> Option<ItemId> {
        let siblings = self.siblings(id);
        let pos = siblings.iter().position(|&s| s == id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    /// All ids, parents before children, siblings in document order.
    pub fn tree_order(&self) -> Vec<ItemId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<ItemId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// `id` and every ancestor, innermost first.
    pub fn ancestors(&self, id: ItemId) -> impl Iterator<Item = ItemId> + '_ {
        std::iter::successors(Some(id), |&i| self.parent(i))
    }

    /// Visible only if the item and all its ancestors are visible.
    pub fn is_effectively_visible(&self, id: ItemId) -> bool {
        self.ancestors(id)
            .all(|i| self.get(i).is_some_and(Item::is_visible))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (ItemId(i), &n.item))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ItemId, &mut Item)> {
        self.nodes
            .iter_mut()
            .enumerate()
            .map(|(i, n)| (ItemId(i), &mut n.item))
    }

    /// First item with the given document id.
    pub fn find(&self, name: &str) -> Option<ItemId> {
        self.iter()
            .find(|(_, item)| item.name.as_deref() == Some(name))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::div::Div;
    use crate::item::ItemKind;

    fn div() -> Item {
        Item::new(ItemKind::Div(Div::new()))
    }

    fn sample() -> (ItemTree, [ItemId; 5]) {
        let mut t = ItemTree::new();
        let a = t.push(None, div());
        let b = t.push(Some(a), div());
        let c = t.push(Some(b), div());
        let d = t.push(Some(a), div());
        let e = t.push(None, div());
        (t, [a, b, c, d, e])
    }

    #[test]
    fn structure() {
        let (t, [a, b, c, d, e]) = sample();
        assert_eq!(t.len(), 5);
        assert_eq!(t.roots(), &[a, e]);
        assert_eq!(t.children(a), &[b, d]);
        assert_eq!(t.parent(c), Some(b));
        assert_eq!(t.parent(a), None);
    }

    #[test]
    fn previous_siblings() {
        let (t, [a, b, _, d, e]) = sample();
        assert_eq!(t.previous_sibling(d), Some(b));
        assert_eq!(t.previous_sibling(b), None);
        assert_eq!(t.previous_sibling(e), Some(a));
    }

    #[test]
    fn preorder() {
        let (t, [a, b, c, d, e]) = sample();
        assert_eq!(t.tree_order(), vec![a, b, c, d, e]);
        let anc: Vec<_> = t.ancestors(c).collect();
        assert_eq!(anc, vec![c, b, a]);
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let (mut t, [_, b, c, d, _]) = sample();
        t.get_mut(b).unwrap().hidden = true;
        assert!(!t.is_effectively_visible(c));
        assert!(t.is_effectively_visible(d));
    }

    #[test]
    fn find_by_name() {
        let (mut t, [_, _, c, _, _]) = sample();
        t.get_mut(c).unwrap().name = Some("title".into());
        assert_eq!(t.find("title"), Some(c));
        assert_eq!(t.find("nope"), None);
    }
}
