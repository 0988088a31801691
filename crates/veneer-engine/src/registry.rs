//! Target registry of the active layout.

use std::collections::HashMap;

use veneer_ui::target::Target;
use veneer_ui::tree::{ItemId, ItemTree};

/// Which items represent, or follow, each logical target.
///
/// Rebuilt from scratch whenever a layout becomes active.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    bound: HashMap<Target, Vec<ItemId>>,
    followers: HashMap<Target, Vec<ItemId>>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every item of `tree`, in tree order. Inert targets are left
    /// out: nothing pushes values to them.
    pub fn rebuild(&mut self, tree: &ItemTree) {
        self.bound.clear();
        self.followers.clear();
        for id in tree.tree_order() {
            let Some(item) = tree.get(id) else {
                continue;
            };
            if let Some(target) = item.target.as_ref().filter(|t| !t.is_inert()) {
                self.bound.entry(target.clone()).or_default().push(id);
            }
            if let Some(follow) = &item.follow {
                self.followers.entry(follow.clone()).or_default().push(id);
            }
        }
        log::debug!(
            "target registry: {} target(s), {} followed",
            self.bound.len(),
            self.followers.len()
        );
    }

    /// Items bound to `target`.
    pub fn items(&self, target: &Target) -> &[ItemId] {
        self.bound.get(target).map(Vec::as_slice).unwrap_or_default()
    }

    /// Items whose visibility follows `target`.
    pub fn followers(&self, target: &Target) -> &[ItemId] {
        self.followers
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.bound.keys()
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_ui::div::Div;
    use veneer_ui::item::{Item, ItemKind};
    use veneer_ui::target::KnownTarget;

    fn item(target: Option<Target>) -> Item {
        let mut i = Item::new(ItemKind::Div(Div::new()));
        i.target = target;
        i
    }

    #[test]
    fn groups_items_by_target() {
        let volume = Target::Known(KnownTarget::Volume);
        let mut tree = ItemTree::new();
        let root = tree.push(None, item(None));
        let a = tree.push(Some(root), item(Some(volume.clone())));
        let b = tree.push(Some(root), item(Some(volume.clone())));
        tree.push(Some(root), item(Some(Target::Unknown("fx".into()))));
        let mut follower = item(None);
        follower.follow = Some(Target::Known(KnownTarget::Shuffle));
        let f = tree.push(Some(root), follower);

        let mut reg = TargetRegistry::new();
        reg.rebuild(&tree);
        assert_eq!(reg.items(&volume), &[a, b]);
        assert_eq!(reg.len(), 1);
        assert!(reg.items(&Target::Unknown("fx".into())).is_empty());
        assert_eq!(reg.followers(&Target::Known(KnownTarget::Shuffle)), &[f]);

        reg.rebuild(&ItemTree::new());
        assert!(reg.is_empty());
    }
}
