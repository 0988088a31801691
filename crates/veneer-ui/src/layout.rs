//! Geometry pass over an item tree.

use veneer_types::backend::HostSurface;
use veneer_types::error::Result;
use veneer_types::geometry::Rect;

use crate::position::GeometryIssue;
use crate::tree::{ItemId, ItemTree};

/// Resolve every item's rectangle for a window of `width` x `height`.
///
/// Parents resolve before children and siblings in document order, so the
/// `same`/`next` tokens always see their predecessor's final rectangle.
/// Each item's `on_size` runs with its new screen rectangle. Returns the
/// items whose geometry could not be fully resolved.
pub fn layout_tree(
    tree: &mut ItemTree,
    width: i32,
    height: i32,
    host: &mut dyn HostSurface,
) -> Result<Vec<(ItemId, GeometryIssue)>> {
    let window = Rect::new(0, 0, width.max(0), height.max(0));
    let mut issues = Vec::new();
    for id in tree.tree_order() {
        let parent = tree
            .parent(id)
            .and_then(|p| tree.get(p))
            .map_or(window, |p| p.screen_rect());
        let previous = tree
            .previous_sibling(id)
            .and_then(|s| tree.get(s))
            .map_or(Rect::ZERO, |s| {
                s.screen_rect()
                    .offset(parent.x.saturating_neg(), parent.y.saturating_neg())
            });
        let Some(item) = tree.get_mut(id) else {
            continue;
        };
        let (relative, issue) = item.geometry.resolve(parent.w, parent.h, previous);
        if let Some(issue) = issue {
            log::warn!("{} at line {}: {issue:?}", item.tag(), item.line);
            issues.push((id, issue));
        }
        item.on_size(relative.offset(parent.x, parent.y), host)?;
    }
    Ok(issues)
}

/// Items whose rectangle contains the point, topmost first.
///
/// Later siblings paint over earlier ones and children over parents, so
/// reverse tree order is front-to-back.
pub fn items_at(tree: &ItemTree, x: i32, y: i32) -> Vec<ItemId> {
    let mut hits: Vec<ItemId> = tree
        .tree_order()
        .into_iter()
        .filter(|&id| {
            tree.is_effectively_visible(id)
                && tree.get(id).is_some_and(|i| i.screen_rect().contains(x, y))
        })
        .collect();
    hits.reverse();
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::div::Div;
    use crate::item::{Item, ItemKind};
    use crate::position::{ItemGeometry, PositionExpr};
    use crate::test_utils::MockBackend;

    fn p(s: &str) -> PositionExpr {
        PositionExpr::parse(s).unwrap()
    }

    fn div(x: &str, y: &str, w: &str, h: &str) -> Item {
        Item::new(ItemKind::Div(Div::new())).with_geometry(ItemGeometry {
            x: p(x),
            y: p(y),
            w: p(w),
            h: p(h),
        })
    }

    #[test]
    fn children_are_relative_to_parent() {
        let mut tree = ItemTree::new();
        let panel = tree.push(None, div("10", "20", "50%", "100"));
        let child = tree.push(Some(panel), div("50%-10", "5", "20", "20"));
        let mut host = MockBackend::new();
        let issues = layout_tree(&mut tree, 400, 300, &mut host).unwrap();
        assert!(issues.is_empty());
        assert_eq!(tree.get(panel).unwrap().screen_rect(), Rect::new(10, 20, 200, 100));
        assert_eq!(tree.get(child).unwrap().screen_rect(), Rect::new(100, 25, 20, 20));
    }

    #[test]
    fn next_stacks_siblings() {
        let mut tree = ItemTree::new();
        let panel = tree.push(None, div("5", "5", "100", "100"));
        let a = tree.push(Some(panel), div("0", "0", "100%", "12"));
        let b = tree.push(Some(panel), div("0", "next+2", "100%", "same"));
        let mut host = MockBackend::new();
        layout_tree(&mut tree, 200, 200, &mut host).unwrap();
        assert_eq!(tree.get(a).unwrap().screen_rect(), Rect::new(5, 5, 100, 12));
        assert_eq!(tree.get(b).unwrap().screen_rect(), Rect::new(5, 19, 100, 12));
    }

    #[test]
    fn circular_opposite_is_reported() {
        let mut tree = ItemTree::new();
        let bad = tree.push(None, div("0", "0", "opposite", "opposite"));
        let mut host = MockBackend::new();
        let issues = layout_tree(&mut tree, 100, 100, &mut host).unwrap();
        assert_eq!(issues, vec![(bad, GeometryIssue::CircularOpposite)]);
        assert!(tree.get(bad).unwrap().screen_rect().is_empty());
    }

    #[test]
    fn extreme_positions_saturate() {
        let mut tree = ItemTree::new();
        let far = tree.push(None, div("2147483000", "0", "2000", "10"));
        let inner = tree.push(Some(far), div("50%", "0", "100%", "100%"));
        let after = tree.push(None, div("next", "-2147483000", "same", "same"));
        let mut host = MockBackend::new();
        layout_tree(&mut tree, 100, 100, &mut host).unwrap();
        assert_eq!(tree.get(far).unwrap().screen_rect().right(), i32::MAX);
        assert_eq!(tree.get(inner).unwrap().screen_rect(), Rect::new(i32::MAX, 0, 2000, 10));
        assert_eq!(
            tree.get(after).unwrap().screen_rect(),
            Rect::new(i32::MAX, -2147483000, 2000, 10)
        );
        assert!(items_at(&tree, 50, 5).is_empty());
    }

    #[test]
    fn topmost_hit_first() {
        let mut tree = ItemTree::new();
        let back = tree.push(None, div("0", "0", "100", "100"));
        let front = tree.push(Some(back), div("10", "10", "20", "20"));
        let mut host = MockBackend::new();
        layout_tree(&mut tree, 100, 100, &mut host).unwrap();
        assert_eq!(items_at(&tree, 15, 15), vec![front, back]);
        assert_eq!(items_at(&tree, 50, 50), vec![back]);
        tree.get_mut(back).unwrap().hidden = true;
        assert!(items_at(&tree, 15, 15).is_empty());
    }
}
