//! Rotations, transplant, and the post-mutation recoloring passes.

use super::{Color, RedBlackIndex, Side};
use crate::compact_arena::{NodeId, NULL_NODE};

impl<K, V> RedBlackIndex<K, V> {
    /// Rotate the subtree rooted at `x` so that `x` moves down toward `side`.
    ///
    /// `rotate(x, Side::Left)` is the classic left rotation: x's right child
    /// takes x's place and x becomes its left child. In-order sequence is kept.
    pub(crate) fn rotate(&mut self, x: NodeId, side: Side) {
        let up = side.opposite();
        let y = self.child(x, up);
        debug_assert!(y != NULL_NODE, "rotation at {} without a {:?} child", x, up);

        let inner = self.child(y, side);
        self.set_child(x, up, inner);
        self.set_parent(inner, x);

        self.transplant(x, y);
        self.set_child(y, side, x);
        self.set_parent(x, y);
    }

    /// Put `v` where `u` hangs from its parent (or at the root).
    ///
    /// `v` may be the sentinel. `v`'s children are not touched.
    pub(crate) fn transplant(&mut self, u: NodeId, v: NodeId) {
        let parent = self.parent(u);
        if parent == NULL_NODE {
            self.root = v;
        } else if self.child(parent, Side::Left) == u {
            self.set_child(parent, Side::Left, v);
        } else {
            self.set_child(parent, Side::Right, v);
        }
        self.set_parent(v, parent);
    }

    /// Side of `parent` on which `id` hangs. `id` may be the sentinel.
    #[inline]
    fn side_under(&self, parent: NodeId, id: NodeId) -> Side {
        if self.child(parent, Side::Left) == id {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Resolve red-red violations introduced by inserting red node `z`.
    pub(crate) fn insert_fixup(&mut self, mut z: NodeId) {
        while self.color(self.parent(z)) == Color::Red {
            // A red parent is never the root, so the grandparent exists.
            let parent = self.parent(z);
            let grandparent = self.parent(parent);
            let side = self.side_under(grandparent, parent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle) == Color::Red {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                z = grandparent;
                continue;
            }

            if z == self.child(parent, side.opposite()) {
                // Inner grandchild: turn it into the outer case.
                z = parent;
                self.rotate(z, side);
            }

            let parent = self.parent(z);
            let grandparent = self.parent(parent);
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Restore black-height after a black node was unlinked.
    ///
    /// `x` took the removed node's place and may be the sentinel, so its parent
    /// is passed alongside instead of being read from the node.
    pub(crate) fn delete_fixup(&mut self, mut x: NodeId, mut parent: NodeId) {
        while x != self.root && self.color(x) == Color::Black {
            let side = self.side_under(parent, x);
            let other = side.opposite();
            let mut sibling = self.child(parent, other);

            if self.color(sibling) == Color::Red {
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.child(parent, other);
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, other);

            if self.color(near) == Color::Black && self.color(far) == Color::Black {
                // Push the extra black up one level.
                self.set_color(sibling, Color::Red);
                x = parent;
                parent = self.parent(x);
                continue;
            }

            if self.color(far) == Color::Black {
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, other);
                sibling = self.child(parent, other);
            }

            let parent_color = self.color(parent);
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            let far = self.child(sibling, other);
            self.set_color(far, Color::Black);
            self.rotate(parent, side);

            x = self.root;
            parent = NULL_NODE;
        }

        self.set_color(x, Color::Black);
    }
}
