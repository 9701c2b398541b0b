//! Ordered tree with parent pointers.
//!
//! A [`Node`] is a shared handle. Children are owned by their container and
//! point back to it through a weak parent pointer, which is written
//! only by the mutation methods in this module. Every mutation validates the
//! whole batch first (cycles, duplicates, the container's
//! [`Constraint::check_insert`] hook and each node's
//! [`Constraint::check_parent`] guard) and only then touches the tree, so a
//! rejected call leaves everything as it was.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};

/// Validation hooks supplied by the node payload.
pub trait Constraint: Sized {
    /// Name used in error messages.
    fn kind_name(&self) -> &'static str;

    /// Pre-insertion hook, run on the container before any mutation.
    fn check_insert(&self, _splice: &Splice<'_, Self>) -> Result<()> {
        Ok(())
    }

    /// Parent-assignment guard, run on every incoming node.
    fn check_parent(&self, _parent: &Self) -> Result<()> {
        Ok(())
    }

    /// Whether the node may ever leave its parent.
    fn is_removable(&self) -> bool {
        true
    }
}

/// A prospective insertion, as seen by [`Constraint::check_insert`].
pub struct Splice<'a, T> {
    /// Insertion position within `retained`.
    pub at: usize,
    /// Children that stay in the container once the incoming nodes (and a
    /// replaced node, if any) have been detached.
    pub retained: &'a [Node<T>],
    /// Nodes to insert, in order.
    pub incoming: &'a [Node<T>],
}

struct ParentPointer<T> {
    index: usize,
    parent: Weak<Inner<T>>,
}

struct Inner<T> {
    data: RefCell<T>,
    link: RefCell<Option<ParentPointer<T>>>,
    children: RefCell<Vec<Node<T>>>,
}

/// Shared handle to a tree node.
pub struct Node<T>(Rc<Inner<T>>);

/// Weak handle to a tree node.
pub struct WeakNode<T>(Weak<Inner<T>>);

enum Position {
    Start,
    End,
    Before(usize),
    After(usize),
    Replace(usize),
}

impl<T> Node<T> {
    /// Create a detached node
    pub fn new(data: T) -> Self {
        Node(Rc::new(Inner {
            data: RefCell::new(data),
            link: RefCell::new(None),
            children: RefCell::new(Vec::new()),
        }))
    }

    pub fn data(&self) -> Ref<'_, T> {
        self.0.data.borrow()
    }

    pub fn data_mut(&self) -> RefMut<'_, T> {
        self.0.data.borrow_mut()
    }

    /// Whether both handles point at the same node
    pub fn ptr_eq(&self, other: &Node<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakNode<T> {
        WeakNode(Rc::downgrade(&self.0))
    }

    /// The owning container, if attached
    pub fn parent(&self) -> Option<Node<T>> {
        self.0
            .link
            .borrow()
            .as_ref()
            .and_then(|link| link.parent.upgrade())
            .map(Node)
    }

    /// Position among the parent's children, if attached
    pub fn index(&self) -> Option<usize> {
        let link = self.0.link.borrow();
        let link = link.as_ref()?;
        (link.parent.strong_count() > 0).then_some(link.index)
    }

    pub fn is_attached(&self) -> bool {
        self.index().is_some()
    }

    /// Snapshot of the children, in order
    pub fn children(&self) -> Vec<Node<T>> {
        self.0.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    pub fn child(&self, index: usize) -> Option<Node<T>> {
        self.0.children.borrow().get(index).cloned()
    }

    pub fn first(&self) -> Option<Node<T>> {
        self.0.children.borrow().first().cloned()
    }

    pub fn last(&self) -> Option<Node<T>> {
        self.0.children.borrow().last().cloned()
    }

    pub fn next(&self) -> Option<Node<T>> {
        let index = self.index()?;
        self.parent()?.child(index + 1)
    }

    pub fn previous(&self) -> Option<Node<T>> {
        let index = self.index()?.checked_sub(1)?;
        self.parent()?.child(index)
    }

    /// Parent, grandparent, and so on up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = Node<T>> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// All nodes below this one in document order (pre-order, depth first)
    pub fn descendants(&self) -> Descendants<T> {
        Descendants {
            stack: self.0.children.borrow().iter().rev().cloned().collect(),
        }
    }

    fn attached(&self) -> Result<(Node<T>, usize)> {
        match (self.parent(), self.index()) {
            (Some(parent), Some(index)) => Ok((parent, index)),
            _ => Err(Error::NotAttached),
        }
    }

    fn detach(&self) {
        let Some(link) = self.0.link.borrow_mut().take() else {
            return;
        };
        if let Some(parent) = link.parent.upgrade() {
            let parent = Node(parent);
            parent.0.children.borrow_mut().remove(link.index);
            parent.reindex(link.index);
        }
    }

    fn reindex(&self, from: usize) {
        let children = self.0.children.borrow();
        for (index, child) in children.iter().enumerate().skip(from) {
            *child.0.link.borrow_mut() = Some(ParentPointer {
                index,
                parent: Rc::downgrade(&self.0),
            });
        }
    }
}

impl<T: Constraint> Node<T> {
    /// Insert nodes after the last child
    pub fn append<I: IntoIterator<Item = Node<T>>>(&self, nodes: I) -> Result<()> {
        self.insert(Position::End, nodes.into_iter().collect())
    }

    /// Insert nodes before the first child
    pub fn prepend<I: IntoIterator<Item = Node<T>>>(&self, nodes: I) -> Result<()> {
        self.insert(Position::Start, nodes.into_iter().collect())
    }

    /// Insert nodes right before this node
    pub fn before<I: IntoIterator<Item = Node<T>>>(&self, nodes: I) -> Result<()> {
        let (parent, index) = self.attached()?;
        parent.insert(Position::Before(index), nodes.into_iter().collect())
    }

    /// Insert nodes right after this node
    pub fn after<I: IntoIterator<Item = Node<T>>>(&self, nodes: I) -> Result<()> {
        let (parent, index) = self.attached()?;
        parent.insert(Position::After(index), nodes.into_iter().collect())
    }

    /// Substitute this node with zero or more nodes; this node ends up detached
    /// unless it is part of `nodes`.
    pub fn replace_with<I: IntoIterator<Item = Node<T>>>(&self, nodes: I) -> Result<()> {
        let (parent, index) = self.attached()?;
        parent.insert(Position::Replace(index), nodes.into_iter().collect())
    }

    /// Detach this node from its parent
    pub fn remove(&self) -> Result<()> {
        self.attached()?;
        let data = self.data();
        if !data.is_removable() {
            return Err(Error::Pinned(data.kind_name()));
        }
        drop(data);
        self.detach();
        Ok(())
    }

    fn insert(&self, position: Position, nodes: Vec<Node<T>>) -> Result<()> {
        let replaced = match position {
            Position::Replace(index) => self.child(index),
            _ => None,
        };

        for (i, node) in nodes.iter().enumerate() {
            if nodes[..i].iter().any(|other| other.ptr_eq(node)) {
                return Err(Error::DuplicateNode);
            }
            if node.ptr_eq(self) || self.ancestors().any(|a| a.ptr_eq(node)) {
                return Err(Error::Cycle);
            }
        }

        let leaving = |child: &Node<T>| {
            nodes.iter().any(|n| n.ptr_eq(child))
                || replaced.as_ref().is_some_and(|r| r.ptr_eq(child))
        };
        let (at, retained) = {
            let children = self.0.children.borrow();
            let base = match position {
                Position::Start => 0,
                Position::End => children.len(),
                Position::Before(index) | Position::Replace(index) => index,
                Position::After(index) => index + 1,
            };
            let at = children[..base].iter().filter(|c| !leaving(c)).count();
            let retained: Vec<Node<T>> =
                children.iter().filter(|c| !leaving(c)).cloned().collect();
            (at, retained)
        };

        {
            let parent = self.data();
            parent.check_insert(&Splice {
                at,
                retained: &retained,
                incoming: &nodes,
            })?;
            for node in &nodes {
                let data = node.data();
                data.check_parent(&parent)?;
                let moving_out = node.parent().is_some_and(|p| !p.ptr_eq(self));
                if moving_out && !data.is_removable() {
                    return Err(Error::Pinned(data.kind_name()));
                }
            }
        }
        if let Some(replaced) = &replaced {
            let data = replaced.data();
            if !data.is_removable() && !nodes.iter().any(|n| n.ptr_eq(replaced)) {
                return Err(Error::Pinned(data.kind_name()));
            }
        }

        if let Some(replaced) = &replaced {
            replaced.detach();
        }
        for node in &nodes {
            node.detach();
        }
        {
            let mut children = self.0.children.borrow_mut();
            let tail = children.split_off(at);
            children.extend(nodes);
            children.extend(tail);
        }
        self.reindex(at);
        Ok(())
    }
}

impl<T> WeakNode<T> {
    pub fn upgrade(&self) -> Option<Node<T>> {
        self.0.upgrade().map(Node)
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Node(Rc::clone(&self.0))
    }
}

impl<T> Clone for WeakNode<T> {
    fn clone(&self) -> Self {
        WeakNode(Weak::clone(&self.0))
    }
}

impl<T> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for Node<T> {}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Node");
        match self.0.data.try_borrow() {
            Ok(data) => s.field("data", &*data),
            Err(_) => s.field("data", &"<borrowed>"),
        };
        s.field("index", &self.index())
            .field("children", &self.child_count())
            .finish()
    }
}

/// Pre-order iterator returned by [`Node::descendants`]
pub struct Descendants<T> {
    stack: Vec<Node<T>>,
}

impl<T> Iterator for Descendants<T> {
    type Item = Node<T>;

    fn next(&mut self) -> Option<Node<T>> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.0.children.borrow().iter().rev().cloned());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum Item {
        Box(&'static str),
        Leaf(&'static str),
        Pinned,
    }

    impl Constraint for Item {
        fn kind_name(&self) -> &'static str {
            match self {
                Item::Box(_) => "Box",
                Item::Leaf(_) => "Leaf",
                Item::Pinned => "Pinned",
            }
        }

        fn check_insert(&self, splice: &Splice<'_, Self>) -> Result<()> {
            match self {
                Item::Leaf(_) => Err(Error::Leaf("Leaf")),
                Item::Box("odd") => {
                    for node in splice.incoming {
                        if let Item::Leaf("reject") = &*node.data() {
                            return Err(Error::InvalidChild {
                                parent: "Box",
                                child: "Leaf",
                                accepts: "anything else",
                            });
                        }
                    }
                    Ok(())
                }
                _ => Ok(()),
            }
        }

        fn is_removable(&self) -> bool {
            !matches!(self, Item::Pinned)
        }
    }

    fn parent() -> Node<Item> {
        Node::new(Item::Box("parent"))
    }

    fn leaf(id: &'static str) -> Node<Item> {
        Node::new(Item::Leaf(id))
    }

    fn ids(node: &Node<Item>) -> Vec<&'static str> {
        node.children()
            .iter()
            .map(|child| match &*child.data() {
                Item::Box(id) | Item::Leaf(id) => *id,
                Item::Pinned => "pinned",
            })
            .collect()
    }

    fn assert_dense(node: &Node<Item>) {
        for (i, child) in node.children().iter().enumerate() {
            assert_eq!(child.index(), Some(i));
            assert!(child.parent().unwrap().ptr_eq(node));
        }
    }

    fn sample() -> (Node<Item>, Vec<Node<Item>>) {
        let p = parent();
        let nodes: Vec<_> = ["s", "a", "b", "c", "d"].into_iter().map(leaf).collect();
        p.append(nodes.clone()).unwrap();
        (p, nodes)
    }

    #[test]
    fn test_append() {
        let p = parent();
        p.append([leaf("a")]).unwrap();
        p.append([leaf("b")]).unwrap();
        p.append([leaf("c"), leaf("d")]).unwrap();
        assert_eq!(ids(&p), ["a", "b", "c", "d"]);
        assert_dense(&p);
    }

    #[test]
    fn test_prepend() {
        let p = parent();
        p.prepend([leaf("d")]).unwrap();
        p.prepend([leaf("c")]).unwrap();
        p.prepend([leaf("a"), leaf("b")]).unwrap();
        assert_eq!(ids(&p), ["a", "b", "c", "d"]);
        assert_dense(&p);
    }

    #[test]
    fn test_switch_parent() {
        let p1 = parent();
        let p2 = parent();
        let b = leaf("b");
        p1.append([leaf("a"), b.clone(), leaf("c")]).unwrap();
        p2.append([b.clone()]).unwrap();
        assert_eq!(ids(&p1), ["a", "c"]);
        assert_eq!(ids(&p2), ["b"]);
        assert!(b.parent().unwrap().ptr_eq(&p2));
        assert_dense(&p1);
        assert_dense(&p2);
    }

    #[test]
    fn test_remove() {
        let (p, nodes) = sample();
        nodes[3].remove().unwrap();
        assert!(nodes[3].parent().is_none());
        assert_eq!(nodes[3].index(), None);
        assert_eq!(ids(&p), ["s", "a", "b", "d"]);
        assert_dense(&p);
        assert_eq!(nodes[3].remove(), Err(Error::NotAttached));
    }

    #[test]
    fn test_before_and_after() {
        let (p, nodes) = sample();
        nodes[2].before([leaf("x"), leaf("y")]).unwrap();
        assert_eq!(ids(&p), ["s", "a", "x", "y", "b", "c", "d"]);
        nodes[4].after([leaf("z")]).unwrap();
        assert_eq!(ids(&p), ["s", "a", "x", "y", "b", "c", "d", "z"]);
        assert_dense(&p);
    }

    #[test]
    fn test_move_within_parent() {
        let (p, nodes) = sample();
        nodes[4].before([nodes[0].clone()]).unwrap();
        assert_eq!(ids(&p), ["a", "b", "c", "s", "d"]);
        nodes[1].after([nodes[4].clone(), nodes[2].clone()]).unwrap();
        assert_eq!(ids(&p), ["a", "d", "b", "c", "s"]);
        nodes[1].after([nodes[1].clone()]).unwrap();
        assert_eq!(ids(&p), ["a", "d", "b", "c", "s"]);
        assert_dense(&p);
    }

    #[test]
    fn test_replace_with() {
        let (p, nodes) = sample();
        nodes[2].replace_with([leaf("x"), leaf("y")]).unwrap();
        assert_eq!(ids(&p), ["s", "a", "x", "y", "c", "d"]);
        assert!(!nodes[2].is_attached());
        nodes[3].replace_with([]).unwrap();
        assert_eq!(ids(&p), ["s", "a", "x", "y", "d"]);
        nodes[4].replace_with([nodes[0].clone()]).unwrap();
        assert_eq!(ids(&p), ["a", "x", "y", "s"]);
        assert_dense(&p);
    }

    #[test]
    fn test_replace_with_self() {
        let (p, nodes) = sample();
        nodes[1].replace_with([leaf("x"), nodes[1].clone()]).unwrap();
        assert_eq!(ids(&p), ["s", "x", "a", "b", "c", "d"]);
        assert_dense(&p);
    }

    #[test]
    fn test_detached_operations_fail() {
        let node = leaf("a");
        assert_eq!(node.before([leaf("b")]), Err(Error::NotAttached));
        assert_eq!(node.after([leaf("b")]), Err(Error::NotAttached));
        assert_eq!(node.replace_with([leaf("b")]), Err(Error::NotAttached));
        assert_eq!(node.remove(), Err(Error::NotAttached));
    }

    #[test]
    fn test_rejected_batch_is_atomic() {
        let odd = Node::new(Item::Box("odd"));
        let other = parent();
        let moving = leaf("moving");
        other.append([moving.clone()]).unwrap();
        odd.append([leaf("keep")]).unwrap();

        let result = odd.append([moving.clone(), leaf("reject")]);
        assert!(matches!(result, Err(Error::InvalidChild { .. })));
        assert_eq!(ids(&odd), ["keep"]);
        assert!(moving.parent().unwrap().ptr_eq(&other));
        assert_eq!(ids(&other), ["moving"]);
    }

    #[test]
    fn test_leaf_rejects_children() {
        let node = leaf("a");
        assert_eq!(node.append([leaf("b")]), Err(Error::Leaf("Leaf")));
        assert_eq!(node.prepend([leaf("b")]), Err(Error::Leaf("Leaf")));
    }

    #[test]
    fn test_cycle_and_duplicate_rejected() {
        let outer = parent();
        let inner = parent();
        outer.append([inner.clone()]).unwrap();
        assert_eq!(inner.append([outer.clone()]), Err(Error::Cycle));
        assert_eq!(inner.append([inner.clone()]), Err(Error::Cycle));

        let a = leaf("a");
        assert_eq!(outer.append([a.clone(), a.clone()]), Err(Error::DuplicateNode));
        assert!(!a.is_attached());
    }

    #[test]
    fn test_pinned_node() {
        let p1 = parent();
        let p2 = parent();
        let pinned = Node::new(Item::Pinned);
        p1.append([pinned.clone(), leaf("a")]).unwrap();

        assert_eq!(pinned.remove(), Err(Error::Pinned("Pinned")));
        assert_eq!(p2.append([pinned.clone()]), Err(Error::Pinned("Pinned")));
        assert_eq!(pinned.replace_with([leaf("b")]), Err(Error::Pinned("Pinned")));
        p1.append([pinned.clone()]).unwrap();
        assert_eq!(ids(&p1), ["a", "pinned"]);
    }

    #[test]
    fn test_navigation() {
        let (p, nodes) = sample();
        assert!(p.first().unwrap().ptr_eq(&nodes[0]));
        assert!(p.last().unwrap().ptr_eq(&nodes[4]));
        assert!(nodes[1].next().unwrap().ptr_eq(&nodes[2]));
        assert!(nodes[1].previous().unwrap().ptr_eq(&nodes[0]));
        assert!(nodes[0].previous().is_none());
        assert!(nodes[4].next().is_none());
    }

    #[test]
    fn test_descendants_in_document_order() {
        let root = parent();
        let inner = Node::new(Item::Box("inner"));
        inner.append([leaf("b"), leaf("c")]).unwrap();
        root.append([leaf("a"), inner, leaf("d")]).unwrap();

        let order: Vec<_> = root
            .descendants()
            .map(|n| {
                let data = n.data();
                match &*data {
                    Item::Box(id) | Item::Leaf(id) => *id,
                    Item::Pinned => "pinned",
                }
            })
            .collect();
        assert_eq!(order, ["a", "inner", "b", "c", "d"]);
    }

    #[test]
    fn test_dropped_parent_detaches() {
        let child = leaf("a");
        {
            let p = parent();
            p.append([child.clone()]).unwrap();
            assert!(child.is_attached());
        }
        assert!(!child.is_attached());
        assert!(child.parent().is_none());
    }
}
