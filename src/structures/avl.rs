//! AVL tree: a self-balancing binary search tree
//!
//! Holds unique payloads ordered by `Ord`. Inserting a payload that compares
//! equal to a stored one replaces it in place (insert-or-update), so `len()`
//! only grows when a node is created.
//!
//! # Invariants
//!
//! - Height of an absent child is 0; a node's height is 1 + max(child heights)
//! - |height(left) - height(right)| <= 1 at every node
//! - Left payloads compare strictly less, right payloads strictly greater
//!
//! # Complexity
//!
//! - insert / remove / search: O(log n)
//! - in_order / level_order: O(n)
//! - height / len: O(1), min / max: O(log n)

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::mem;

use super::errors::{StructureError, StructureResult};

type Link<T> = Option<Box<AvlNode<T>>>;

#[derive(Debug, Clone)]
struct AvlNode<T> {
    data: T,
    left: Link<T>,
    right: Link<T>,
    height: u32,
}

impl<T> AvlNode<T> {
    fn leaf(data: T) -> Box<Self> {
        Box::new(Self {
            data,
            left: None,
            right: None,
            height: 1,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// Left subtree height minus right subtree height
    fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

fn height<T>(link: &Link<T>) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Which way an insertion went at a given node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Descent {
    Left,
    Right,
    /// A new leaf was created here
    Created,
    /// An equal payload was replaced here
    Replaced,
}

struct Inserted<T> {
    node: Box<AvlNode<T>>,
    descent: Descent,
    replaced: Option<T>,
}

/// Self-balancing binary search tree over unique payloads
#[derive(Debug, Clone)]
pub struct AvlTree<T> {
    root: Link<T>,
    len: usize,
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AvlTree<T> {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of stored payloads
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no payloads
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root (0 for an empty tree). O(1).
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Removes every payload
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Smallest payload (leftmost node)
    pub fn min(&self) -> StructureResult<&T> {
        let mut current = self.root.as_deref().ok_or(StructureError::empty("min"))?;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        Ok(&current.data)
    }

    /// Largest payload (rightmost node)
    pub fn max(&self) -> StructureResult<&T> {
        let mut current = self.root.as_deref().ok_or(StructureError::empty("max"))?;
        while let Some(right) = current.right.as_deref() {
            current = right;
        }
        Ok(&current.data)
    }

    /// All payloads in ascending order
    pub fn in_order(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        Self::collect_in_order(self.root.as_deref(), &mut out);
        out
    }

    fn collect_in_order<'a>(node: Option<&'a AvlNode<T>>, out: &mut Vec<&'a T>) {
        if let Some(node) = node {
            Self::collect_in_order(node.left.as_deref(), out);
            out.push(&node.data);
            Self::collect_in_order(node.right.as_deref(), out);
        }
    }

    /// All payloads breadth-first, root first
    pub fn level_order(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        let mut queue = VecDeque::new();
        if let Some(root) = self.root.as_deref() {
            queue.push_back(root);
        }
        while let Some(node) = queue.pop_front() {
            out.push(&node.data);
            if let Some(left) = node.left.as_deref() {
                queue.push_back(left);
            }
            if let Some(right) = node.right.as_deref() {
                queue.push_back(right);
            }
        }
        out
    }

    /// Right rotation (left-left case)
    ///
    /// ```text
    ///       y            x
    ///      / \          / \
    ///     x   C  -->   A   y
    ///    / \              / \
    ///   A   B            B   C
    /// ```
    fn rotate_right(mut y: Box<AvlNode<T>>) -> Box<AvlNode<T>> {
        let Some(mut x) = y.left.take() else {
            return y;
        };
        y.left = x.right.take();
        y.update_height();
        x.right = Some(y);
        x.update_height();
        x
    }

    /// Left rotation (right-right case)
    ///
    /// ```text
    ///     x                y
    ///    / \              / \
    ///   A   y    -->     x   C
    ///      / \          / \
    ///     B   C        A   B
    /// ```
    fn rotate_left(mut x: Box<AvlNode<T>>) -> Box<AvlNode<T>> {
        let Some(mut y) = x.right.take() else {
            return x;
        };
        x.right = y.left.take();
        x.update_height();
        y.left = Some(x);
        y.update_height();
        y
    }

    /// Restores balance using the heavy child's own balance factor.
    ///
    /// Used on the removal path, where there is no inserted item to compare.
    fn rebalance(mut node: Box<AvlNode<T>>) -> Box<AvlNode<T>> {
        let balance = node.balance_factor();

        if balance > 1 {
            let left_balance = node.left.as_ref().map_or(0, |l| l.balance_factor());
            if left_balance < 0 {
                node.left = node.left.take().map(Self::rotate_left);
            }
            return Self::rotate_right(node);
        }

        if balance < -1 {
            let right_balance = node.right.as_ref().map_or(0, |r| r.balance_factor());
            if right_balance > 0 {
                node.right = node.right.take().map(Self::rotate_right);
            }
            return Self::rotate_left(node);
        }

        node
    }

    /// Restores balance after an insertion.
    ///
    /// `child_descent` is the direction the insertion took at the heavy
    /// child, which tells straight (LL/RR) from zig-zag (LR/RL) cases the
    /// same way comparing the inserted item against that child would.
    fn rebalance_after_insert(
        mut node: Box<AvlNode<T>>,
        child_descent: Descent,
    ) -> Box<AvlNode<T>> {
        let balance = node.balance_factor();

        if balance > 1 {
            return match child_descent {
                Descent::Left => Self::rotate_right(node),
                Descent::Right => {
                    node.left = node.left.take().map(Self::rotate_left);
                    Self::rotate_right(node)
                }
                Descent::Created | Descent::Replaced => Self::rebalance(node),
            };
        }

        if balance < -1 {
            return match child_descent {
                Descent::Right => Self::rotate_left(node),
                Descent::Left => {
                    node.right = node.right.take().map(Self::rotate_right);
                    Self::rotate_left(node)
                }
                Descent::Created | Descent::Replaced => Self::rebalance(node),
            };
        }

        node
    }

    /// Detaches the leftmost node of a subtree, rebalancing on the way up.
    fn take_min(mut node: Box<AvlNode<T>>) -> (Link<T>, T) {
        match node.left.take() {
            None => {
                let AvlNode { data, right, .. } = *node;
                (right, data)
            }
            Some(left) => {
                let (left, min) = Self::take_min(left);
                node.left = left;
                node.update_height();
                (Some(Self::rebalance(node)), min)
            }
        }
    }

    fn check_node(node: Option<&AvlNode<T>>) -> Option<u32> {
        let Some(node) = node else {
            return Some(0);
        };
        let left = Self::check_node(node.left.as_deref())?;
        let right = Self::check_node(node.right.as_deref())?;
        let expected = 1 + left.max(right);
        if node.height != expected || left.abs_diff(right) > 1 {
            return None;
        }
        Some(expected)
    }
}

impl<T: Ord> AvlTree<T> {
    /// Inserts a payload, or replaces the stored payload that compares equal.
    ///
    /// Returns the replaced payload, if any. `len()` grows only when `None`
    /// is returned.
    pub fn insert(&mut self, item: T) -> Option<T> {
        let inserted = Self::insert_node(self.root.take(), item);
        self.root = Some(inserted.node);
        if inserted.replaced.is_none() {
            self.len += 1;
        }
        inserted.replaced
    }

    fn insert_node(link: Link<T>, item: T) -> Inserted<T> {
        let Some(mut node) = link else {
            return Inserted {
                node: AvlNode::leaf(item),
                descent: Descent::Created,
                replaced: None,
            };
        };

        let (descent, child) = match item.cmp(&node.data) {
            Ordering::Less => {
                let child = Self::insert_node(node.left.take(), item);
                (Descent::Left, child)
            }
            Ordering::Greater => {
                let child = Self::insert_node(node.right.take(), item);
                (Descent::Right, child)
            }
            Ordering::Equal => {
                let previous = mem::replace(&mut node.data, item);
                return Inserted {
                    node,
                    descent: Descent::Replaced,
                    replaced: Some(previous),
                };
            }
        };

        let Inserted {
            node: child_node,
            descent: child_descent,
            replaced,
        } = child;
        match descent {
            Descent::Left => node.left = Some(child_node),
            _ => node.right = Some(child_node),
        }

        node.update_height();
        Inserted {
            node: Self::rebalance_after_insert(node, child_descent),
            descent,
            replaced,
        }
    }

    /// Finds the stored payload that compares equal to `probe`
    pub fn search(&self, probe: &T) -> Option<&T> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match probe.cmp(&node.data) {
                Ordering::Equal => return Some(&node.data),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Returns true if a payload equal to `probe` is stored
    pub fn contains(&self, probe: &T) -> bool {
        self.search(probe).is_some()
    }

    /// Removes the payload equal to `probe` and returns it.
    pub fn remove(&mut self, probe: &T) -> Option<T> {
        let (root, removed) = Self::remove_node(self.root.take(), probe);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    fn remove_node(link: Link<T>, probe: &T) -> (Link<T>, Option<T>) {
        let Some(mut node) = link else {
            return (None, None);
        };

        let removed = match probe.cmp(&node.data) {
            Ordering::Less => {
                let (left, removed) = Self::remove_node(node.left.take(), probe);
                node.left = left;
                removed
            }
            Ordering::Greater => {
                let (right, removed) = Self::remove_node(node.right.take(), probe);
                node.right = right;
                removed
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => {
                    let AvlNode { data, .. } = *node;
                    return (None, Some(data));
                }
                (Some(child), None) | (None, Some(child)) => {
                    let AvlNode { data, .. } = *node;
                    return (Some(child), Some(data));
                }
                (Some(left), Some(right)) => {
                    // Two children: the in-order successor takes this slot
                    let (right, successor) = Self::take_min(right);
                    node.left = Some(left);
                    node.right = right;
                    Some(mem::replace(&mut node.data, successor))
                }
            },
        };

        node.update_height();
        (Some(Self::rebalance(node)), removed)
    }

    /// Recomputes heights, balance factors and ordering from scratch.
    ///
    /// Diagnostic only; O(n).
    pub fn verify_invariants(&self) -> bool {
        if Self::check_node(self.root.as_deref()).is_none() {
            return false;
        }
        let ordered = self.in_order();
        ordered.len() == self.len && ordered.windows(2).all(|w| w[0] < w[1])
    }
}

impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        for item in iter {
            tree.insert(item);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn values(tree: &AvlTree<i32>) -> Vec<i32> {
        tree.in_order().into_iter().copied().collect()
    }

    fn levels(tree: &AvlTree<i32>) -> Vec<i32> {
        tree.level_order().into_iter().copied().collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree: AvlTree<i32> = AvlTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert!(tree.search(&1).is_none());
        assert!(tree.in_order().is_empty());
        assert!(tree.level_order().is_empty());
        assert!(tree.verify_invariants());
    }

    #[test]
    fn test_min_max_empty_is_error() {
        let tree: AvlTree<i32> = AvlTree::new();
        assert_eq!(tree.min(), Err(StructureError::empty("min")));
        assert_eq!(tree.max(), Err(StructureError::empty("max")));
    }

    #[test]
    fn test_left_left_rotation() {
        let tree: AvlTree<i32> = [3, 2, 1].into_iter().collect();
        assert_eq!(levels(&tree), vec![2, 1, 3]);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_right_right_rotation() {
        let tree: AvlTree<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(levels(&tree), vec![2, 1, 3]);
    }

    #[test]
    fn test_left_right_rotation() {
        let tree: AvlTree<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(levels(&tree), vec![2, 1, 3]);
    }

    #[test]
    fn test_right_left_rotation() {
        let tree: AvlTree<i32> = [1, 3, 2].into_iter().collect();
        assert_eq!(levels(&tree), vec![2, 1, 3]);
    }

    #[test]
    fn test_sorted_input_stays_logarithmic() {
        let tree: AvlTree<i32> = (0..1023).collect();
        assert_eq!(tree.len(), 1023);
        assert_eq!(tree.height(), 10);
        assert!(tree.verify_invariants());
    }

    #[test]
    fn test_duplicate_insert_replaces_without_growing() {
        let mut tree = AvlTree::new();
        assert_eq!(tree.insert(5), None);
        assert_eq!(tree.insert(7), None);
        assert_eq!(tree.insert(5), Some(5));
        assert_eq!(tree.len(), 2);
        assert_eq!(values(&tree), vec![5, 7]);
    }

    #[test]
    fn test_min_max() {
        let tree: AvlTree<i32> = [50, 20, 80, 10, 90].into_iter().collect();
        assert_eq!(tree.min(), Ok(&10));
        assert_eq!(tree.max(), Ok(&90));
    }

    #[test]
    fn test_remove_leaf() {
        let mut tree: AvlTree<i32> = [2, 1, 3].into_iter().collect();
        assert_eq!(tree.remove(&1), Some(1));
        assert_eq!(values(&tree), vec![2, 3]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_remove_node_with_one_child() {
        let mut tree: AvlTree<i32> = [2, 1, 3, 4].into_iter().collect();
        assert_eq!(tree.remove(&3), Some(3));
        assert_eq!(values(&tree), vec![1, 2, 4]);
        assert!(tree.verify_invariants());
    }

    #[test]
    fn test_remove_node_with_two_children_uses_successor() {
        let mut tree: AvlTree<i32> = [4, 2, 6, 1, 3, 5, 7].into_iter().collect();
        assert_eq!(tree.remove(&4), Some(4));
        assert_eq!(levels(&tree)[0], 5);
        assert_eq!(values(&tree), vec![1, 2, 3, 5, 6, 7]);
        assert!(tree.verify_invariants());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut tree: AvlTree<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(tree.remove(&42), None);
        assert_eq!(tree.len(), 3);

        let mut empty: AvlTree<i32> = AvlTree::new();
        assert_eq!(empty.remove(&1), None);
        assert_eq!(empty.len(), 0);
    }

    #[test]
    fn test_remove_rebalances() {
        // Removing 1 leaves the root right-heavy with a right child of factor 0
        let mut tree: AvlTree<i32> = [2, 1, 3, 4, 5].into_iter().collect();
        tree.remove(&1);
        assert!(tree.verify_invariants());

        // Right-left case on removal
        let mut tree: AvlTree<i32> = [2, 1, 4, 3].into_iter().collect();
        tree.remove(&1);
        assert_eq!(levels(&tree), vec![3, 2, 4]);
        assert!(tree.verify_invariants());
    }

    #[test]
    fn test_clear() {
        let mut tree: AvlTree<i32> = (0..10).collect();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_mixed_workload_keeps_invariants(
            ops in prop::collection::vec((any::<bool>(), 0i32..256), 0..2000),
        ) {
            let mut tree = AvlTree::new();
            let mut live = std::collections::BTreeSet::new();

            for (is_insert, value) in ops {
                if is_insert {
                    prop_assert_eq!(tree.insert(value).is_none(), live.insert(value));
                } else {
                    prop_assert_eq!(tree.remove(&value).is_some(), live.remove(&value));
                }
                prop_assert!(tree.verify_invariants());
            }

            prop_assert_eq!(tree.len(), live.len());
            prop_assert_eq!(values(&tree), live.into_iter().collect::<Vec<_>>());
        }
    }
}
