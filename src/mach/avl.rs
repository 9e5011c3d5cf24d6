use std::cell::RefCell;
use std::cmp::Ordering;

type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    height: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Node<K, V> {
        Node {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn update(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

/// ## Ordered map on a height balanced tree
///
/// Alongside the tree sits the in-order key list used to step from one
/// key to the next. It is dropped whenever the shape of the tree changes
/// and rebuilt on the next `first` or `next`.
#[derive(Debug)]
pub struct AvlTree<K, V> {
    root: Link<K, V>,
    len: usize,
    order: RefCell<Option<Vec<K>>>,
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> AvlTree<K, V> {
        AvlTree {
            root: None,
            len: 0,
            order: RefCell::new(None),
        }
    }
}

impl<K: Ord + Clone, V> AvlTree<K, V> {
    pub fn new() -> AvlTree<K, V> {
        AvlTree::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
        self.invalidate();
    }

    /// Inserts or replaces. The previous value comes back on a collision.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = insert(&mut self.root, key, value);
        if previous.is_none() {
            self.len += 1;
            self.invalidate();
        }
        previous
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = remove(&mut self.root, key);
        if removed.is_some() {
            self.len -= 1;
            self.invalidate();
        }
        removed
    }

    pub fn find(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut link = &mut self.root;
        while let Some(node) = link {
            match key.cmp(&node.key) {
                Ordering::Less => link = &mut node.left,
                Ordering::Greater => link = &mut node.right,
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let mut link = &self.root;
        while let Some(node) = link {
            match key.cmp(&node.key) {
                Ordering::Less => link = &node.left,
                Ordering::Greater => link = &node.right,
                Ordering::Equal => return Some((&node.key, &node.value)),
            }
        }
        None
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.rebuild();
        let key = self.order.borrow().as_ref()?.first()?.clone();
        self.get_key_value(&key)
    }

    /// The entry after `key` in key order. `key` itself need not be present.
    pub fn next(&self, key: &K) -> Option<(&K, &V)> {
        self.rebuild();
        let key = {
            let order = self.order.borrow();
            let keys = order.as_ref()?;
            let index = match keys.binary_search(key) {
                Ok(found) => found + 1,
                Err(insert_at) => insert_at,
            };
            keys.get(index).cloned()
        }?;
        self.get_key_value(&key)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }

    /// True while the in-order list is current.
    pub fn is_ordered(&self) -> bool {
        self.order.borrow().is_some()
    }

    fn invalidate(&mut self) {
        *self.order.get_mut() = None;
    }

    fn rebuild(&self) {
        if self.is_ordered() {
            return;
        }
        let keys: Vec<K> = self.iter().map(|(k, _)| k.clone()).collect();
        *self.order.borrow_mut() = Some(keys);
    }
}

fn insert<K: Ord, V>(link: &mut Link<K, V>, key: K, value: V) -> Option<V> {
    let previous = match link {
        None => {
            *link = Some(Box::new(Node::new(key, value)));
            return None;
        }
        Some(node) => match key.cmp(&node.key) {
            Ordering::Less => insert(&mut node.left, key, value),
            Ordering::Greater => insert(&mut node.right, key, value),
            Ordering::Equal => return Some(std::mem::replace(&mut node.value, value)),
        },
    };
    rebalance(link);
    previous
}

fn remove<K: Ord, V>(link: &mut Link<K, V>, key: &K) -> Option<V> {
    let ordering = key.cmp(&link.as_ref()?.key);
    let removed = match ordering {
        Ordering::Less => remove(&mut link.as_mut()?.left, key),
        Ordering::Greater => remove(&mut link.as_mut()?.right, key),
        Ordering::Equal => {
            let mut node = link.take()?;
            *link = match (node.left.take(), node.right.take()) {
                (None, None) => None,
                (Some(left), None) => Some(left),
                (None, Some(right)) => Some(right),
                (Some(left), Some(right)) => {
                    let mut right = Some(right);
                    match take_min(&mut right) {
                        Some(mut successor) => {
                            successor.left = Some(left);
                            successor.right = right;
                            Some(successor)
                        }
                        None => Some(left),
                    }
                }
            };
            Some(node.value)
        }
    };
    rebalance(link);
    removed
}

fn take_min<K, V>(link: &mut Link<K, V>) -> Link<K, V> {
    let min = if link.as_ref()?.left.is_some() {
        take_min(&mut link.as_mut()?.left)
    } else {
        let mut node = link.take()?;
        *link = node.right.take();
        Some(node)
    };
    rebalance(link);
    min
}

fn rebalance<K, V>(link: &mut Link<K, V>) {
    let node = match link {
        Some(node) => node,
        None => return,
    };
    node.update();
    let balance = node.balance();
    if balance > 1 {
        if node.left.as_ref().map_or(0, |left| left.balance()) < 0 {
            rotate_left(&mut node.left);
        }
        rotate_right(link);
    } else if balance < -1 {
        if node.right.as_ref().map_or(0, |right| right.balance()) > 0 {
            rotate_right(&mut node.right);
        }
        rotate_left(link);
    }
}

fn rotate_right<K, V>(link: &mut Link<K, V>) {
    if let Some(mut node) = link.take() {
        match node.left.take() {
            Some(mut pivot) => {
                node.left = pivot.right.take();
                node.update();
                pivot.right = Some(node);
                pivot.update();
                *link = Some(pivot);
            }
            None => *link = Some(node),
        }
    }
}

fn rotate_left<K, V>(link: &mut Link<K, V>) {
    if let Some(mut node) = link.take() {
        match node.right.take() {
            Some(mut pivot) => {
                node.right = pivot.left.take();
                node.update();
                pivot.left = Some(node);
                pivot.update();
                *link = Some(pivot);
            }
            None => *link = Some(node),
        }
    }
}

/// In-order walk with an explicit stack.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(root: &'a Link<K, V>) -> Iter<'a, K, V> {
        let mut iter = Iter { stack: vec![] };
        iter.descend(root);
        iter
    }

    fn descend(&mut self, mut link: &'a Link<K, V>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend(&node.right);
        Some((&node.key, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;

    fn check<K: Ord, V>(link: &Link<K, V>) -> usize {
        match link {
            None => 0,
            Some(node) => {
                let l = check(&node.left);
                let r = check(&node.right);
                assert!((l as isize - r as isize).abs() <= 1, "unbalanced");
                assert_eq!(node.height, 1 + l.max(r));
                if let Some(left) = &node.left {
                    assert!(left.key < node.key);
                }
                if let Some(right) = &node.right {
                    assert!(right.key > node.key);
                }
                node.height
            }
        }
    }

    #[test]
    fn test_insert_replaces() {
        let mut tree = AvlTree::new();
        assert_eq!(tree.insert(10, "a"), None);
        assert_eq!(tree.insert(10, "b"), Some("a"));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.find(&10), Some(&"b"));
    }

    #[test]
    fn test_sequential_inserts_stay_balanced() {
        let mut tree = AvlTree::new();
        for n in 1..=1000u16 {
            tree.insert(n, ());
        }
        assert!(check(&tree.root) <= 14);
        for n in (1..=1000u16).step_by(2) {
            assert_eq!(tree.remove(&n), Some(()));
        }
        check(&tree.root);
        assert_eq!(tree.len(), 500);
        assert_eq!(tree.first().map(|(k, _)| *k), Some(2));
    }

    #[test]
    fn test_next_skips_missing_keys() {
        let mut tree = AvlTree::new();
        for n in &[30u16, 10, 20] {
            tree.insert(*n, *n * 2);
        }
        assert_eq!(tree.next(&10), Some((&20, &40)));
        assert_eq!(tree.next(&15), Some((&20, &40)));
        assert_eq!(tree.next(&0), Some((&10, &20)));
        assert_eq!(tree.next(&30), None);
    }

    #[test]
    fn test_order_is_lazy() {
        let mut tree = AvlTree::new();
        tree.insert(1, 'a');
        assert!(!tree.is_ordered());
        tree.first();
        assert!(tree.is_ordered());
        tree.insert(1, 'b');
        assert!(tree.is_ordered());
        *tree.find_mut(&1).unwrap() = 'c';
        assert!(tree.is_ordered());
        tree.insert(2, 'd');
        assert!(!tree.is_ordered());
        tree.next(&1);
        tree.remove(&9);
        assert!(tree.is_ordered());
        tree.remove(&1);
        assert!(!tree.is_ordered());
    }

    #[test]
    fn test_clear() {
        let mut tree = AvlTree::new();
        tree.insert("A".to_string(), 1.0);
        tree.insert("A$".to_string(), 2.0);
        tree.first();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.first(), None);
    }

    #[test]
    fn prop_matches_btreemap() {
        fn property(ops: Vec<(bool, u8)>) -> TestResult {
            let mut tree = AvlTree::new();
            let mut model = std::collections::BTreeMap::new();
            for (insert, key) in ops {
                if insert {
                    if tree.insert(key, key) != model.insert(key, key) {
                        return TestResult::failed();
                    }
                } else if tree.remove(&key) != model.remove(&key) {
                    return TestResult::failed();
                }
            }
            check(&tree.root);
            let mut walked = vec![];
            let mut at = tree.first();
            while let Some((k, _)) = at {
                walked.push(*k);
                at = tree.next(k);
            }
            let expected: Vec<u8> = model.keys().copied().collect();
            TestResult::from_bool(walked == expected && tree.len() == model.len())
        }
        let mut qc = quickcheck::QuickCheck::new().tests(200);
        qc.quickcheck(property as fn(Vec<(bool, u8)>) -> TestResult);
    }
}
