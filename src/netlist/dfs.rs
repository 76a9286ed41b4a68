//! An iterative post-order walker over dense adjacency lists.
//!
//! See [`PostOrder`] for details.

/// The walk reached a node which is still being explored: there is a cycle through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackEdge(pub usize);

/// A post-order DFS visitor over nodes `0..adjacency.len()`.
///
/// A node is yielded once all of its successors have been yielded. Every node is
/// visited, roots being picked in increasing index order, successors in list order.
/// No recursion is involved, so deep graphs are fine.
///
/// ```rust
/// use combtab::netlist::dfs::PostOrder;
/// // 0 -> 1 -> 2
/// let adjacency = vec![vec![1], vec![2], vec![]];
/// assert_eq!(PostOrder::new(&adjacency).into_order(), Ok(vec![2, 1, 0]));
/// ```
pub struct PostOrder<'a> {
    adjacency: &'a [Vec<usize>],
    /// Pending nodes. The flag is set on the second visit, once successors were pushed.
    stack: Vec<(usize, bool)>,
    /// Set on the first visit.
    seen: Vec<bool>,
    /// Set once the node has been yielded.
    done: Vec<bool>,
    next_root: usize,
}

impl<'a> PostOrder<'a> {
    pub fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let n = adjacency.len();
        PostOrder {
            adjacency,
            stack: Vec::new(),
            seen: vec![false; n],
            done: vec![false; n],
            next_root: 0,
        }
    }

    /// Pushes the next unexplored root, returns false once every node is done.
    fn new_start(&mut self) -> bool {
        debug_assert!(self.stack.is_empty());

        while self.next_root < self.adjacency.len() {
            let root = self.next_root;
            self.next_root += 1;
            if !self.done[root] {
                self.stack.push((root, false));
                return true;
            }
        }
        false
    }

    /// Yields the next node in post-order, `None` when the walk is over.
    pub fn next(&mut self) -> Result<Option<usize>, BackEdge> {
        loop {
            while let Some((node, expanded)) = self.stack.pop() {
                if expanded {
                    self.done[node] = true;
                    return Ok(Some(node));
                }
                if self.done[node] {
                    continue;
                }
                // Seen but not done: the node is an ancestor of the current one.
                if self.seen[node] {
                    return Err(BackEdge(node));
                }

                self.seen[node] = true;
                self.stack.push((node, true));
                for &succ in self.adjacency[node].iter().rev() {
                    if !self.done[succ] {
                        self.stack.push((succ, false));
                    }
                }
            }

            if !self.new_start() {
                return Ok(None);
            }
        }
    }

    /// Runs the walk to completion.
    pub fn into_order(mut self) -> Result<Vec<usize>, BackEdge> {
        let mut order = Vec::with_capacity(self.adjacency.len());
        while let Some(node) = self.next()? {
            order.push(node);
        }
        Ok(order)
    }
}
