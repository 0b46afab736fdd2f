// Comment Threading - flat reply records to a depth-annotated pre-order sequence
// Parents are resolved by id, siblings ordered by (created_at, id), cycles broken

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// A record that can take part in a reply thread.
///
/// `created_at` is compared as raw text, so implementors should use one
/// fixed-offset ISO-8601 format for every record of a thread.
pub trait Threaded {
    fn thread_id(&self) -> &str;
    fn parent_id(&self) -> Option<&str>;
    fn created_at(&self) -> &str;
}

/// One element of a linearized thread. Serializes as the record itself plus a `depth` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadEntry<T> {
    #[serde(flatten)]
    pub item: T,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadError {
    TooManyComments { count: usize, limit: usize },
}

impl fmt::Display for ThreadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadError::TooManyComments { count, limit } => write!(
                f,
                "thread has {} comments, more than the limit of {}",
                count, limit
            ),
        }
    }
}

impl std::error::Error for ThreadError {}

/// Rebuilds reply trees from flat records and flattens them depth-first.
///
/// Records whose parent is absent, unknown, or not present in the input are
/// roots at depth 0. When two records share an id the first one in input order
/// is the one replies attach to; both are still emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadBuilder {
    max_comments: Option<usize>,
}

impl ThreadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ceiling enforced by [`ThreadBuilder::try_build`].
    pub fn with_max_comments(mut self, limit: usize) -> Self {
        self.max_comments = Some(limit);
        self
    }

    /// Same as `build`, but refuses inputs larger than the configured ceiling.
    pub fn try_build<T: Threaded>(&self, items: Vec<T>) -> Result<Vec<ThreadEntry<T>>, ThreadError> {
        if let Some(limit) = self.max_comments {
            if items.len() > limit {
                return Err(ThreadError::TooManyComments {
                    count: items.len(),
                    limit,
                });
            }
        }
        Ok(self.build(items))
    }

    /// Returns every input record exactly once, in display order, with its depth.
    pub fn build<T: Threaded>(&self, items: Vec<T>) -> Vec<ThreadEntry<T>> {
        let order = linearize(&items);

        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|(index, depth)| slots[index].take().map(|item| ThreadEntry { item, depth }))
            .collect()
    }
}

/// Shorthand for `ThreadBuilder::new().build(items)`.
pub fn build_thread<T: Threaded>(items: Vec<T>) -> Vec<ThreadEntry<T>> {
    ThreadBuilder::new().build(items)
}

fn sibling_order<T: Threaded>(a: &T, b: &T) -> Ordering {
    a.created_at()
        .cmp(b.created_at())
        .then_with(|| a.thread_id().cmp(b.thread_id()))
}

/// Computes the output order as (input index, depth) pairs.
fn linearize<T: Threaded>(items: &[T]) -> Vec<(usize, usize)> {
    let n = items.len();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(n);
    for (i, item) in items.iter().enumerate() {
        index.entry(item.thread_id()).or_insert(i);
    }

    let parents: Vec<Option<usize>> = items
        .iter()
        .map(|item| item.parent_id().and_then(|p| index.get(p).copied()))
        .collect();

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    let by_sibling_order = |a: &usize, b: &usize| sibling_order(&items[*a], &items[*b]);
    roots.sort_by(by_sibling_order);
    for group in children.iter_mut() {
        group.sort_by(by_sibling_order);
    }

    let mut visited = vec![false; n];
    let mut out = Vec::with_capacity(n);
    traverse(&roots, &children, &mut visited, &mut out);

    if out.len() < n {
        // Whatever is left hangs off a parent cycle: a visited node always
        // expands all of its children, so unvisited nodes only have unvisited parents.
        let mut pending: Vec<usize> = (0..n).filter(|&i| !visited[i]).collect();
        pending.sort_by(by_sibling_order);

        tracing::warn!(
            unreachable = pending.len(),
            "comment thread has parent cycles, breaking them"
        );

        for start in pending {
            if visited[start] {
                continue;
            }
            let entry = cycle_entry(start, &parents, by_sibling_order);
            traverse(&[entry], &children, &mut visited, &mut out);
        }
    }

    out
}

/// Pre-order walk with an explicit stack. Each node is emitted and expanded once.
fn traverse(
    starts: &[usize],
    children: &[Vec<usize>],
    visited: &mut [bool],
    out: &mut Vec<(usize, usize)>,
) {
    let mut stack: Vec<(usize, usize)> = starts.iter().rev().map(|&i| (i, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        if visited[node] {
            continue;
        }
        visited[node] = true;
        out.push((node, depth));

        stack.extend(children[node].iter().rev().map(|&child| (child, depth + 1)));
    }
}

/// Follows parent links from `start` until a node repeats and returns the
/// first member of that cycle in sibling order.
fn cycle_entry<F>(start: usize, parents: &[Option<usize>], by_sibling_order: F) -> usize
where
    F: Fn(&usize, &usize) -> Ordering,
{
    let mut path = Vec::new();
    let mut position: HashMap<usize, usize> = HashMap::new();
    let mut current = start;

    loop {
        if let Some(&pos) = position.get(&current) {
            return path[pos..]
                .iter()
                .copied()
                .min_by(|a, b| by_sibling_order(a, b))
                .unwrap_or(current);
        }
        position.insert(current, path.len());
        path.push(current);

        match parents[current] {
            Some(parent) => current = parent,
            None => return current,
        }
    }
}
