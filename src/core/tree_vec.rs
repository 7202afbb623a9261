use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::core::ColumnVec;

/// Index of the tree holding columns shared by all components, such as selectors.
pub const PREPROCESSED_TRACE_IDX: usize = 0;
/// Index of the tree holding the columns each component owns.
pub const ORIGINAL_TRACE_IDX: usize = 1;

/// One entry per trace tree, indexed by [PREPROCESSED_TRACE_IDX] and [ORIGINAL_TRACE_IDX].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeVec<T>(pub Vec<T>);

impl<T> TreeVec<T> {
    pub fn new(vec: Vec<T>) -> TreeVec<T> {
        TreeVec(vec)
    }
}

impl<T> Deref for TreeVec<T> {
    type Target = Vec<T>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for TreeVec<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> Default for TreeVec<T> {
    fn default() -> Self {
        TreeVec(Vec::new())
    }
}

impl<T> TreeVec<ColumnVec<T>> {
    /// Appends the columns of each tree, in order. The result has as many trees as the largest
    /// input.
    pub fn concat_cols(trees: impl Iterator<Item = TreeVec<ColumnVec<T>>>) -> Self {
        let mut res = TreeVec::default();
        for tree in trees {
            for (tree_index, columns) in tree.0.into_iter().enumerate() {
                if res.len() <= tree_index {
                    res.resize_with(tree_index + 1, Vec::new);
                }
                res[tree_index].extend(columns);
            }
        }
        res
    }
}
