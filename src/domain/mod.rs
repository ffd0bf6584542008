//! Domain layer: the ordered tree and everything it can do without I/O
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod codec;
pub mod edit;
pub mod entities;
pub mod error;
pub mod order;
pub mod reconcile;
pub mod tree_traits;

pub use arena::{OrderedTree, TreeIterator, TreeNode};
pub use codec::{deserialize, deserialize_with, serialize, EMPTY_TREE};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use order::{build_order_string, OrderedListNodeVisitor, DEFAULT_ORDER_COLUMN, EMPTY_ORDER};
pub use tree_traits::TreeNodeConvert;
