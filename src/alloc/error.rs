use thiserror::Error;

/// Recoverable per-window failures. None of these end a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocError {
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error("category has no items: {0}")]
    EmptyCategory(String),

    #[error("cannot draw from empty pool: {0}")]
    EmptyPool(String),

    #[error("item {index} not found in category {category}")]
    ItemNotFound { category: String, index: usize },

    #[error("no progress at cursor {cursor:.3}s in window ending {end:.3}s")]
    PlacementStuck { cursor: f64, end: f64 },
}

impl AllocError {
    /// Stable machine-readable code used in run reports.
    pub fn code(&self) -> &'static str {
        match self {
            AllocError::CategoryNotFound(_) => "category_not_found",
            AllocError::EmptyCategory(_) => "empty_category",
            AllocError::EmptyPool(_) => "empty_pool",
            AllocError::ItemNotFound { .. } => "item_not_found",
            AllocError::PlacementStuck { .. } => "placement_stuck",
        }
    }
}
