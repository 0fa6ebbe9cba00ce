//! Common transport-layer types shared across the API surface.
//! Every list endpoint takes the same page/limit query pair and returns the
//! same pagination block, so both live here instead of being repeated per
//! handler module.

mod pagination;

pub use pagination::{Pagination, PaginationQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
