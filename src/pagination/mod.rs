mod cursor;

pub use cursor::{PageCursor, PaginationConfig, build_paginated_url};
