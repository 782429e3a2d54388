use serde::{Deserialize, Serialize};

use crate::model::{Student, StudentFilterMeta};

/// One page of a server-side paginated list. The server owns `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
}

fn first_page() -> u32 {
    1
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            per_page: 0,
            total: 0,
        }
    }
}

impl<T> Page<T> {
    /// "No results" is decided by the server's total, not by `items`.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return u64::from(self.total > 0);
        }
        self.total.div_ceil(u64::from(self.per_page))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Student list page plus the filter values the backend can offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPage {
    #[serde(flatten)]
    pub page: Page<Student>,
    #[serde(default)]
    pub meta: StudentFilterMeta,
}
