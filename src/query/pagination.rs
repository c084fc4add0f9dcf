use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub page: i64,
    pub limit: i64,
}

/// Neighbouring-page metadata for a list response. Both references are
/// omitted at their respective boundaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
}

impl Pagination {
    pub fn compute(page: i64, limit: i64, total: i64) -> Self {
        let mut pagination = Self::default();
        if page * limit < total {
            pagination.next = Some(PageRef {
                page: page + 1,
                limit,
            });
        }
        if (page - 1) * limit > 0 {
            pagination.prev = Some(PageRef {
                page: page - 1,
                limit,
            });
        }
        pagination
    }

    pub fn is_empty(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page_has_both_neighbours() {
        let pagination = Pagination::compute(2, 10, 30);
        assert_eq!(pagination.next, Some(PageRef { page: 3, limit: 10 }));
        assert_eq!(pagination.prev, Some(PageRef { page: 1, limit: 10 }));
    }

    #[test]
    fn first_page_has_no_prev() {
        let pagination = Pagination::compute(1, 10, 30);
        assert_eq!(pagination.next, Some(PageRef { page: 2, limit: 10 }));
        assert_eq!(pagination.prev, None);
    }

    #[test]
    fn last_page_has_no_next() {
        let pagination = Pagination::compute(3, 10, 30);
        assert_eq!(pagination.next, None);
        assert_eq!(pagination.prev, Some(PageRef { page: 2, limit: 10 }));
    }

    #[test]
    fn single_page_has_neither() {
        let pagination = Pagination::compute(1, 25, 10);
        assert!(pagination.is_empty());
    }

    #[test]
    fn partial_last_page_has_no_next() {
        // 25 records, limit 10: page 3 holds the final 5
        let pagination = Pagination::compute(3, 10, 25);
        assert_eq!(pagination.next, None);
    }
}
