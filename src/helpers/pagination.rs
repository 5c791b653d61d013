use serde::{Deserialize, Serialize};

/// 分页查询参数结构体
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// 页码，默认为1
    pub page: Option<usize>,
    /// 每页数量，默认为10，范围1-100
    pub per_page: Option<usize>,
}

/// 分页信息结构体
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    /// 当前页第一条的序号（从 1 开始），没有数据时为 0
    pub start_item: usize,
    pub end_item: usize,
}

impl PageQuery {
    // 页码 ≤ 0 统一视为第 1 页
    pub fn get_page(&self) -> usize {
        self.page.filter(|&p| p > 0).unwrap_or(1)
    }

    /// 获取处理后的每页数量，确保在合理范围内
    pub fn get_per_page(&self) -> usize {
        self.per_page.unwrap_or(10).clamp(1, 100)
    }

    pub fn get_offset(&self) -> usize {
        (self.get_page() - 1) * self.get_per_page()
    }
}

impl Pagination {
    pub fn prev_page(&self) -> usize {
        self.current_page.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> usize {
        self.current_page + 1
    }
}

/// 对内存中的列表分页，返回当前页切片和分页信息
///
/// 页码超过总页数时返回空切片，分页信息仍反映请求的页码
pub fn paginate<'a, T>(items: &'a [T], query: &PageQuery) -> (&'a [T], Pagination) {
    let page = query.get_page();
    let per_page = query.get_per_page();
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let start = query.get_offset().min(total);
    let end = (start + per_page).min(total);
    let slice = &items[start..end];

    let (start_item, end_item) = if slice.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    (
        slice,
        Pagination {
            current_page: page,
            per_page,
            total,
            total_pages,
            has_prev: page > 1,
            has_next: page < total_pages,
            start_item,
            end_item,
        },
    )
}
