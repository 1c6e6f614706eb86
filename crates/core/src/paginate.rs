use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub visible: Range<usize>,
    pub appended: Range<usize>,
    pub has_more: bool,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible_len(total) < total
    }

    pub fn window(&self, total: usize) -> PageWindow {
        let end = self.visible_len(total);
        let start = (self.current_page - 1).saturating_mul(self.page_size).min(end);
        PageWindow {
            page: self.current_page,
            visible: 0..end,
            appended: start..end,
            has_more: end < total,
        }
    }

    pub fn load_more(&mut self, total: usize) -> Option<PageWindow> {
        if !self.has_more(total) {
            return None;
        }
        self.current_page += 1;
        Some(self.window(total))
    }

    fn visible_len(&self, total: usize) -> usize {
        self.current_page.saturating_mul(self.page_size).min(total)
    }
}
