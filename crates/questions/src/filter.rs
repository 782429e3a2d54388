//! Filter state of the list views.
//!
//! Each filter owns its criteria plus a `Paging` block. The rules shared by
//! every list view live in `ListFilter`'s provided methods:
//! - any criterion change resets the page to 1
//! - a page-size change resets the page to 1
//! - explicit page navigation keeps the criteria
//!
//! `query()` rebuilds the full query-parameter list from scratch on every
//! call; empty criteria are omitted.

use crate::model::{Difficulty, ResultStatus};

pub const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

pub trait ListFilter: Clone + Send + Sync + 'static {
    fn paging(&self) -> &Paging;

    fn paging_mut(&mut self) -> &mut Paging;

    /// Non-paging query parameters, empty ones left out.
    fn criteria(&self) -> Vec<(&'static str, String)>;

    fn page(&self) -> u32 {
        self.paging().page
    }

    fn per_page(&self) -> u32 {
        self.paging().per_page
    }

    /// Navigate to `page` (1-based, clamped). Criteria are untouched.
    fn goto_page(&mut self, page: u32) {
        self.paging_mut().page = page.max(1);
    }

    fn set_per_page(&mut self, per_page: u32) {
        let paging = self.paging_mut();
        paging.per_page = per_page.max(1);
        paging.page = 1;
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut q = self.criteria();
        q.push(("page", self.page().to_string()));
        q.push(("per_page", self.per_page().to_string()));
        q
    }
}

fn push_text(q: &mut Vec<(&'static str, String)>, key: &'static str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        q.push((key, value.to_string()));
    }
}

/// Question bank filter (`search`, `topic`, `subtopic`, `difficulty`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QuestionFilter {
    search: String,
    topic: Option<String>,
    subtopic: Option<String>,
    difficulty: Option<Difficulty>,
    paging: Paging,
}

impl QuestionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn subtopic(&self) -> Option<&str> {
        self.subtopic.as_deref()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.paging.page = 1;
    }

    /// Subtopics belong to a topic, so a topic change drops the subtopic too.
    pub fn set_topic(&mut self, topic: Option<String>) {
        if self.topic != topic {
            self.subtopic = None;
        }
        self.topic = topic;
        self.paging.page = 1;
    }

    pub fn set_subtopic(&mut self, subtopic: Option<String>) {
        self.subtopic = subtopic;
        self.paging.page = 1;
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.difficulty = difficulty;
        self.paging.page = 1;
    }
}

impl ListFilter for QuestionFilter {
    fn paging(&self) -> &Paging {
        &self.paging
    }

    fn paging_mut(&mut self) -> &mut Paging {
        &mut self.paging
    }

    fn criteria(&self) -> Vec<(&'static str, String)> {
        let mut q = Vec::new();
        push_text(&mut q, "search", &self.search);
        if let Some(topic) = &self.topic {
            push_text(&mut q, "topic", topic);
        }
        if let Some(subtopic) = &self.subtopic {
            push_text(&mut q, "subtopic", subtopic);
        }
        if let Some(difficulty) = self.difficulty {
            q.push(("difficulty", difficulty.to_string()));
        }
        q
    }
}

/// Student assignment filter (`search`, `branch`, `year_of_study`, `semester`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StudentFilter {
    search: String,
    branch: Option<String>,
    year_of_study: Option<u8>,
    semester: Option<u8>,
    paging: Paging,
}

impl StudentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn year_of_study(&self) -> Option<u8> {
        self.year_of_study
    }

    pub fn semester(&self) -> Option<u8> {
        self.semester
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.paging.page = 1;
    }

    pub fn set_branch(&mut self, branch: Option<String>) {
        self.branch = branch;
        self.paging.page = 1;
    }

    pub fn set_year_of_study(&mut self, year: Option<u8>) {
        self.year_of_study = year;
        self.paging.page = 1;
    }

    pub fn set_semester(&mut self, semester: Option<u8>) {
        self.semester = semester;
        self.paging.page = 1;
    }
}

impl ListFilter for StudentFilter {
    fn paging(&self) -> &Paging {
        &self.paging
    }

    fn paging_mut(&mut self) -> &mut Paging {
        &mut self.paging
    }

    fn criteria(&self) -> Vec<(&'static str, String)> {
        let mut q = Vec::new();
        push_text(&mut q, "search", &self.search);
        if let Some(branch) = &self.branch {
            push_text(&mut q, "branch", branch);
        }
        if let Some(year) = self.year_of_study {
            q.push(("year_of_study", year.to_string()));
        }
        if let Some(semester) = self.semester {
            q.push(("semester", semester.to_string()));
        }
        q
    }
}

/// Test results filter (`search`, `status`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResultFilter {
    search: String,
    status: Option<ResultStatus>,
    paging: Paging,
}

impl ResultFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<ResultStatus> {
        self.status
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.paging.page = 1;
    }

    pub fn set_status(&mut self, status: Option<ResultStatus>) {
        self.status = status;
        self.paging.page = 1;
    }
}

impl ListFilter for ResultFilter {
    fn paging(&self) -> &Paging {
        &self.paging
    }

    fn paging_mut(&mut self) -> &mut Paging {
        &mut self.paging
    }

    fn criteria(&self) -> Vec<(&'static str, String)> {
        let mut q = Vec::new();
        push_text(&mut q, "search", &self.search);
        if let Some(status) = self.status {
            q.push(("status", status.to_string()));
        }
        q
    }
}
