use std::collections::HashSet;

use crate::{
    filter::{Filter, FilterFields, FilterPatch},
    job::{Job, JobId},
    sort::SortMode,
};

pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Where the engine's collection came from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LoadState {
    /// A fetch is outstanding. The collection is empty.
    Loading,
    Loaded,
    /// The last fetch failed. The collection is empty and the UI should offer
    /// to retry.
    Failed(String),
}

/// What the presentation layer should show.
#[derive(PartialEq, Debug)]
pub enum View<'a> {
    Loading,
    Failed { message: &'a str },
    NoResults,
    Page {
        items: Vec<&'a Job>,
        total: usize,
        has_more: bool,
    },
}

/// Filters, sorts and pages an in-memory collection of jobs.
///
/// The view is always recomputed from the full collection, so changing a
/// criterion can widen the results as well as narrow them. The page resets to 1
/// on every filter, sort or collection change and only [`ListingEngine::load_more`]
/// advances it.
#[derive(Debug)]
pub struct ListingEngine {
    jobs: Vec<Job>,
    fields: FilterFields,
    filter: Filter,
    sort: SortMode,
    page_size: usize,
    current_page: usize,
    /// Indices into `jobs`, filtered and sorted.
    view: Vec<usize>,
    state: LoadState,
}

impl Default for ListingEngine {
    fn default() -> Self {
        Self::new(FilterFields::PUBLIC, DEFAULT_PAGE_SIZE)
    }
}

impl ListingEngine {
    pub fn new(fields: FilterFields, page_size: usize) -> Self {
        Self {
            jobs: Vec::new(),
            fields,
            filter: Filter::default(),
            sort: SortMode::default(),
            page_size: page_size.max(1),
            current_page: 1,
            view: Vec::new(),
            state: LoadState::Loaded,
        }
    }

    pub fn with_jobs(mut self, jobs: Vec<Job>) -> Self {
        self.set_jobs(jobs);
        self
    }

    /// Replaces the collection. Jobs with an already-seen ID are dropped.
    pub fn set_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
        self.dedup();
        self.state = LoadState::Loaded;
        self.current_page = 1;
        self.recompute();
    }

    /// Empties the collection while a fetch is outstanding.
    pub fn mark_loading(&mut self) {
        self.jobs.clear();
        self.state = LoadState::Loading;
        self.current_page = 1;
        self.recompute();
    }

    /// Empties the collection after a failed fetch.
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.jobs.clear();
        self.state = LoadState::Failed(message.into());
        self.current_page = 1;
        self.recompute();
    }

    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.filter.merge(patch, self.fields);
        self.current_page = 1;
        self.recompute();
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(FilterPatch::clear());
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
        self.current_page = 1;
        self.recompute();
    }

    /// Reveals one more page. Returns false, changing nothing, when the current
    /// page already covers every result.
    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Reveals pages until `pages` are showing or every result is.
    pub fn load_pages(&mut self, pages: usize) {
        while self.current_page < pages && self.load_more() {}
    }

    /// Mutates the full collection in place and re-derives the view. The
    /// current page is kept. Jobs left with an already-seen ID are dropped.
    pub fn update_jobs<T>(&mut self, f: impl FnOnce(&mut Vec<Job>) -> T) -> T {
        let result = f(&mut self.jobs);
        self.dedup();
        self.recompute();
        result
    }

    /// The cumulative prefix of results revealed so far.
    pub fn visible_items(&self) -> Vec<&Job> {
        self.view
            .iter()
            .take(self.visible_count())
            .map(|&i| &self.jobs[i])
            .collect()
    }

    /// Every result, ignoring pagination.
    pub fn all_items(&self) -> impl Iterator<Item = &Job> {
        self.view.iter().map(|&i| &self.jobs[i])
    }

    /// The number of results after filtering, before pagination.
    pub fn total_count(&self) -> usize {
        self.view.len()
    }

    pub fn visible_count(&self) -> usize {
        self.current_page
            .saturating_mul(self.page_size)
            .min(self.total_count())
    }

    pub fn has_more(&self) -> bool {
        self.current_page.saturating_mul(self.page_size) < self.total_count()
    }

    pub fn view(&self) -> View<'_> {
        match &self.state {
            LoadState::Loading => View::Loading,
            LoadState::Failed(message) => View::Failed { message },
            LoadState::Loaded if self.view.is_empty() => View::NoResults,
            LoadState::Loaded => View::Page {
                items: self.visible_items(),
                total: self.total_count(),
                has_more: self.has_more(),
            },
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    /// The full, unfiltered collection.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    fn dedup(&mut self) {
        let mut ids = HashSet::with_capacity(self.jobs.len());
        self.jobs.retain(|job| {
            let is_new = ids.insert(job.id);
            if !is_new {
                log::warn!("Dropping job with duplicate ID: {} ({})", job.id, job);
            }
            is_new
        });
    }

    fn recompute(&mut self) {
        let mut matching = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, job)| self.filter.matches(job))
            .collect::<Vec<_>>();
        // `sort_by` is stable, so equal jobs keep collection order.
        matching.sort_by(|(_, a), (_, b)| self.sort.compare(a, b));
        self.view = matching.into_iter().map(|(i, _)| i).collect();
        log::debug!(
            "Showing {} of {} jobs (filter: {:?}, sort: {})",
            self.view.len(),
            self.jobs.len(),
            self.filter,
            self.sort,
        );
    }
}
