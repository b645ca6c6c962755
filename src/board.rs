use chrono::{Local, NaiveDate};
use colored::{Color, Colorize as _};

use crate::{
    admin::AdminJobs,
    config::Config,
    engine::{ListingEngine, View},
    error::{Error, Result},
    filter::{FilterFields, FilterPatch},
    job::{Job, JobId, JobStatus},
    sort::SortMode,
    source::{ApiClient, JobSource, PlatformStats},
};

/// A job listing wired to its source.
#[derive(Debug)]
pub struct Board {
    pub source: JobSource,
    pub engine: ListingEngine,
}

impl Board {
    pub fn new(source: JobSource, page_size: usize) -> Self {
        Self {
            source,
            engine: ListingEngine::new(FilterFields::PUBLIC, page_size),
        }
    }

    /// Lists from the configured backend, or the featured jobs if there is none.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = match &config.api_base_url {
            Some(url) => JobSource::Api(ApiClient::new(url.clone(), config.timeout())?),
            None => JobSource::Featured,
        };
        Ok(Self::new(source, config.page_size))
    }

    /// Fetches the collection. On failure the listing is left empty in the
    /// failed state, and calling this again retries.
    pub fn load(&mut self) -> bool {
        self.engine.mark_loading();
        match self.source.load() {
            Ok(jobs) => {
                log::info!("Loaded {} jobs from {}", jobs.len(), self.source);
                self.engine.set_jobs(jobs);
                true
            }
            Err(err) => {
                log::error!("Failed to load jobs from {}: {}", self.source, err);
                self.engine.mark_failed(err.to_string());
                false
            }
        }
    }

    /// Applies `name=value` arguments. `sort` picks the order and `pages` reveals
    /// that many pages; everything else is a filter field.
    pub fn apply_args<'a>(&mut self, args: impl IntoIterator<Item = &'a str>) {
        let mut patch = FilterPatch::new();
        let mut sort = None;
        let mut pages = 1;
        for arg in args {
            let (name, value) = arg.split_once('=').unwrap_or(("search", arg));
            match name {
                "sort" => sort = Some(SortMode::parse(value)),
                "pages" => pages = value.parse().unwrap_or(1),
                _ => patch = patch.field(name, value),
            }
        }

        self.engine.set_filter(patch);
        if let Some(sort) = sort {
            self.engine.set_sort(sort);
        }
        self.engine.load_pages(pages);
    }

    /// The backend client. Applications, talent requests and stats need one.
    pub fn client(&self) -> Result<&ApiClient> {
        match &self.source {
            JobSource::Api(client) => Ok(client),
            JobSource::Featured => Err(Error::NoBackend),
        }
    }

    pub fn list_jobs(&self) {
        print!("{}", render(&self.engine, Local::now().date_naive()));
    }

    pub fn show_job(&self, id: JobId) {
        match self.engine.job(id) {
            Some(job) => print!("{}", render_details(job, Local::now().date_naive())),
            None => log::warn!("No job with ID {}", id),
        }
    }
}

/// Renders the current view as terminal text.
pub fn render(engine: &ListingEngine, today: NaiveDate) -> String {
    match engine.view() {
        View::Loading => format!("{}\n", "Loading jobs...".italic()),
        View::Failed { message } => format!(
            "{}\n{}\n",
            format!("Couldn't load jobs: {message}").red(),
            "Run again to retry.".italic(),
        ),
        View::NoResults => format!(
            "{}\n{}\n",
            "No jobs found".bold(),
            "Try adjusting your search criteria or filters.".italic(),
        ),
        View::Page {
            items,
            total,
            has_more,
        } => {
            let mut out = format!("{} jobs\n", total.to_string().bold());
            for job in &items {
                out += &render_line(job, today);
                out.push('\n');
            }
            if has_more {
                out += &format!(
                    "{}\n",
                    format!("... {} more (load more)", total - items.len()).italic(),
                );
            }
            out
        }
    }
}

fn render_line(job: &Job, today: NaiveDate) -> String {
    let age = (today - job.posted_date).num_days();
    // Ugly code makes pretty colors.
    format!(
        "{} {} {} {} {}",
        format!("{:>12}", job.posted_text(today)).color(if age <= 0 {
            Color::Cyan
        } else if age < 7 {
            Color::TrueColor {
                r: 200,
                g: 150,
                b: 60,
            }
        } else {
            Color::Red
        }),
        format!("{:16}", truncated(&job.company, 16)),
        format!("{:48}", truncated(&job.title, 48)).bold(),
        format!("{:16}", job.salary_text()).green(),
        job.location_text().italic(),
    )
}

/// Renders one job's full details.
pub fn render_details(job: &Job, today: NaiveDate) -> String {
    let mut out = format!(
        "{}\n{} | {} | {} | {}\n",
        job.title.bold(),
        job.company,
        job.location_text(),
        job.salary_text().green(),
        job.posted_text(today),
    );
    out += &format!("[{}]\n", job.display_tags().join("] ["));
    if !job.description.is_empty() {
        out += &format!("\n{}\n", job.description);
    }

    out += &format!("\n{}\n", "Requirements".bold());
    let requirements = job.requirement_lines();
    if requirements.is_empty() {
        out += "  - Requirements will be discussed during the application process\n";
    }
    for line in requirements {
        out += &format!("  - {line}\n");
    }
    if !job.tags.is_empty() {
        out += &format!("\n{}\n", job.tags.join(", ").italic());
    }
    out
}

/// Renders the admin table, one row per visible job.
pub fn render_admin(admin: &AdminJobs) -> String {
    let engine = admin.engine();
    let mut out = format!(
        "{} jobs ({} active)\n",
        engine.total_count().to_string().bold(),
        admin.active_count(),
    );
    for job in engine.visible_items() {
        let status = format!("{:8}", job.status.as_str());
        out += &format!(
            "{:>4} {} {} {} {:>4} {}\n",
            job.id,
            format!("{:40}", truncated(&job.title, 40)).bold(),
            format!("{:24}", truncated(&job.company, 24)),
            job.posted_date,
            job.application_count,
            if job.status == JobStatus::Active {
                status.green()
            } else {
                status.yellow()
            },
        );
    }
    if engine.has_more() {
        out += &format!(
            "{}\n",
            format!("... {} more", engine.total_count() - engine.visible_count()).italic(),
        );
    }
    out
}

pub fn render_stats(stats: &PlatformStats) -> String {
    let mut out = format!(
        "{} active jobs | {} companies | {} applications ({} in the last 30 days)\n",
        stats.active_jobs.to_string().bold(),
        stats.companies.to_string().bold(),
        stats.total_applications.to_string().bold(),
        stats.recent_applications,
    );
    for x in &stats.top_industries {
        out += &format!("{:>6} {}\n", x.count, x.industry.italic());
    }
    out
}

fn truncated(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::featured_jobs;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 29).unwrap()
    }

    fn board() -> Board {
        colored::control::set_override(false);
        let mut board = Board::new(JobSource::Featured, 8);
        assert!(board.load());
        board
    }

    #[test]
    fn featured_listing() {
        let board = board();
        let out = render(&board.engine, today());
        assert!(out.starts_with("15 jobs\n"));
        assert!(out.contains("Fractional Chief Technology Officer"));
        assert!(out.contains("1 day ago"));
        assert!(out.contains("... 7 more (load more)"));
        assert_eq!(out.lines().count(), 1 + 8 + 1);
    }

    #[test]
    fn args() {
        let mut board = board();
        board.apply_args(["location=remote", "sort=salary-high", "pages=3"]);
        assert_eq!(board.engine.total_count(), 4);
        assert_eq!(board.engine.current_page(), 1);
        assert_eq!(board.engine.sort_mode(), SortMode::SalaryHigh);
        let first = board.engine.visible_items()[0];
        assert_eq!(first.title, "Fractional Chief Technology Officer");

        board.apply_args(["location=", "pages=2"]);
        assert_eq!(board.engine.total_count(), 15);
        assert_eq!(board.engine.visible_items().len(), 15);
        assert_eq!(board.engine.sort_mode(), SortMode::SalaryHigh);
    }

    #[test]
    fn bare_args_search() {
        let mut board = board();
        board.apply_args(["cfo"]);
        assert_eq!(board.engine.total_count(), 1);
    }

    #[test]
    fn no_results() {
        let mut board = board();
        board.apply_args(["search=underwater basket weaving"]);
        let out = render(&board.engine, today());
        assert!(out.starts_with("No jobs found"));
    }

    #[test]
    fn failed_load() {
        colored::control::set_override(false);
        let mut engine = ListingEngine::default();
        engine.mark_failed("connection refused");
        let out = render(&engine, today());
        assert!(out.contains("Couldn't load jobs: connection refused"));
        assert!(out.contains("retry"));
    }

    #[test]
    fn details() {
        let board = board();
        let out = render_details(board.engine.job(1).unwrap(), today());
        assert!(out.contains("[permanent] [Remote]"));
        assert!(out.contains("  - 10+ years of technology leadership experience\n"));

        let out = render_details(board.engine.job(2).unwrap(), today());
        assert!(out.contains("Requirements will be discussed"));
    }

    #[test]
    fn featured_has_no_client() {
        let board = board();
        assert!(matches!(board.client(), Err(Error::NoBackend)));
    }

    #[test]
    fn stats() {
        colored::control::set_override(false);
        let stats: PlatformStats = serde_json::from_str(
            r#"{
                "active_jobs": 15,
                "companies": 9,
                "total_applications": 120,
                "recent_applications": 14,
                "top_industries": [{"industry": "Technology", "count": 4}]
            }"#,
        )
        .unwrap();
        assert_eq!(
            render_stats(&stats),
            "15 active jobs | 9 companies | 120 applications (14 in the last 30 days)\n     4 Technology\n",
        );
    }

    #[test]
    fn admin_table() {
        colored::control::set_override(false);
        let admin = AdminJobs::new(featured_jobs().unwrap(), 8);
        let out = render_admin(&admin);
        assert!(out.starts_with("15 jobs (15 active)\n"));
        assert!(out.contains("... 7 more"));
    }
}
