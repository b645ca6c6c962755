mod admin;
mod application;
mod board;
mod config;
mod engine;
mod error;
mod filter;
mod job;
mod sort;
mod source;

pub use admin::AdminJobs;
pub use application::{Application, EmployerRequest};
pub use board::{render, render_admin, render_details, render_stats, Board};
pub use config::Config;
pub use engine::{ListingEngine, View, DEFAULT_PAGE_SIZE};
pub use error::{Error, Result};
pub use filter::{Criterion, Filter, FilterFields, FilterPatch, LocationFilter};
pub use job::{Compensation, ExperienceLevel, Job, JobId, JobStatus, JobType, RateUnit};
pub use sort::SortMode;
pub use source::{featured_jobs, ApiClient, ApiJob, JobSource, ListingCard, PlatformStats};

pub fn init_logger(default_level: log::LevelFilter) {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}
