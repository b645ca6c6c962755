use std::{cmp::Ordering, fmt::Display};

use crate::job::{normalized, Job};

/// A named order for the filtered listing.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum SortMode {
    /// Most recently posted first.
    #[default]
    Newest,
    Oldest,
    /// Highest maximum pay first. Jobs without one count as zero.
    SalaryHigh,
    /// Lowest minimum pay first. Jobs without one count as zero.
    SalaryLow,
    Company,
    Location,
}

impl SortMode {
    pub const ALL: [SortMode; 6] = [
        SortMode::Newest,
        SortMode::Oldest,
        SortMode::SalaryHigh,
        SortMode::SalaryLow,
        SortMode::Company,
        SortMode::Location,
    ];

    /// Parses a sort select value, falling back to [`SortMode::Newest`].
    pub fn parse(s: &str) -> Self {
        match normalized(s).as_str() {
            "newest" | "date desc" => SortMode::Newest,
            "oldest" | "date asc" => SortMode::Oldest,
            "salary high" => SortMode::SalaryHigh,
            "salary low" => SortMode::SalaryLow,
            "company" => SortMode::Company,
            "location" => SortMode::Location,
            _ => {
                log::debug!("Unrecognized sort mode {:?}, using newest", s);
                SortMode::Newest
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::SalaryHigh => "salary-high",
            SortMode::SalaryLow => "salary-low",
            SortMode::Company => "company",
            SortMode::Location => "location",
        }
    }

    pub fn compare(&self, a: &Job, b: &Job) -> Ordering {
        match self {
            SortMode::Newest => b.posted_date.cmp(&a.posted_date),
            SortMode::Oldest => a.posted_date.cmp(&b.posted_date),
            SortMode::SalaryHigh => pay(b.compensation.max).total_cmp(&pay(a.compensation.max)),
            SortMode::SalaryLow => pay(a.compensation.min).total_cmp(&pay(b.compensation.min)),
            SortMode::Company => collate(&a.company, &b.company),
            SortMode::Location => collate(&a.location_text(), &b.location_text()),
        }
    }

    /// Sorts in place. Jobs that compare equal keep their relative order.
    pub fn sort(&self, jobs: &mut [&Job]) {
        // `sort_by` is stable.
        jobs.sort_by(|a, b| self.compare(a, b));
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn pay(x: Option<f64>) -> f64 {
    x.unwrap_or_default()
}

/// Case-insensitive string order.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::job::{Compensation, JobType, RateUnit};

    fn job(id: u64, company: &str, posted: &str) -> Job {
        Job::new(
            id,
            format!("Job {id}"),
            company,
            JobType::Permanent,
            NaiveDate::parse_from_str(posted, "%Y-%m-%d").unwrap(),
        )
    }

    fn ids(mode: SortMode, jobs: &[Job]) -> Vec<u64> {
        let mut refs = jobs.iter().collect::<Vec<_>>();
        mode.sort(&mut refs);
        refs.into_iter().map(|x| x.id).collect()
    }

    #[test]
    fn parse_falls_back_to_newest() {
        for mode in SortMode::ALL {
            assert_eq!(SortMode::parse(mode.as_str()), mode);
        }
        assert_eq!(SortMode::parse("date-desc"), SortMode::Newest);
        assert_eq!(SortMode::parse("date-asc"), SortMode::Oldest);
        assert_eq!(SortMode::parse("relevance"), SortMode::Newest);
        assert_eq!(SortMode::parse(""), SortMode::Newest);
    }

    #[test]
    fn dates() {
        let jobs = [
            job(1, "A", "2024-08-18"),
            job(2, "B", "2024-08-28"),
            job(3, "C", "2024-08-20"),
        ];
        assert_eq!(ids(SortMode::Newest, &jobs), [2, 3, 1]);
        assert_eq!(ids(SortMode::Oldest, &jobs), [1, 3, 2]);
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let jobs = [
            job(7, "A", "2024-08-20"),
            job(3, "B", "2024-08-21"),
            job(5, "C", "2024-08-20"),
        ];
        assert_eq!(ids(SortMode::Newest, &jobs), [3, 7, 5]);
        assert_eq!(ids(SortMode::Oldest, &jobs), [7, 5, 3]);
    }

    #[test]
    fn salary_treats_missing_bounds_as_zero() {
        let jobs = [
            job(1, "A", "2024-08-20"),
            job(2, "B", "2024-08-20")
                .with_compensation(Compensation::range(150.0, 180.0, RateUnit::Hourly)),
            job(3, "C", "2024-08-20")
                .with_compensation(Compensation::range(120.0, 220.0, RateUnit::Hourly)),
            job(4, "D", "2024-08-20"),
        ];
        assert_eq!(ids(SortMode::SalaryHigh, &jobs), [3, 2, 1, 4]);
        assert_eq!(ids(SortMode::SalaryLow, &jobs), [1, 4, 3, 2]);
    }

    #[test]
    fn names_ignore_case() {
        let jobs = [
            job(1, "growthCo", "2024-08-20").with_location("Seattle, WA"),
            job(2, "DevTools Corp", "2024-08-20").with_remote(true),
            job(3, "Acme", "2024-08-20").with_location("austin, TX"),
            job(4, "acme", "2024-08-20").with_location("Boston, MA"),
        ];
        assert_eq!(ids(SortMode::Company, &jobs), [3, 4, 2, 1]);
        assert_eq!(ids(SortMode::Location, &jobs), [3, 4, 2, 1]);
    }
}
