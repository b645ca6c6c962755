use crate::job::{normalized, ExperienceLevel, Job, JobStatus, JobType};

/// Where a job must be to pass the filter.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub enum LocationFilter {
    #[default]
    Any,
    /// Remote-eligible jobs, whatever their location string says.
    Remote,
    /// Jobs whose location contains this text. Case and separators are ignored,
    /// so `new-york` matches `New York, NY`.
    Contains(String),
}

impl LocationFilter {
    /// Parses a location select value. `remote` is the remote-only sentinel.
    pub fn parse(s: &str) -> Self {
        match normalized(s).as_str() {
            "" | "any" | "all" => LocationFilter::Any,
            "remote" => LocationFilter::Remote,
            _ => LocationFilter::Contains(s.trim().to_string()),
        }
    }

    fn cleaned(self) -> Self {
        match self {
            LocationFilter::Contains(text) if normalized(&text).is_empty() => LocationFilter::Any,
            x => x,
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        match self {
            LocationFilter::Any => true,
            LocationFilter::Remote => job.is_remote,
            LocationFilter::Contains(text) => {
                normalized(job.location.as_deref().unwrap_or_default()).contains(&normalized(text))
            }
        }
    }
}

/// A criterion a surface can expose to its users.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Criterion {
    Keyword,
    Location,
    JobType,
    ExperienceLevel,
    RemoteOnly,
    Status,
}

/// The set of criteria a surface honors. Patches touching anything else are
/// dropped when merged.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FilterFields(&'static [Criterion]);

impl FilterFields {
    /// The public job listing.
    pub const PUBLIC: Self = Self(&[
        Criterion::Keyword,
        Criterion::Location,
        Criterion::JobType,
        Criterion::ExperienceLevel,
        Criterion::RemoteOnly,
    ]);
    /// The admin job table.
    pub const ADMIN: Self = Self(&[Criterion::Keyword, Criterion::JobType, Criterion::Status]);
    pub const ALL: Self = Self(&[
        Criterion::Keyword,
        Criterion::Location,
        Criterion::JobType,
        Criterion::ExperienceLevel,
        Criterion::RemoteOnly,
        Criterion::Status,
    ]);

    pub fn contains(&self, criterion: Criterion) -> bool {
        self.0.contains(&criterion)
    }
}

/// The current filter state. Every active criterion must match.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Filter {
    /// Lowercase search text. Empty matches everything.
    pub keyword: String,
    pub location: LocationFilter,
    /// `None` matches any job type.
    pub job_type: Option<JobType>,
    /// `None` matches any experience level, including jobs without one.
    pub experience_level: Option<ExperienceLevel>,
    pub remote_only: bool,
    /// `None` matches any status.
    pub status: Option<JobStatus>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, job: &Job) -> bool {
        (self.keyword.is_empty() || job.searchable_text().contains(&self.keyword))
            && self.location.matches(job)
            && self.job_type.map_or(true, |x| job.job_type == x)
            && self.experience_level.map_or(true, |x| job.experience_level == Some(x))
            && (!self.remote_only || job.is_remote)
            && self.status.map_or(true, |x| job.status == x)
    }

    /// Merges a patch into this filter, keeping only the criteria in `fields`.
    pub fn merge(&mut self, patch: FilterPatch, fields: FilterFields) {
        let allow = |criterion| {
            let allowed = fields.contains(criterion);
            if !allowed {
                log::debug!("Ignoring {:?} filter on this surface", criterion);
            }
            allowed
        };

        if let Some(keyword) = patch.keyword {
            if allow(Criterion::Keyword) {
                self.keyword = keyword.to_lowercase();
            }
        }
        if let Some(location) = patch.location {
            if allow(Criterion::Location) {
                self.location = location.cleaned();
            }
        }
        if let Some(job_type) = patch.job_type {
            if allow(Criterion::JobType) {
                self.job_type = job_type;
            }
        }
        if let Some(experience_level) = patch.experience_level {
            if allow(Criterion::ExperienceLevel) {
                self.experience_level = experience_level;
            }
        }
        if let Some(remote_only) = patch.remote_only {
            if allow(Criterion::RemoteOnly) {
                self.remote_only = remote_only;
            }
        }
        if let Some(status) = patch.status {
            if allow(Criterion::Status) {
                self.status = status;
            }
        }
    }
}

/// A partial update to a [`Filter`]. `None` fields leave the current value alone.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct FilterPatch {
    pub keyword: Option<String>,
    pub location: Option<LocationFilter>,
    pub job_type: Option<Option<JobType>>,
    pub experience_level: Option<Option<ExperienceLevel>>,
    pub remote_only: Option<bool>,
    pub status: Option<Option<JobStatus>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A patch that resets every criterion.
    pub fn clear() -> Self {
        Self {
            keyword: Some(String::new()),
            location: Some(LocationFilter::Any),
            job_type: Some(None),
            experience_level: Some(None),
            remote_only: Some(false),
            status: Some(None),
        }
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn location(mut self, location: LocationFilter) -> Self {
        self.location = Some(location);
        self
    }

    pub fn job_type(mut self, job_type: Option<JobType>) -> Self {
        self.job_type = Some(job_type);
        self
    }

    pub fn experience_level(mut self, experience_level: Option<ExperienceLevel>) -> Self {
        self.experience_level = Some(experience_level);
        self
    }

    pub fn remote_only(mut self, remote_only: bool) -> Self {
        self.remote_only = Some(remote_only);
        self
    }

    pub fn status(mut self, status: Option<JobStatus>) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets a criterion from a form control's name and value. Empty, `any` and
    /// `all` clear the criterion; unrecognized values match everything.
    pub fn field(mut self, name: &str, value: &str) -> Self {
        match normalized(name).as_str() {
            "search" | "keyword" | "q" => self.keyword = Some(value.to_string()),
            "location" => self.location = Some(LocationFilter::parse(value)),
            "job type" | "type" => self.job_type = Some(choice(name, value, JobType::parse)),
            "experience level" | "experience" | "level" => {
                self.experience_level = Some(choice(name, value, ExperienceLevel::parse))
            }
            "is remote" | "remote only" | "remote" => self.remote_only = Some(flag(value)),
            "status" => self.status = Some(choice(name, value, JobStatus::parse)),
            _ => log::debug!("Ignoring unknown filter field: {}", name),
        }
        self
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::new(), |patch, (name, value)| patch.field(name, value))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn choice<T>(name: &str, value: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
    if matches!(normalized(value).as_str(), "" | "any" | "all") {
        return None;
    }
    let choice = parse(value);
    if choice.is_none() {
        log::debug!("Unrecognized {} filter value {:?}, matching all", name, value);
    }
    choice
}

fn flag(value: &str) -> bool {
    matches!(normalized(value).as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn job(id: u64, title: &str) -> Job {
        Job::new(
            id,
            title,
            "Acme",
            JobType::Permanent,
            NaiveDate::from_ymd_opt(2024, 8, 20).unwrap(),
        )
    }

    fn filter(patch: FilterPatch) -> Filter {
        let mut filter = Filter::default();
        filter.merge(patch, FilterFields::ALL);
        filter
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::default().is_empty());
        assert!(Filter::default().matches(&job(1, "Anything")));
    }

    #[test]
    fn keyword_is_case_insensitive() {
        let filter = filter(FilterPatch::new().keyword("Chief FINANCIAL"));
        assert_eq!(filter.keyword, "chief financial");
        assert!(filter.matches(&job(1, "Fractional Chief Financial Officer")));
        assert!(!filter.matches(&job(2, "Fractional Head of Sales")));
    }

    #[test]
    fn keyword_whitespace_is_part_of_the_search() {
        let filter = filter(FilterPatch::new().keyword("head "));
        assert_eq!(filter.keyword, "head ");
        assert!(filter.matches(&job(1, "Fractional Head of Sales")));
        assert!(!filter.matches(&job(2, "Headsales Director")));
    }

    #[test]
    fn remote_location_ignores_location_string() {
        let filter = filter(FilterPatch::new().location(LocationFilter::Remote));
        assert!(filter.matches(&job(1, "A").with_location("Chicago, IL").with_remote(true)));
        assert!(filter.matches(&job(2, "B").with_remote(true)));
        assert!(!filter.matches(&job(3, "C").with_location("Remote")));
    }

    #[test]
    fn location_containment_ignores_separators() {
        let filter = filter(FilterPatch::new().location(LocationFilter::parse("new-york")));
        assert!(filter.matches(&job(1, "A").with_location("New York, NY")));
        assert!(!filter.matches(&job(2, "B").with_location("Boston, MA")));
        assert!(!filter.matches(&job(3, "C")));
        assert!(!filter.matches(&job(4, "D").with_remote(true)));
    }

    #[test]
    fn criteria_are_anded() {
        let filter = filter(
            FilterPatch::new()
                .job_type(Some(JobType::Temporary))
                .experience_level(Some(ExperienceLevel::Senior))
                .remote_only(true),
        );
        let mut matching = job(1, "A")
            .with_remote(true)
            .with_experience_level(ExperienceLevel::Senior);
        matching.job_type = JobType::Temporary;
        assert!(filter.matches(&matching));

        let mut wrong_type = matching.clone();
        wrong_type.job_type = JobType::Contract;
        assert!(!filter.matches(&wrong_type));

        let not_remote = matching.clone().with_remote(false);
        assert!(!filter.matches(&not_remote));

        let mut no_level = matching.clone();
        no_level.experience_level = None;
        assert!(!filter.matches(&no_level));
    }

    #[test]
    fn form_fields() {
        let patch = FilterPatch::from_pairs([
            ("search", "cfo"),
            ("location", "remote"),
            ("job_type", "Contract"),
            ("experience_level", "any"),
            ("is_remote", "true"),
            ("status", "all"),
            ("colour", "blue"),
        ]);
        assert_eq!(patch.keyword.as_deref(), Some("cfo"));
        assert_eq!(patch.location, Some(LocationFilter::Remote));
        assert_eq!(patch.job_type, Some(Some(JobType::Contract)));
        assert_eq!(patch.experience_level, Some(None));
        assert_eq!(patch.remote_only, Some(true));
        assert_eq!(patch.status, Some(None));
    }

    #[test]
    fn unrecognized_values_match_all() {
        let filter = filter(
            FilterPatch::new()
                .field("type", "gig")
                .field("experience_level", "wizard")
                .field("location", "   "),
        );
        assert!(filter.is_empty());
    }

    #[test]
    fn merge_respects_surface_fields() {
        let mut filter = Filter::default();
        filter.merge(
            FilterPatch::new()
                .keyword("ops")
                .remote_only(true)
                .status(Some(JobStatus::Paused)),
            FilterFields::ADMIN,
        );
        assert_eq!(filter.keyword, "ops");
        assert!(!filter.remote_only);
        assert_eq!(filter.status, Some(JobStatus::Paused));

        filter.merge(FilterPatch::clear(), FilterFields::ADMIN);
        assert!(filter.is_empty());
    }

    #[test]
    fn merge_keeps_untouched_criteria() {
        let mut filter = filter(FilterPatch::new().keyword("cto"));
        filter.merge(FilterPatch::new().remote_only(true), FilterFields::ALL);
        assert_eq!(filter.keyword, "cto");
        assert!(filter.remote_only);
    }
}
