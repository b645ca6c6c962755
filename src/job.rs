use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! re {
    ($name:ident, $($e:expr),* $(,)?) => {
        static $name: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(
            || regex::Regex::new(concat!($($e),*)).unwrap(),
        );
    };
}

pub type JobId = u64;

/// A job posting in the canonical shape the listing engine works with.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
pub struct Job {
    /// A stable identifier, unique within a collection.
    pub id: JobId,
    /// The job title.
    pub title: String,
    /// The name of the company offering the job.
    pub company: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Free-text requirements, one per line.
    #[serde(default)]
    pub requirements: String,
    /// Skills shown as tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Extra search terms that are never displayed.
    #[serde(default)]
    pub keywords: String,
    /// The kind of engagement (permanent, temporary, contract).
    pub job_type: JobType,
    /// The expected seniority, if the employer gave one.
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    /// The company's industry.
    #[serde(default)]
    pub industry: Option<String>,
    /// Where the job is based. A job may be both located and remote.
    #[serde(default)]
    pub location: Option<String>,
    /// True if the job can be done remotely.
    #[serde(default)]
    pub is_remote: bool,
    /// Pay range and unit.
    #[serde(default)]
    pub compensation: Compensation,
    /// The calendar date the job was posted.
    pub posted_date: NaiveDate,
    /// Number of applications received. Informational only.
    #[serde(default)]
    pub application_count: u32,
    /// Publication status, managed from the admin table.
    #[serde(default)]
    pub status: JobStatus,
}

impl Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.title)
    }
}

impl Job {
    pub fn new(
        id: JobId,
        title: impl Into<String>,
        company: impl Into<String>,
        job_type: JobType,
        posted_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            company: company.into(),
            description: String::new(),
            requirements: String::new(),
            tags: Vec::new(),
            keywords: String::new(),
            job_type,
            experience_level: None,
            industry: None,
            location: None,
            is_remote: false,
            compensation: Compensation::default(),
            posted_date,
            application_count: 0,
            status: JobStatus::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = requirements.into();
        self
    }

    pub fn with_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_remote(mut self, is_remote: bool) -> Self {
        self.is_remote = is_remote;
        self
    }

    pub fn with_experience_level(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = Some(level);
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_compensation(mut self, compensation: Compensation) -> Self {
        self.compensation = compensation;
        self
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// The lowercase text that keyword searches run against.
    pub fn searchable_text(&self) -> String {
        let mut parts = vec![
            self.title.as_str(),
            self.company.as_str(),
            self.description.as_str(),
            self.requirements.as_str(),
            self.location.as_deref().unwrap_or_default(),
        ];
        parts.extend(self.tags.iter().map(String::as_str));
        parts.push(&self.keywords);

        parts.join(" ").to_lowercase()
    }

    pub fn salary_text(&self) -> String {
        self.compensation.to_string()
    }

    pub fn location_text(&self) -> String {
        match (&self.location, self.is_remote) {
            (Some(location), true) if !location.is_empty() => format!("{location} / Remote"),
            (_, true) => "Remote".to_string(),
            (Some(location), false) if !location.is_empty() => location.clone(),
            _ => "Location TBD".to_string(),
        }
    }

    /// A "days ago" label relative to `today`.
    pub fn posted_text(&self, today: NaiveDate) -> String {
        match (today - self.posted_date).num_days() {
            days if days <= 0 => "Today".to_string(),
            1 => "1 day ago".to_string(),
            days => format!("{days} days ago"),
        }
    }

    /// Non-blank requirement lines with any leading bullet marker removed.
    pub fn requirement_lines(&self) -> Vec<String> {
        re!(BULLET_RE, r"^[•\-\*]\s*");

        self.requirements
            .lines()
            .map(|line| BULLET_RE.replace(line.trim(), "").trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Labels summarizing the job's classification.
    pub fn display_tags(&self) -> Vec<String> {
        let mut tags = vec![self.job_type.to_string()];
        if let Some(level) = self.experience_level {
            tags.push(level.to_string());
        }
        if let Some(industry) = &self.industry {
            tags.push(industry.clone());
        }
        if self.is_remote {
            tags.push("Remote".to_string());
        }
        tags
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Permanent,
    Temporary,
    Contract,
}

impl JobType {
    pub fn parse(s: &str) -> Option<Self> {
        match normalized(s).as_str() {
            "permanent" => Some(JobType::Permanent),
            "temporary" => Some(JobType::Temporary),
            "contract" => Some(JobType::Contract),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Permanent => "permanent",
            JobType::Temporary => "temporary",
            JobType::Contract => "contract",
        }
    }
}

impl Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match normalized(s).as_str() {
            "entry" | "entry level" | "junior" => Some(ExperienceLevel::Entry),
            "mid" | "mid level" => Some(ExperienceLevel::Mid),
            "senior" => Some(ExperienceLevel::Senior),
            "executive" | "c level" => Some(ExperienceLevel::Executive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Executive => "executive",
        }
    }
}

impl Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Paused,
    Closed,
}

impl JobStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match normalized(s).as_str() {
            "active" => Some(JobStatus::Active),
            "paused" => Some(JobStatus::Paused),
            "closed" => Some(JobStatus::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Paused => "paused",
            JobStatus::Closed => "closed",
        }
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit a compensation range is quoted in.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "lowercase")]
pub enum RateUnit {
    #[default]
    Hourly,
    Daily,
    Monthly,
    Salary,
}

impl RateUnit {
    /// Parses a unit tag, falling back to hourly for anything unrecognized.
    pub fn parse(s: &str) -> Self {
        match normalized(s).as_str() {
            "day" | "daily" => RateUnit::Daily,
            "month" | "monthly" => RateUnit::Monthly,
            "salary" | "year" | "yearly" | "annual" | "annually" => RateUnit::Salary,
            _ => RateUnit::Hourly,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            RateUnit::Hourly => "hour",
            RateUnit::Daily => "day",
            RateUnit::Monthly => "month",
            RateUnit::Salary => "year",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct Compensation {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub unit: RateUnit,
}

impl Display for Compensation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(
                f,
                "${}-{}/{}",
                amount(min),
                amount(max),
                self.unit.suffix(),
            ),
            _ => f.write_str("Competitive"),
        }
    }
}

impl Compensation {
    pub fn new(min: Option<f64>, max: Option<f64>, unit: RateUnit) -> Self {
        Self { min, max, unit }
    }

    pub fn range(min: f64, max: f64, unit: RateUnit) -> Self {
        Self::new(Some(min), Some(max), unit)
    }

    /// Parses display text like `$180-220/hour`. Anything that doesn't look like
    /// a range comes back competitive.
    pub fn parse(text: &str) -> Self {
        re!(
            RANGE_RE,
            r"^\$?\s*([\d,]+(?:\.\d+)?)\s*(?:(?:-|–|to)\s*\$?\s*([\d,]+(?:\.\d+)?))?",
            r"\s*(?:/\s*([a-z]+))?$",
        );

        let text = text.trim().to_lowercase();
        let Some(captures) = RANGE_RE.captures(&text) else {
            return Self::default();
        };
        let number = |i: usize| {
            captures
                .get(i)
                .and_then(|x| x.as_str().replace(',', "").parse::<f64>().ok())
        };
        let min = number(1);
        let max = number(2).or(min);
        let unit = captures
            .get(3)
            .map(|x| RateUnit::parse(x.as_str()))
            .unwrap_or_default();

        Self::new(min, max, unit)
    }
}

fn amount(x: f64) -> String {
    if x.fract() == 0.0 {
        format!("{}", x as i64)
    } else {
        format!("{x:.2}")
    }
}

/// Lowercases and collapses separators so `Entry-Level` reads as `entry level`.
pub(crate) fn normalized(s: impl AsRef<str>) -> String {
    s.as_ref()
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric(), " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
