use std::{fmt::Display, time::Duration};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use html_escape::decode_html_entities;
use reqwest::{blocking::Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use tiny_bail::prelude::*;
use url::Url;

use crate::{
    application::{Application, EmployerRequest},
    error::{Error, Result},
    job::{normalized, Compensation, ExperienceLevel, Job, JobId, JobStatus, JobType, RateUnit},
};

const FEATURED_JOBS: &str = include_str!("../data/featured_jobs.ron");

/// Where a listing gets its jobs from.
#[derive(Debug)]
pub enum JobSource {
    /// The static list shown on marketing pages.
    Featured,
    /// The REST backend.
    Api(ApiClient),
}

impl Display for JobSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobSource::Featured => write!(f, "featured jobs"),
            JobSource::Api(client) => write!(f, "{}", client.base_url),
        }
    }
}

impl JobSource {
    pub fn load(&self) -> Result<Vec<Job>> {
        match self {
            JobSource::Featured => featured_jobs(),
            JobSource::Api(client) => client.fetch_jobs(),
        }
    }
}

/// The static list of featured jobs compiled into the crate.
pub fn featured_jobs() -> Result<Vec<Job>> {
    let cards: Vec<ListingCard> = ron::from_str(FEATURED_JOBS)?;
    Ok(adapt(cards, ListingCard::into_job))
}

/// Converts records to jobs, skipping (and logging) any that can't be converted.
fn adapt<T>(records: Vec<T>, into_job: fn(T) -> Result<Job>) -> Vec<Job> {
    let mut jobs = Vec::with_capacity(records.len());
    for record in records {
        jobs.push(c!(into_job(record)));
    }
    jobs
}

/// A blocking client for the job board's REST backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let mut base_url = base_url;
        // Without a trailing slash `join` would replace the last path segment.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /jobs`
    pub fn fetch_jobs(&self) -> Result<Vec<Job>> {
        self.get::<JobsResponse>("jobs")?.into_jobs()
    }

    /// `GET /jobs/{id}`
    pub fn fetch_job(&self, id: JobId) -> Result<Job> {
        self.get::<JobResponse>(&format!("jobs/{id}"))?.into_job(id)
    }

    /// `POST /jobs/{id}/apply`. Returns the backend's application ID, if it sent
    /// one.
    pub fn submit_application(&self, id: JobId, application: &Application) -> Result<Option<u64>> {
        application.validate()?;
        let application_id = self
            .post::<ApplyResponse>(&format!("jobs/{id}/apply"), application)?
            .into_application_id()?;
        log::info!("Submitted application for job {}", id);
        Ok(application_id)
    }

    /// `POST /employer-request`. Returns the backend's confirmation message.
    pub fn submit_employer_request(&self, request: &EmployerRequest) -> Result<String> {
        request.validate()?;
        let message = self
            .post::<RequestResponse>("employer-request", request)?
            .into_message()?;
        log::info!("Submitted talent request for {}", request.company_name);
        Ok(message)
    }

    /// `GET /stats`
    pub fn fetch_stats(&self) -> Result<PlatformStats> {
        self.get::<StatsResponse>("stats")?.into_stats()
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path)?;
        log::debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        parse_body(response.status(), &response.text()?)
    }

    fn post<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        let url = self.base_url.join(path)?;
        log::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send()?;
        parse_body(response.status(), &response.text()?)
    }
}

/// Parses a JSON envelope. Error statuses usually still carry one; when they
/// don't, the status itself is the error.
fn parse_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    match serde_json::from_str(body) {
        Ok(x) => Ok(x),
        Err(_) if !status.is_success() => {
            Err(Error::Api(format!("request failed with status {status}")))
        }
        Err(err) => Err(err.into()),
    }
}

fn check(success: bool, error: Option<String>, action: &str) -> Result<()> {
    if success {
        Ok(())
    } else {
        Err(Error::Api(
            error.unwrap_or_else(|| format!("failed to {action}")),
        ))
    }
}

#[derive(Deserialize, Debug)]
pub struct JobsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub jobs: Vec<ApiJob>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobsResponse {
    pub fn into_jobs(self) -> Result<Vec<Job>> {
        check(self.success, self.error, "fetch jobs")?;
        let total = self.jobs.len();
        let jobs = adapt(self.jobs, ApiJob::into_job);
        if jobs.len() < total {
            log::warn!("Skipped {} malformed jobs", total - jobs.len());
        }
        Ok(jobs)
    }
}

#[derive(Deserialize, Debug)]
pub struct JobResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub job: Option<ApiJob>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobResponse {
    pub fn into_job(self, id: JobId) -> Result<Job> {
        check(self.success, self.error, "fetch job details")?;
        self.job.ok_or(Error::JobNotFound(id))?.into_job()
    }
}

#[derive(Deserialize, Debug)]
pub struct ApplyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub application_id: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApplyResponse {
    pub fn into_application_id(self) -> Result<Option<u64>> {
        check(self.success, self.error, "submit application")?;
        Ok(self.application_id)
    }
}

#[derive(Deserialize, Debug)]
pub struct RequestResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RequestResponse {
    pub fn into_message(self) -> Result<String> {
        check(self.success, self.error, "submit request")?;
        Ok(self
            .message
            .unwrap_or_else(|| "Talent request submitted".to_string()))
    }
}

#[derive(Deserialize, Debug)]
pub struct StatsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub stats: Option<PlatformStats>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatsResponse {
    pub fn into_stats(self) -> Result<PlatformStats> {
        check(self.success, self.error, "fetch stats")?;
        Ok(self.stats.unwrap_or_default())
    }
}

/// Headline numbers for the landing page.
#[derive(Deserialize, Clone, PartialEq, Eq, Default, Debug)]
#[serde(default)]
pub struct PlatformStats {
    pub active_jobs: u64,
    pub companies: u64,
    pub total_applications: u64,
    /// Applications in the last 30 days.
    pub recent_applications: u64,
    /// The industries with the most companies, largest first.
    pub top_industries: Vec<IndustryCount>,
}

#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct IndustryCount {
    pub industry: String,
    pub count: u64,
}

/// A job as the marketing pages describe it.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListingCard {
    pub id: JobId,
    pub title: String,
    pub company: String,
    /// A location slug like `new-york`, or `remote`.
    pub location: String,
    pub location_display: String,
    #[serde(rename = "type")]
    pub job_type: String,
    /// Display text like `$180-220/hour`.
    #[serde(default)]
    pub salary: String,
    pub posted_date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

impl ListingCard {
    pub fn into_job(self) -> Result<Job> {
        let job_type = job_type(self.id, &self.job_type)?;
        let posted_date = posted_date(self.id, &self.posted_date)?;
        let is_remote = normalized(&self.location) == "remote";
        let location = Some(text(&self.location_display)).filter(|x| !is_remote && !x.is_empty());

        Ok(Job {
            description: text(&self.description),
            requirements: self.requirements.join("\n"),
            tags: self.tags.iter().map(|x| text(x)).collect(),
            keywords: self.keywords,
            location,
            is_remote,
            compensation: Compensation::parse(&self.salary),
            ..Job::new(
                self.id,
                text(&self.title),
                text(&self.company),
                job_type,
                posted_date,
            )
        })
    }
}

/// A job as the REST backend returns it.
#[derive(Deserialize, Debug)]
pub struct ApiJob {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default, deserialize_with = "amount")]
    pub salary_min: Option<f64>,
    #[serde(default, deserialize_with = "amount")]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub salary_type: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_remote: bool,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub posted_date: Option<String>,
    #[serde(default, alias = "applications_count")]
    pub application_count: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ApiJob {
    pub fn into_job(self) -> Result<Job> {
        let job_type = job_type(self.id, self.job_type.as_deref().unwrap_or_default())?;
        let posted_date = posted_date(self.id, self.posted_date.as_deref().unwrap_or_default())?;

        let experience_level = self.experience_level.as_deref().and_then(|x| {
            let level = ExperienceLevel::parse(x);
            if level.is_none() && !x.trim().is_empty() {
                log::warn!("Job {} has unknown experience level {:?}", self.id, x);
            }
            level
        });
        let status = self
            .status
            .as_deref()
            .and_then(JobStatus::parse)
            .unwrap_or_default();
        let unit = self
            .salary_type
            .as_deref()
            .map(RateUnit::parse)
            .unwrap_or_default();

        Ok(Job {
            description: self.description.as_deref().map(text).unwrap_or_default(),
            requirements: self.requirements.as_deref().map(text).unwrap_or_default(),
            tags: self.skills.unwrap_or_default().iter().map(|x| text(x)).collect(),
            experience_level,
            industry: self.industry.as_deref().map(text).filter(|x| !x.is_empty()),
            location: self.location.as_deref().map(text).filter(|x| !x.is_empty()),
            is_remote: self.is_remote,
            compensation: Compensation::new(self.salary_min, self.salary_max, unit),
            application_count: self.application_count.unwrap_or_default(),
            status,
            ..Job::new(
                self.id,
                text(&self.title),
                self.company_name.as_deref().map(text).unwrap_or_default(),
                job_type,
                posted_date,
            )
        })
    }
}

fn text(s: &str) -> String {
    decode_html_entities(s).trim().to_string()
}

fn job_type(id: JobId, s: &str) -> Result<JobType> {
    JobType::parse(s).ok_or_else(|| Error::InvalidRecord(format!("job {id} has job type {s:?}")))
}

fn posted_date(id: JobId, s: &str) -> Result<NaiveDate> {
    parse_date(s)
        .ok_or_else(|| Error::InvalidRecord(format!("job {id} has posting date {s:?}")))
}

/// Accepts `2024-08-20`, RFC 3339, and the RFC 2822 dates Flask emits.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|x| x.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|x| x.date())
        })
        .or_else(|| DateTime::parse_from_rfc2822(s).ok().map(|x| x.date_naive()))
}

/// Decimal columns arrive as numbers or strings. Zero means unset.
fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    let amount = match Option::<Amount>::deserialize(deserializer)? {
        Some(Amount::Number(x)) => Some(x),
        Some(Amount::Text(x)) => x.trim().replace(',', "").parse().ok(),
        None => None,
    };
    Ok(amount.filter(|x: &f64| *x > 0.0))
}

/// Boolean columns arrive as booleans or 0/1.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(x)) => x,
        Some(Flag::Int(x)) => x != 0,
        None => false,
    })
}
