use crate::{
    engine::ListingEngine,
    error::{Error, Result},
    filter::FilterFields,
    job::{Job, JobId, JobStatus},
};

/// The back-office job table: the listing engine with admin criteria, plus
/// local edits. Every edit re-derives the table from the edited collection.
#[derive(Debug)]
pub struct AdminJobs {
    engine: ListingEngine,
}

impl AdminJobs {
    pub fn new(jobs: Vec<Job>, page_size: usize) -> Self {
        Self {
            engine: ListingEngine::new(FilterFields::ADMIN, page_size).with_jobs(jobs),
        }
    }

    pub fn engine(&self) -> &ListingEngine {
        &self.engine
    }

    /// Filtering, sorting and paging go through the engine directly.
    pub fn engine_mut(&mut self) -> &mut ListingEngine {
        &mut self.engine
    }

    /// Pauses an active job or activates anything else. Returns the new status.
    pub fn toggle_status(&mut self, id: JobId) -> Result<JobStatus> {
        let status = self.engine.update_jobs(|jobs| -> Result<JobStatus> {
            let job = find(jobs, id)?;
            job.status = match job.status {
                JobStatus::Active => JobStatus::Paused,
                JobStatus::Paused | JobStatus::Closed => JobStatus::Active,
            };
            Ok(job.status)
        })?;
        log::info!("Job {} is now {}", id, status);
        Ok(status)
    }

    /// Replaces the job with the same ID.
    pub fn update(&mut self, job: Job) -> Result<()> {
        let id = job.id;
        self.engine.update_jobs(|jobs| -> Result<()> {
            *find(jobs, id)? = job;
            Ok(())
        })?;
        log::info!("Updated job {}", id);
        Ok(())
    }

    pub fn insert(&mut self, job: Job) -> Result<()> {
        let id = job.id;
        self.engine.update_jobs(|jobs| -> Result<()> {
            if jobs.iter().any(|x| x.id == id) {
                return Err(Error::DuplicateJob(id));
            }
            jobs.push(job);
            Ok(())
        })?;
        log::info!("Posted job {}", id);
        Ok(())
    }

    pub fn delete(&mut self, id: JobId) -> Result<Job> {
        let job = self.engine.update_jobs(|jobs| -> Result<Job> {
            let i = jobs
                .iter()
                .position(|x| x.id == id)
                .ok_or(Error::JobNotFound(id))?;
            Ok(jobs.remove(i))
        })?;
        log::info!("Deleted job {} ({})", id, job);
        Ok(job)
    }

    /// One more than the largest ID in the collection.
    pub fn next_id(&self) -> JobId {
        self.engine
            .jobs()
            .iter()
            .map(|x| x.id)
            .max()
            .map_or(1, |x| x + 1)
    }

    pub fn active_count(&self) -> usize {
        self.engine
            .jobs()
            .iter()
            .filter(|x| x.status == JobStatus::Active)
            .count()
    }
}

fn find(jobs: &mut [Job], id: JobId) -> Result<&mut Job> {
    jobs.iter_mut()
        .find(|x| x.id == id)
        .ok_or(Error::JobNotFound(id))
}
