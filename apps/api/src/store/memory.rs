//! In-memory store used by handler and pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::models::candidate::{Candidate, CandidateProfile};
use crate::models::hr::HrProfile;
use crate::models::job::{Job, JobListing, NewJob};
use crate::models::recommendation::{NewRecommendation, RecommendationRecord};
use crate::store::{AuditLog, ProfileStore, StoreError, Upserted};

#[derive(Default)]
pub struct MemoryStore {
    names: Mutex<HashMap<Uuid, String>>,
    jobs: Mutex<Vec<Job>>,
    candidates: Mutex<Vec<Candidate>>,
    hr_profiles: Mutex<Vec<HrProfile>>,
    audit: Mutex<Vec<RecommendationRecord>>,
    fail_audit: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent audit append fail.
    pub fn fail_audit_writes(&self) {
        self.fail_audit.store(true, Ordering::SeqCst);
    }

    pub fn audit_records(&self) -> Vec<RecommendationRecord> {
        self.audit.lock().unwrap().clone()
    }

    pub fn add_user_name(&self, user_id: Uuid, name: &str) {
        self.names.lock().unwrap().insert(user_id, name.to_string());
    }

    pub fn seed_hr(&self, user_id: Uuid, company: &str) -> HrProfile {
        let hr = HrProfile {
            id: Uuid::new_v4(),
            user_id,
            company: company.to_string(),
            created_at: Utc::now(),
        };
        self.hr_profiles.lock().unwrap().push(hr.clone());
        hr
    }

    pub fn seed_job(&self, hr_id: Uuid, title: &str, skills: &[&str]) -> Job {
        let job = Job {
            id: Uuid::new_v4(),
            hr_id,
            title: title.to_string(),
            description: format!("{title} working on the matching platform."),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            location: Some("Remote".to_string()),
            experience: Some(3),
            salary_range: None,
            created_at: Utc::now(),
        };
        self.jobs.lock().unwrap().push(job.clone());
        job
    }

    pub fn seed_candidate(&self, user_id: Uuid, name: &str, skills: &[&str]) -> Candidate {
        self.add_user_name(user_id, name);
        let now = Utc::now();
        let candidate = Candidate {
            id: Uuid::new_v4(),
            user_id,
            name: Some(name.to_string()),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: 5,
            preferences: json!({ "remote": true }),
            resume_url: None,
            created_at: now,
            updated_at: now,
        };
        self.candidates.lock().unwrap().push(candidate.clone());
        candidate
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<JobListing>, StoreError> {
        let hr_profiles = self.hr_profiles.lock().unwrap();
        let mut jobs: Vec<JobListing> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .map(|job| JobListing {
                job: job.clone(),
                company: hr_profiles
                    .iter()
                    .find(|h| h.id == job.hr_id)
                    .map(|h| h.company.clone()),
            })
            .collect();
        jobs.sort_by(|a, b| b.job.created_at.cmp(&a.job.created_at));
        Ok(jobs)
    }

    async fn create_job(&self, hr_id: Uuid, job: &NewJob) -> Result<Job, StoreError> {
        let created = Job {
            id: Uuid::new_v4(),
            hr_id,
            title: job.title.clone(),
            description: job.description.clone(),
            required_skills: job.required_skills.clone(),
            location: job.location.clone(),
            experience: job.experience,
            salary_range: job.salary_range.clone(),
            created_at: Utc::now(),
        };
        self.jobs.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_candidate_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Candidate>, StoreError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn list_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(self.candidates.lock().unwrap().clone())
    }

    async fn upsert_candidate(
        &self,
        user_id: Uuid,
        profile: &CandidateProfile,
    ) -> Result<Upserted<Candidate>, StoreError> {
        let name = self.names.lock().unwrap().get(&user_id).cloned();
        let mut candidates = self.candidates.lock().unwrap();
        let now = Utc::now();

        if let Some(existing) = candidates.iter_mut().find(|c| c.user_id == user_id) {
            existing.skills = profile.skills.clone();
            existing.experience = profile.experience;
            existing.preferences = profile.preferences.clone();
            if profile.resume_url.is_some() {
                existing.resume_url = profile.resume_url.clone();
            }
            existing.updated_at = now;
            return Ok(Upserted {
                record: existing.clone(),
                created: false,
            });
        }

        let candidate = Candidate {
            id: Uuid::new_v4(),
            user_id,
            name,
            skills: profile.skills.clone(),
            experience: profile.experience,
            preferences: profile.preferences.clone(),
            resume_url: profile.resume_url.clone(),
            created_at: now,
            updated_at: now,
        };
        candidates.push(candidate.clone());
        Ok(Upserted {
            record: candidate,
            created: true,
        })
    }

    async fn find_hr_by_user(&self, user_id: Uuid) -> Result<Option<HrProfile>, StoreError> {
        Ok(self
            .hr_profiles
            .lock()
            .unwrap()
            .iter()
            .find(|h| h.user_id == user_id)
            .cloned())
    }

    async fn upsert_hr(
        &self,
        user_id: Uuid,
        company: &str,
    ) -> Result<Upserted<HrProfile>, StoreError> {
        let mut hr_profiles = self.hr_profiles.lock().unwrap();
        if let Some(existing) = hr_profiles.iter_mut().find(|h| h.user_id == user_id) {
            existing.company = company.to_string();
            return Ok(Upserted {
                record: existing.clone(),
                created: false,
            });
        }

        let hr = HrProfile {
            id: Uuid::new_v4(),
            user_id,
            company: company.to_string(),
            created_at: Utc::now(),
        };
        hr_profiles.push(hr.clone());
        Ok(Upserted {
            record: hr,
            created: true,
        })
    }
}

#[async_trait]
impl AuditLog for MemoryStore {
    async fn append(&self, entry: NewRecommendation) -> Result<RecommendationRecord, StoreError> {
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("audit log is read-only".into()));
        }

        let record = RecommendationRecord {
            id: Uuid::new_v4(),
            request_type: entry.request_type.as_str().to_string(),
            user_id: entry.user_id,
            query: entry.query,
            ai_response: entry.ai_response,
            created_at: Utc::now(),
        };
        self.audit.lock().unwrap().push(record.clone());
        Ok(record)
    }
}
