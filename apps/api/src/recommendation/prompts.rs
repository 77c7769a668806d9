//! Prompt builder for both ranking directions. Pure functions of their inputs.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::llm_client::prompts::{
    HR_ASSISTANT_PERSONA, RESPOND_JSON_ONLY, SCORE_RANGE_INSTRUCTION,
};
use crate::llm_client::ChatMessage;
use crate::models::candidate::Candidate;
use crate::models::job::Job;
use crate::recommendation::schema::{RankedCandidate, RankedJob, RankedSubject};

/// Fallback display name for candidates whose user has no name.
pub const ANONYMOUS_CANDIDATE: &str = "Candidate";

/// A system instruction plus the user payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(self.system), ChatMessage::user(self.user)]
    }
}

/// The job fields the model sees when ranking candidates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobBrief<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub required_skills: &'a [String],
    pub location: Option<&'a str>,
    pub experience: Option<i32>,
}

impl<'a> From<&'a Job> for JobBrief<'a> {
    fn from(job: &'a Job) -> Self {
        Self {
            title: &job.title,
            description: &job.description,
            required_skills: &job.required_skills,
            location: job.location.as_deref(),
            experience: job.experience,
        }
    }
}

#[derive(Debug, Serialize)]
struct CandidateCard<'a> {
    id: Uuid,
    name: &'a str,
    skills: &'a [String],
    experience: i32,
    preferences: &'a Value,
}

#[derive(Debug, Serialize)]
struct CandidateBrief<'a> {
    skills: &'a [String],
    experience: i32,
    preferences: &'a Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JobCard<'a> {
    id: Uuid,
    title: &'a str,
    description: &'a str,
    required_skills: &'a [String],
    location: Option<&'a str>,
    experience: Option<i32>,
}

/// Prompt for ranking `candidates` against one job.
pub fn build_candidate_ranking_prompt(
    job: &Job,
    candidates: &[Candidate],
) -> Result<Prompt, serde_json::Error> {
    let cards: Vec<CandidateCard<'_>> = candidates
        .iter()
        .map(|c| CandidateCard {
            id: c.id,
            name: c.name.as_deref().unwrap_or(ANONYMOUS_CANDIDATE),
            skills: &c.skills,
            experience: c.experience,
            preferences: &c.preferences,
        })
        .collect();

    Ok(Prompt {
        system: ranking_system_prompt::<RankedCandidate>("candidates", "job"),
        user: format!(
            "Job: {}\nCandidates: {}\n{RESPOND_JSON_ONLY}",
            serde_json::to_string(&JobBrief::from(job))?,
            serde_json::to_string(&cards)?,
        ),
    })
}

/// Prompt for ranking `jobs` for one candidate.
pub fn build_job_ranking_prompt(
    candidate: &Candidate,
    jobs: &[Job],
) -> Result<Prompt, serde_json::Error> {
    let brief = CandidateBrief {
        skills: &candidate.skills,
        experience: candidate.experience,
        preferences: &candidate.preferences,
    };
    let cards: Vec<JobCard<'_>> = jobs
        .iter()
        .map(|j| JobCard {
            id: j.id,
            title: &j.title,
            description: &j.description,
            required_skills: &j.required_skills,
            location: j.location.as_deref(),
            experience: j.experience,
        })
        .collect();

    Ok(Prompt {
        system: ranking_system_prompt::<RankedJob>("jobs", "candidate"),
        user: format!(
            "Candidate: {}\nJobs: {}\n{RESPOND_JSON_ONLY}",
            serde_json::to_string(&brief)?,
            serde_json::to_string(&cards)?,
        ),
    })
}

fn ranking_system_prompt<T: RankedSubject>(ranked: &str, subject: &str) -> String {
    format!(
        "{HR_ASSISTANT_PERSONA} Rank the best {ranked} for the given {subject}. \
         Return strict JSON {{\"items\":[{{\"rank\":number,\"{id}\":string,\"{display}\":string,\
         \"score\":number,\"rationale\":string}}]}}. {SCORE_RANGE_INSTRUCTION} \
         Include top 3-5 only.",
        id = T::ID_FIELD,
        display = T::DISPLAY_FIELD,
    )
}
