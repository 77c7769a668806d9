// Candidate, job and HR profile endpoints. Plain CRUD over the ProfileStore.

pub mod handlers;
