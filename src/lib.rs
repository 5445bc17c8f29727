//! CustomerBrief: single-company intelligence reports over Discord.
//!
//! Queries pass through [`company::CompanyMentionExtractor`] first; only
//! queries naming one company reach the LLM in [`report::ReportAgent`].

pub mod commands;
pub mod company;
pub mod export;
pub mod history;
pub mod llm;
pub mod report;
pub mod search;
pub mod state;
