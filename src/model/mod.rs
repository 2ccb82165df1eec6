//! Data models for autosales.
//!
//! - [`EmailDraft`], [`FeedbackSummary`], [`IssueAnalysis`]: generator outputs
//! - [`Intent`]: the fixed set of request purposes the router understands
//! - [`ProjectRecord`], [`ProjectInfo`], [`LeadInfo`]: project and lead data
//! - [`ResponseType`], [`Priority`], [`EmailType`], [`RejectionAction`], [`Status`]: labels

mod email;
mod intent;
mod project;
mod types;

pub use email::{EmailDraft, FeedbackSummary, IssueAnalysis};
pub use intent::{Intent, REWRITE_FIELDS};
pub use project::{
    INDUSTRIES, LeadInfo, OTHER_INDUSTRY, ProjectInfo, ProjectRecord, normalize_industry,
};
pub use types::{EmailType, Priority, RejectionAction, ResponseType, Status};
