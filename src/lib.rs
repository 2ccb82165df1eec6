//! # Autosales - LLM-backed B2B sales email drafting
//!
//! Autosales turns a project description and lead information into sales
//! email drafts through an OpenAI-compatible chat-completions API. It also
//! summarizes customer replies, analyzes rejected drafts and rewrites them,
//! and routes free-text requests ("프로젝트 1번에 메일 보내줘") to the right
//! operation.
//!
//! ## Features
//!
//! - **Intent routing**: keyword or LLM classification, regex parameter
//!   extraction, required-field validation and dispatch
//! - **Fallbacks**: every generator returns a usable result even when the LLM
//!   call fails, times out or answers with something that is not JSON
//! - **Data service gateway**: optional REST backend for projects, leads,
//!   emails and feedback
//! - **HTTP API**: axum server for chat UIs and automation
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default config
//! autosales init
//!
//! # Run the server
//! OPENAI_API_KEY=sk-... autosales serve --port 8000
//!
//! # One-off request
//! autosales chat "프로젝트 1번에 메일 보내줘" --payload '{"project_id": 1, "leads": [{"id": 1}]}'
//!
//! # Show what the router understands
//! autosales intents
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Command-line interface definitions and handlers
//! - [`config`]: Configuration loading and environment overrides
//! - [`error`]: Error types and result aliases
//! - [`gateway`]: REST client for the external data service
//! - [`generate`]: LLM-backed generators with fallbacks
//! - [`llm`]: Completion client and JSON extraction
//! - [`model`]: Data models (EmailDraft, Intent, ProjectInfo, etc.)
//! - [`prompts`]: Message builders for every generation task
//! - [`router`]: Intent classification and dispatch
//! - [`server`]: HTTP endpoints
//! - [`storage`]: In-process project context store
//! - [`validation`]: Input validation utilities

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and management.
///
/// Handles `.autosales.yml` files and environment overrides.
pub mod config;

/// Error types and result aliases.
///
/// Defines `AutosalesError` enum and `Result<T>` type alias.
pub mod error;

pub mod gateway;

/// LLM-backed generators.
///
/// Initial, follow-up and rewritten emails, feedback summaries, issue
/// analysis, extraction and intent classification.
pub mod generate;

pub mod http;

/// Completion client abstraction and the OpenAI-compatible implementation.
pub mod llm;

pub mod logging;

/// Data models for autosales.
///
/// Includes `EmailDraft`, `Intent`, `ProjectInfo`, and `LeadInfo`.
pub mod model;

pub mod prompts;

/// Intent routing.
///
/// Turns a free-text request plus an optional payload into a JSON result.
pub mod router;

/// HTTP server built with axum.
pub mod server;

/// In-process storage.
///
/// Holds project descriptions registered through the API.
pub mod storage;

/// Input validation utilities.
///
/// Validates descriptions, prompts and required request fields.
pub mod validation;
