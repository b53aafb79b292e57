//! Client core for the Helix request-tracking service.
//!
//! This crate provides:
//! - A credential seam ([`TokenProvider`]) consulted before every call
//! - A classified API gateway ([`ApiGateway`]): every failure is an
//!   [`ApiError`], never a raw transport fault
//! - An endpoint façade ([`RequestService`])
//! - An optimistic lifecycle controller and shared store
//!   ([`LifecycleController`], [`RequestStore`])
//!
//! Which status transitions are legal lives in the `helix-lifecycle` crate.
//! The presentation layer renders store snapshots, honors the per-row
//! updating markers, and displays the errors; it makes no authorization
//! decisions beyond hiding administrator-only affordances.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Every async API method can fail

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod models;
pub mod service;

pub use auth::{StaticTokenProvider, TokenProvider};
pub use config::Config;
pub use controller::{LifecycleController, ListScope, RequestStore};
pub use error::ApiError;
pub use gateway::ApiGateway;
pub use helix_lifecycle::{Priority, Status};
pub use models::{
    Activity, ActivityAction, ActivityScope, NewRequest, Request, RequestUpdate, Role, UserProfile,
};
pub use service::RequestService;
