//! # inbox-service
//!
//! Application layer containing lifecycle hooks, business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use dto::*;
pub use services::{
    AccountService, CleanupReport, MessageService, NotificationService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
