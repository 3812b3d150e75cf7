/**
 * Services Module
 * Orchestration between HTTP handlers, stores and the media store
 */

pub mod contact;
pub mod projects;
pub mod upload;
