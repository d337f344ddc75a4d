//! Attendance, break and earnings engine for workforce management.
//!
//! This crate records employee check-ins, break and leave requests, and
//! turns a month of that activity into attendance summaries and pro-rated
//! salary records. The calculations are pure functions in [`calculation`];
//! [`services`] run the workflows against a [`backend::Backend`], and
//! [`api`] exposes the calculations over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod backend;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
