//! HTML fragments for every page.
//!
//! Each function is pure: it takes a view model and returns markup. Every
//! backend-supplied string is escaped on the way in.

pub mod admin;
pub mod badge;
pub mod chat;
pub mod dashboard;
pub mod flights;
pub mod management;
pub mod trip;
