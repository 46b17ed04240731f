//! # Commands
//!
//! Multi-step operations behind the menu options. Each command validates its
//! input, talks to the repositories, and returns a typed result; none of
//! them touch the console.
//!
//! - [`auth`] - register, login
//! - [`catalog`] - search, add, edit, remove books
//! - [`circulation`] - borrow a book, process a borrowing record

pub mod auth;
pub mod catalog;
pub mod circulation;
