/// Database models for Taskhub
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User profiles
/// - `credential`: Password digests, one per user, kept apart from profiles
/// - `session`: Issued access/refresh token pairs (one row per device)
/// - `task`: Per-user to-do items
/// - `avatar`: Per-user profile image (at most one row per user)
///
/// Functions that participate in the sign-up transaction accept any
/// `PgExecutor`, so the same code runs against a pool or inside an open
/// transaction.

pub mod avatar;
pub mod credential;
pub mod session;
pub mod task;
pub mod user;
