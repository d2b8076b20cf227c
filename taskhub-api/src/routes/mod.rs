/// API route handlers
///
/// # Modules
///
/// - `auth`: Sign-up, sign-in, refresh, sign-out, password change
/// - `users`: Profile fetch and update
/// - `tasks`: Task CRUD and filtered listing
/// - `avatars`: Avatar upload/fetch/delete
/// - `health`: Health check

pub mod auth;
pub mod avatars;
pub mod health;
pub mod tasks;
pub mod users;
