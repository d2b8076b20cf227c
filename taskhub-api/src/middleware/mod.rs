/// Middleware modules for the API server
///
/// Request authentication lives in `taskhub_shared::auth::middleware`; this
/// module holds the HTTP-level middleware that is specific to the server.

pub mod security;
