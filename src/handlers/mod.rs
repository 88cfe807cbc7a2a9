// handlers/mod.rs - Request handlers, one file per endpoint
//
// auth   → /signup, /login, /logout (session cookie lifecycle)
// users  → /users, /users/:id (listing, lookup, deletion)
// system → /, /health
pub mod auth;
pub mod system;
pub mod users;
