//! Cookie based authentication: registration, log in and out, and the
//! middleware that guards the expense routes.

mod cookie;
mod current_user;
mod log_in;
mod log_out;
mod middleware;
mod register;
mod token;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use current_user::current_user_endpoint;
pub use log_in::log_in_endpoint;
pub use log_out::log_out_endpoint;
pub use middleware::auth_guard;
pub use register::register_endpoint;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
