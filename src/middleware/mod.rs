// Middleware module - request tracing context

pub mod request_context;

pub use request_context::request_context_middleware;
