pub mod event_target;
pub mod interceptor;
pub mod processor;
