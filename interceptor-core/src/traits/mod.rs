pub mod event_listener;
pub mod stream_provider;
pub mod worker;
