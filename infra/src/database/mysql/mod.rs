//! MySQL repository implementations

mod registration_repository_impl;

pub use registration_repository_impl::MySqlRegistrationRepository;
