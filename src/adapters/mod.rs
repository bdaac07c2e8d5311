// Adapters layer: concrete implementations for external systems (email provider, http hosting).

#[cfg(feature = "cli")]
pub mod http;
pub mod resend;
