// Adapters layer: concrete implementations of the token provider and mail transport ports.

pub mod oauth;
pub mod smtp;
pub mod token_cache;

pub use oauth::RefreshTokenProvider;
pub use smtp::SmtpMailTransport;
pub use token_cache::CachedTokenProvider;
