pub mod hashing;
pub mod mailer;
pub mod security;
pub mod tokens;
pub mod validation;
