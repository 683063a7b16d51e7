pub mod auth;
pub mod notify;
pub mod otp;
pub mod token;

pub use auth::{AuthError, AuthPolicy, AuthService, CredentialFailure, ForgotPasswordOutcome};
pub use notify::{LogNotifier, Notifier, SmtpNotifier};
pub use otp::OtpGenerator;
pub use token::{TokenError, TokenIssuer};
