/// Verification email delivery
///
/// Registration hands each new code to a [`VerificationMailer`]. Two
/// implementations exist:
///
/// - [`SmtpMailer`]: STARTTLS relay with username/password credentials
/// - [`LogMailer`]: used when SMTP is not configured; records that delivery
///   was skipped without logging the code itself
///
/// Delivery happens after the registration transaction commits, and a
/// delivery failure never fails registration.
///
/// # Example
///
/// ```no_run
/// use traindesk_shared::mail::{SmtpMailer, SmtpSettings, VerificationMailer};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mailer = SmtpMailer::new(&SmtpSettings {
///     host: "smtp.example.com".to_string(),
///     port: 587,
///     username: "mailer".to_string(),
///     password: "secret".to_string(),
///     from_address: "TrainDesk <no-reply@example.com>".to_string(),
/// })?;
///
/// mailer.send_verification_code("coach@example.com", "Coach", "042917").await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use tracing::{debug, info};

/// Error type for mail delivery
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Sender or recipient address does not parse
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Message could not be assembled
    #[error("Failed to build message: {0}")]
    Build(String),

    /// Transport setup failed
    #[error("SMTP setup failed: {0}")]
    Setup(String),

    /// The relay rejected or failed to accept the message
    #[error("SMTP send failed: {0}")]
    Send(String),
}

/// SMTP relay settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,

    /// `From` header, either a bare address or `Name <address>`
    pub from_address: String,
}

/// Delivers verification codes to trainers
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    /// Sends `code` to `to_email`
    async fn send_verification_code(
        &self,
        to_email: &str,
        trainer_name: &str,
        code: &str,
    ) -> Result<(), MailError>;
}

/// Subject line of the verification email
pub const VERIFICATION_SUBJECT: &str = "Verify your TrainDesk email address";

/// Plain-text body of the verification email
pub fn verification_body(trainer_name: &str, code: &str) -> String {
    format!(
        "Hello {},\n\n\
         Your TrainDesk verification code is: {}\n\n\
         The code expires in 24 hours. If you did not create an account, \
         you can ignore this email.\n",
        trainer_name, code
    )
}

/// SMTP-backed mailer
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds a STARTTLS transport for `settings`
    ///
    /// No connection is opened until the first message is sent.
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let from: Mailbox = settings
            .from_address
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", settings.from_address, e)))?;

        let credentials = Credentials::new(settings.username.clone(), settings.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| MailError::Setup(e.to_string()))?
            .port(settings.port)
            .credentials(credentials)
            .build();

        info!(host = %settings.host, port = settings.port, "SMTP mailer configured");

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl VerificationMailer for SmtpMailer {
    async fn send_verification_code(
        &self,
        to_email: &str,
        trainer_name: &str,
        code: &str,
    ) -> Result<(), MailError> {
        let to: Mailbox = to_email
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", to_email, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(VERIFICATION_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(verification_body(trainer_name, code))
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        debug!(to = %to_email, "Verification email sent");
        Ok(())
    }
}

/// Mailer that only logs
///
/// Stands in for SMTP in development and tests.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl VerificationMailer for LogMailer {
    async fn send_verification_code(
        &self,
        to_email: &str,
        _trainer_name: &str,
        _code: &str,
    ) -> Result<(), MailError> {
        info!(to = %to_email, "SMTP not configured, skipping verification email");
        Ok(())
    }
}
