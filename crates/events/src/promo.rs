//! Promotional email dispatcher.
//!
//! Visitors who opt into marketing leave an address in the `promo_emails`
//! queue; [`PromoDispatcher`] drains it in batches of at most
//! [`BATCH_SIZE`] records per invocation, retrying each record up to
//! [`MAX_ATTEMPTS`] times by incrementing its counter column. The dispatch
//! trigger is fire-and-forget: callers spawn it and never wait on the
//! result. SMTP configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`SmtpConfig::from_env`] returns `None` and
//! dispatch becomes a logged no-op.

use perkflow_db::repositories::{CouponRepo, PromoEmailRepo};
use perkflow_db::DbPool;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum records processed per dispatch invocation.
pub const BATCH_SIZE: i64 = 10;

/// Maximum send attempts per record.
pub const MAX_ATTEMPTS: i16 = 3;

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "offers@perkflow.local";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum PromoError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// SmtpConfig
// ---------------------------------------------------------------------------

/// Configuration for the SMTP transport.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl SmtpConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      | —                        |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `offers@perkflow.local`  |
    /// | `SMTP_USER`     | no       | —                        |
    /// | `SMTP_PASSWORD` | no       | —                        |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// PromoMailer
// ---------------------------------------------------------------------------

/// Sends promotional emails via SMTP.
pub struct PromoMailer {
    config: SmtpConfig,
}

impl PromoMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Send one promotional email.
    pub async fn deliver(
        &self,
        to_email: &str,
        subject: &str,
        body: String,
    ) -> Result<(), PromoError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| PromoError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, "Promotional email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PromoDispatcher
// ---------------------------------------------------------------------------

/// Drains the promo email queue one batch at a time.
pub struct PromoDispatcher {
    pool: DbPool,
    mailer: Option<PromoMailer>,
}

impl PromoDispatcher {
    /// Create a dispatcher. Without a mailer (SMTP unconfigured) dispatch
    /// logs and does nothing; queue rows keep their remaining attempts.
    pub fn new(pool: DbPool, mailer: Option<PromoMailer>) -> Self {
        Self { pool, mailer }
    }

    /// Process one batch of pending records. Returns the number of emails
    /// successfully sent.
    pub async fn dispatch_once(&self) -> Result<usize, sqlx::Error> {
        let Some(mailer) = &self.mailer else {
            tracing::warn!("SMTP not configured, skipping promo email dispatch");
            return Ok(0);
        };

        let pending = PromoEmailRepo::fetch_pending(&self.pool, BATCH_SIZE, MAX_ATTEMPTS).await?;
        if pending.is_empty() {
            return Ok(0);
        }

        let mut sent = 0;
        for record in &pending {
            let (subject, body) = self.compose(record).await?;
            match mailer.deliver(&record.email, &subject, body).await {
                Ok(()) => {
                    PromoEmailRepo::mark_sent(&self.pool, record.id).await?;
                    sent += 1;
                }
                Err(e) => {
                    tracing::error!(
                        record_id = record.id,
                        error = %e,
                        "Promotional email send failed"
                    );
                    PromoEmailRepo::record_failure(&self.pool, record.id, &e.to_string())
                        .await?;
                }
            }
        }

        tracing::info!(sent, total = pending.len(), "Processed promo email batch");
        Ok(sent)
    }

    /// Compose subject and body, naming the coupon when the record carries
    /// one.
    async fn compose(
        &self,
        record: &perkflow_db::models::promo_email::PromoEmail,
    ) -> Result<(String, String), sqlx::Error> {
        let coupon = match record.coupon_id {
            Some(id) => CouponRepo::get(&self.pool, id).await?,
            None => None,
        };

        Ok(match coupon {
            Some(coupon) => (
                format!("Your {} coupon", coupon.title),
                format!(
                    "Thanks for visiting!\n\nYour coupon: {}\nCode: {}\n\nShow this email or your claim code at the counter.",
                    coupon.title, coupon.code
                ),
            ),
            None => (
                "Thanks for visiting".to_string(),
                "Thanks for visiting! Keep an eye on this inbox for upcoming offers.".to_string(),
            ),
        })
    }
}
