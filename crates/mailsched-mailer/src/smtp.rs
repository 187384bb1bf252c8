use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use mailsched_core::{config::SmtpConfig, MailschedError};
use mailsched_scheduler::{MailSender, SchedulerError};
use tracing::{debug, info};

/// Sends HTML mail through an SMTP relay.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the relay transport. No connection is made until the first send.
    pub fn new(from: &str, smtp: &SmtpConfig) -> mailsched_core::Result<Self> {
        let from: Mailbox = from
            .parse()
            .map_err(|e| MailschedError::Mail(format!("invalid sender {from:?}: {e}")))?;

        let builder = if smtp.implicit_tls {
            SmtpTransport::relay(&smtp.host)
        } else {
            SmtpTransport::starttls_relay(&smtp.host)
        }
        .map_err(|e| MailschedError::Mail(format!("SMTP relay {}: {e}", smtp.host)))?
        .port(smtp.port);

        let builder = if smtp.username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
        };

        info!(
            host = %smtp.host,
            port = smtp.port,
            implicit_tls = smtp.implicit_tls,
            "SMTP transport configured"
        );
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// One message addressed to every comma-separated recipient in `to`.
    fn compose(&self, to: &str, subject: &str, html_body: &str) -> Result<Message, SchedulerError> {
        let send_error = |reason: String| SchedulerError::Send {
            to: to.to_string(),
            reason,
        };

        let mut builder = Message::builder().from(self.from.clone());
        for address in to.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            let mailbox: Mailbox = address
                .parse()
                .map_err(|e| send_error(format!("invalid address {address:?}: {e}")))?;
            builder = builder.to(mailbox);
        }

        builder
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| send_error(format!("build message: {e}")))
    }
}

impl MailSender for SmtpMailer {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> mailsched_scheduler::Result<()> {
        let message = self.compose(to, subject, html_body)?;
        let response = self
            .transport
            .send(&message)
            .map_err(|e| SchedulerError::Send {
                to: to.to_string(),
                reason: e.to_string(),
            })?;
        debug!(%to, code = %response.code(), "SMTP relay accepted message");
        Ok(())
    }
}
