//! Outbound email
//!
//! Two transports, chosen at startup:
//! - `Ses`: real delivery through AWS SES (production with SES_FROM_EMAIL set)
//! - `Preview`: nothing is sent; magic links are logged and returned to the
//!   caller so the flow can be exercised without a mail provider

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use shared::models::User;

use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone)]
enum Transport {
    Ses(SesClient),
    Preview,
}

/// Email sender for invitations and organizer notices
#[derive(Clone)]
pub struct EmailService {
    transport: Transport,
    from: String,
    base_url: String,
}

impl EmailService {
    pub async fn from_config(config: &Config) -> Self {
        let transport = match (&config.ses_from_email, config.is_production()) {
            (Some(_), true) => {
                let aws_config =
                    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                Transport::Ses(SesClient::new(&aws_config))
            }
            _ => {
                tracing::info!("Email in preview mode; magic links are returned to callers");
                Transport::Preview
            }
        };

        Self {
            transport,
            from: config.ses_from_email.clone().unwrap_or_default(),
            base_url: config.app_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_preview(&self) -> bool {
        matches!(self.transport, Transport::Preview)
    }

    /// Magic-link URL for an invitation token. Organizer tokens land on the
    /// organizer verify page, guest tokens on the invitation page.
    pub fn invitation_link(&self, token: &str, organizer: bool) -> String {
        let page = if organizer { "organizer" } else { "invitation" };
        format!("{}/{page}/verify?token={token}", self.base_url)
    }

    /// Magic-link URL that drops the guest on the menu after login
    pub fn menu_link(&self, token: &str) -> String {
        format!(
            "{}/invitation/verify?token={token}&redirect=/menu",
            self.base_url
        )
    }

    /// Send a magic-link invitation. In preview mode nothing is sent and
    /// the link is returned so the caller can surface it.
    pub async fn send_magic_link(
        &self,
        to: &str,
        name: &str,
        token: &str,
        organizer: bool,
    ) -> Result<Option<String>, BoxError> {
        let url = self.invitation_link(token, organizer);
        match &self.transport {
            Transport::Preview => {
                tracing::info!(to, url, "Magic link (preview, not emailed)");
                Ok(Some(url))
            }
            Transport::Ses(ses) => {
                let body = format!(
                    "Hi {name},\n\n\
                     You're invited to our annual gala!\n\n\
                     Click the link below to respond to your invitation:\n{url}\n\n\
                     This link can only be used once and expires in 7 days."
                );
                self.send(ses, to, "You're invited to the annual gala", &body)
                    .await?;
                tracing::info!(to, "Invitation sent");
                Ok(None)
            }
        }
    }

    /// Send a menu announcement with a login link landing on the menu page
    pub async fn send_menu_invite(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<Option<String>, BoxError> {
        let url = self.menu_link(token);
        match &self.transport {
            Transport::Preview => {
                tracing::info!(to, url, "Menu link (preview, not emailed)");
                Ok(Some(url))
            }
            Transport::Ses(ses) => {
                let body = format!(
                    "Hi {name},\n\n\
                     The gala menu is ready. Pre-order your dishes here:\n{url}\n\n\
                     This link can only be used once and expires in 7 days."
                );
                self.send(ses, to, "The gala menu is ready", &body).await?;
                tracing::info!(to, "Menu announcement sent");
                Ok(None)
            }
        }
    }

    /// Tell a user their organizer access changed
    pub async fn send_organizer_status(
        &self,
        to: &str,
        name: &str,
        granted: bool,
    ) -> Result<(), BoxError> {
        let (subject, line) = if granted {
            (
                "You are now a gala organizer",
                "You have been granted organizer access to the gala dashboard.",
            )
        } else {
            (
                "Your gala organizer access was removed",
                "Your organizer access to the gala dashboard has been removed.",
            )
        };
        let body = format!("Hi {name},\n\n{line}");
        match &self.transport {
            Transport::Preview => {
                tracing::info!(to, subject, "Organizer status email (preview, not emailed)");
                Ok(())
            }
            Transport::Ses(ses) => {
                self.send(ses, to, subject, &body).await?;
                Ok(())
            }
        }
    }

    /// Fan an update out to every organizer. Per-recipient failures are
    /// logged and skipped so one bad address never blocks the rest.
    pub async fn notify_organizers(&self, recipients: &[User], subject: &str, message: &str) {
        match &self.transport {
            Transport::Preview => {
                tracing::info!(count = recipients.len(), subject, message, "Organizer notice (preview)");
            }
            Transport::Ses(ses) => {
                for organizer in recipients {
                    if let Err(e) = self.send(ses, &organizer.email, subject, message).await {
                        tracing::warn!(to = %organizer.email, error = %e, "Organizer notice failed");
                    }
                }
            }
        }
    }

    async fn send(
        &self,
        ses: &SesClient,
        to: &str,
        subject: &str,
        body_text: &str,
    ) -> Result<(), BoxError> {
        let subject = Content::builder().data(subject).build()?;
        let body = Body::builder()
            .text(Content::builder().data(body_text).build()?)
            .build();
        let message = Message::builder().subject(subject).body(body).build();

        ses.send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;
        Ok(())
    }
}
