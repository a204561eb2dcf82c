use tracing::info;

/// Outbound mail boundary. Actual delivery is handled by an external
/// provider; this service renders the link and hands the message off, which
/// in this build means logging it. Callers only depend on the interface.
#[derive(Debug, Clone)]
pub struct Mailer {
    frontend_base_url: String,
}

impl Mailer {
    pub fn new(frontend_base_url: Option<String>) -> Self {
        Self {
            frontend_base_url: frontend_base_url
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        }
    }

    /// Hand off a verification email. Returns whether the message was
    /// accepted for delivery.
    pub fn send_verification_email(&self, email: &str, token: &str) -> bool {
        let link = format!("{}/verify-email?token={}", self.frontend_base_url, token);
        info!(%email, %link, "queued verification email");
        true
    }

    pub fn send_welcome_email(&self, email: &str, username: &str) -> bool {
        info!(%email, %username, "queued welcome email");
        true
    }
}
