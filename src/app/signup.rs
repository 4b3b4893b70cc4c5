use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::engine::{EngineError, RuleSet, ValidationContext};

/// One row of a sign-up export (`username,email,age`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRecord {
    pub username: String,
    pub email: String,
    pub age: Option<u32>,
}

/// Simulated remote directory of usernames already in use
///
/// Every lookup waits `latency` before answering, like a network call.
#[derive(Debug, Clone)]
pub struct UsernameDirectory {
    taken: HashSet<String>,
    latency: Duration,
}

impl UsernameDirectory {
    pub fn new<I, N>(taken: I, latency: Duration) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            taken: taken
                .into_iter()
                .map(|name| name.into().to_lowercase())
                .collect(),
            latency,
        }
    }

    /// Case-insensitive availability lookup
    pub async fn is_available(&self, username: &str) -> bool {
        tokio::time::sleep(self.latency).await;
        !self.taken.contains(&username.to_lowercase())
    }
}

impl Default for UsernameDirectory {
    fn default() -> Self {
        Self::new(
            ["admin", "root", "support", "flowguard"],
            Duration::from_millis(25),
        )
    }
}

/// Built-in rules for [`SignupRecord`]
///
/// - username: 3 to 32 characters, ASCII alphanumeric, not taken
/// - email: exactly one `@`, non-empty local part, dotted domain
/// - age: present and at least 13
#[derive(Debug, Clone, Default)]
pub struct SignupRules {
    directory: Arc<UsernameDirectory>,
}

impl SignupRules {
    pub fn new(directory: UsernameDirectory) -> Self {
        Self {
            directory: Arc::new(directory),
        }
    }
}

#[async_trait]
impl RuleSet<SignupRecord> for SignupRules {
    async fn declare(&self, ctx: &mut ValidationContext<SignupRecord>) -> Result<(), EngineError> {
        let directory = Arc::clone(&self.directory);
        ctx.field(|s: &SignupRecord| s.username.clone())
            .check("username must be 3 to 32 characters", "username.length", |u| {
                (3..=32).contains(&u.chars().count())
            })
            .check("username must be alphanumeric", "username.charset", |u| {
                u.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .check_async("username is already taken", "username.taken", |u| async move {
                directory.is_available(&u).await
            })
            .await;

        ctx.field(|s: &SignupRecord| s.email.clone())
            .check("email must contain exactly one @", "email.at", |e| {
                e.matches('@').count() == 1
            })
            .check("email domain is invalid", "email.domain", |e| {
                e.rsplit_once('@').is_some_and(|(local, domain)| {
                    !local.is_empty()
                        && domain.contains('.')
                        && !domain.starts_with('.')
                        && !domain.ends_with('.')
                })
            });

        ctx.field(|s: &SignupRecord| s.age)
            .check("age is required", "age.required", |a| a.is_some())
            .check("must be at least 13", "age.min", |a| a.is_none_or(|a| a >= 13));

        Ok(())
    }
}
