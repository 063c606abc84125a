//! The contact form: required-field checks and hand-off to whatever actually
//! delivers the email.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::notice::Notice;

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// What the email service receives.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub submitted_at: String,
    pub form_url: String,
}

pub fn missing_fields_notice() -> Notice {
    Notice::error("Errore", "Tutti i campi sono obbligatori")
}

pub fn sent_notice() -> Notice {
    Notice::info("Messaggio inviato!", "Ti risponderemo entro 48 ore.")
}

pub fn failed_notice() -> Notice {
    Notice::error(
        "Errore nell'invio",
        "Si è verificato un errore. Riprova più tardi.",
    )
}

impl ContactForm {
    pub fn is_complete(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.subject,
            &self.message,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// Turns a complete form into a message stamped with `now`.
    pub fn into_message<Tz>(self, now: DateTime<Tz>, form_url: &str) -> Result<ContactMessage, Notice>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        if !self.is_complete() {
            return Err(missing_fields_notice());
        }

        Ok(ContactMessage {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            subject: self.subject.trim().to_owned(),
            message: self.message.trim().to_owned(),
            submitted_at: now.format("%d/%m/%Y, %H:%M:%S").to_string(),
            form_url: form_url.to_owned(),
        })
    }

    /// Validates, sends once and reports the outcome. Nothing is retried.
    pub fn submit<Tz>(
        self,
        transport: &mut dyn MessageTransport,
        now: DateTime<Tz>,
        form_url: &str,
    ) -> Notice
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let message = match self.into_message(now, form_url) {
            Ok(message) => message,
            Err(notice) => return notice,
        };

        match transport.send(&message) {
            Ok(()) => sent_notice(),
            Err(err) => {
                log::error!("Contact message could not be delivered: {:#}", err);
                failed_notice()
            }
        }
    }
}

pub trait MessageTransport {
    fn send(&mut self, message: &ContactMessage) -> anyhow::Result<()>;
}

/// Drops each message as a YAML file into a directory watched by the mail
/// sender.
pub struct OutboxTransport {
    dir: PathBuf,
}

impl OutboxTransport {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_owned(),
        }
    }

    fn next_path(&self) -> PathBuf {
        let mut n = 0;
        loop {
            let candidate = self.dir.join(format!("message-{:04}.yml", n));
            if !candidate.exists() {
                return candidate;
            }
            n += 1;
        }
    }
}

impl MessageTransport for OutboxTransport {
    fn send(&mut self, message: &ContactMessage) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating outbox {:?}", self.dir))?;

        let path = self.next_path();
        let yaml = serde_yaml::to_string(message)?;

        std::fs::File::create(&path)
            .and_then(|mut file| file.write_all(yaml.as_bytes()))
            .with_context(|| format!("writing {:?}", path))?;

        log::info!("Queued contact message from {} as {:?}", message.email, path);

        Ok(())
    }
}
