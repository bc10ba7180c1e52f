//! # Purchase Reminders
//!
//! A reminder is two side effects in sequence:
//!
//! ```text
//! add_purchase_reminder(title, when)
//!   ├── 1. Calendar::create_event   (failure → Err, nothing else happens)
//!   └── 2. Notifier::schedule       (failure → Ok, notification_scheduled = false)
//! ```
//!
//! A notification failure never rolls back the calendar event. The receipt
//! tells the caller which of the two landed.
//!
//! The service is built once at startup and handed to whoever needs it.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};

pub const REMINDER_TITLE_PREFIX: &str = "Purchase Reminder";
/// How far ahead `upcoming_reminders` looks.
pub const UPCOMING_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_LEAD_HOURS: i64 = 24;
/// Upper bound for the default lead time (one year).
pub const MAX_LEAD_HOURS: i64 = 24 * 365;
const EVENT_DURATION_MINUTES: i64 = 60;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReminderError {
    #[error("calendar permission denied: {0}")]
    PermissionDenied(String),
    #[error("calendar error: {0}")]
    Calendar(String),
    #[error("notification error: {0}")]
    Notification(String),
}

impl From<io::Error> for ReminderError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => ReminderError::PermissionDenied(err.to_string()),
            _ => ReminderError::Calendar(err.to_string()),
        }
    }
}

/// A calendar entry, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub notes: Option<String>,
    pub location: Option<String>,
}

/// An event before the calendar has assigned it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub notes: Option<String>,
    pub location: Option<String>,
}

/// Delivered when a scheduled reminder comes due.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderAlert {
    pub title: String,
    pub body: String,
    pub product_title: String,
}

/// What `add_purchase_reminder` managed to do.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderReceipt {
    pub event_id: String,
    pub remind_at: DateTime<Utc>,
    /// False when the event exists but the notification could not be scheduled.
    pub notification_scheduled: bool,
}

#[async_trait]
pub trait Calendar: Send + Sync {
    /// Stores the event and returns its id.
    async fn create_event(&self, draft: EventDraft) -> Result<String, ReminderError>;
    async fn events_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, ReminderError>;
    async fn delete_event(&self, id: &str) -> Result<(), ReminderError>;
}

pub trait Notifier: Send + Sync {
    /// Arranges for `alert` to be delivered at `at`.
    fn schedule(&self, alert: ReminderAlert, at: DateTime<Utc>) -> Result<(), ReminderError>;
}

/// The capability controllers depend on.
#[async_trait]
pub trait ReminderService: Send + Sync {
    /// Adds a reminder for `product_title`. `when` defaults to the configured lead time.
    async fn add_purchase_reminder(
        &self,
        product_title: &str,
        when: Option<DateTime<Utc>>,
    ) -> Result<ReminderReceipt, ReminderError>;

    async fn upcoming_reminders(&self) -> Result<Vec<CalendarEvent>, ReminderError>;

    async fn remove_reminder(&self, event_id: &str) -> Result<(), ReminderError>;
}

// ============================================================================
// Calendar + Notifier composition
// ============================================================================

pub struct CalendarReminders {
    calendar: Arc<dyn Calendar>,
    notifier: Arc<dyn Notifier>,
    app_name: String,
    lead_time: Duration,
}

impl CalendarReminders {
    pub fn new(
        calendar: Arc<dyn Calendar>,
        notifier: Arc<dyn Notifier>,
        app_name: impl Into<String>,
        lead_hours: i64,
    ) -> Self {
        Self {
            calendar,
            notifier,
            app_name: app_name.into(),
            lead_time: Duration::hours(lead_hours.clamp(0, MAX_LEAD_HOURS)),
        }
    }
}

#[async_trait]
impl ReminderService for CalendarReminders {
    async fn add_purchase_reminder(
        &self,
        product_title: &str,
        when: Option<DateTime<Utc>>,
    ) -> Result<ReminderReceipt, ReminderError> {
        let remind_at = match when {
            Some(at) => at,
            None => Utc::now()
                .checked_add_signed(self.lead_time)
                .ok_or_else(|| ReminderError::Calendar("reminder time out of range".to_string()))?,
        };
        let end = remind_at
            .checked_add_signed(Duration::minutes(EVENT_DURATION_MINUTES))
            .ok_or_else(|| ReminderError::Calendar("reminder time out of range".to_string()))?;
        let body = format!("Don't forget to purchase: {product_title}");

        let draft = EventDraft {
            title: format!("{REMINDER_TITLE_PREFIX}: {product_title}"),
            start: remind_at,
            end,
            notes: Some(body.clone()),
            location: Some(self.app_name.clone()),
        };

        let event_id = self.calendar.create_event(draft).await?;
        info!("Created reminder event {} for {:?}", event_id, product_title);

        let alert = ReminderAlert {
            title: REMINDER_TITLE_PREFIX.to_string(),
            body,
            product_title: product_title.to_string(),
        };
        let notification_scheduled = match self.notifier.schedule(alert, remind_at) {
            Ok(()) => true,
            Err(e) => {
                warn!("Reminder event {} kept, but notification failed: {}", event_id, e);
                false
            }
        };

        Ok(ReminderReceipt {
            event_id,
            remind_at,
            notification_scheduled,
        })
    }

    async fn upcoming_reminders(&self) -> Result<Vec<CalendarEvent>, ReminderError> {
        let now = Utc::now();
        let events = self
            .calendar
            .events_between(now, now + Duration::days(UPCOMING_WINDOW_DAYS))
            .await?;
        Ok(events
            .into_iter()
            .filter(|event| event.title.contains(REMINDER_TITLE_PREFIX))
            .collect())
    }

    async fn remove_reminder(&self, event_id: &str) -> Result<(), ReminderError> {
        self.calendar.delete_event(event_id).await
    }
}

// ============================================================================
// JSON file calendar
// ============================================================================

#[derive(Serialize, Deserialize, Default, Debug)]
struct CalendarFile {
    events: Vec<CalendarEvent>,
}

/// Calendar stored as a JSON file. Writes go through `.tmp` + rename.
pub struct JsonCalendar {
    path: PathBuf,
    enabled: bool,
    write_lock: Mutex<()>,
}

impl JsonCalendar {
    pub fn new(path: PathBuf, enabled: bool) -> Self {
        Self {
            path,
            enabled,
            write_lock: Mutex::new(()),
        }
    }

    fn check_access(&self) -> Result<(), ReminderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ReminderError::PermissionDenied(
                "calendar access is disabled in config".to_string(),
            ))
        }
    }

    async fn load(&self) -> Result<CalendarFile, ReminderError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| ReminderError::Calendar(format!("corrupt calendar file: {e}"))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(CalendarFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, file: &CalendarFile) -> Result<(), ReminderError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| ReminderError::Calendar(e.to_string()))?;
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl Calendar for JsonCalendar {
    async fn create_event(&self, draft: EventDraft) -> Result<String, ReminderError> {
        self.check_access()?;
        let _guard = self.write_lock.lock().await;

        let mut file = self.load().await?;
        let id = uuid::Uuid::new_v4().to_string();
        file.events.push(CalendarEvent {
            id: id.clone(),
            title: draft.title,
            start: draft.start,
            end: draft.end,
            notes: draft.notes,
            location: draft.location,
        });
        self.store(&file).await?;
        debug!("Calendar now holds {} events", file.events.len());
        Ok(id)
    }

    async fn events_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, ReminderError> {
        self.check_access()?;
        let mut events: Vec<CalendarEvent> = self
            .load()
            .await?
            .events
            .into_iter()
            .filter(|event| event.start >= from && event.start <= to)
            .collect();
        events.sort_by_key(|event| event.start);
        Ok(events)
    }

    async fn delete_event(&self, id: &str) -> Result<(), ReminderError> {
        self.check_access()?;
        let _guard = self.write_lock.lock().await;

        let mut file = self.load().await?;
        let before = file.events.len();
        file.events.retain(|event| event.id != id);
        if file.events.len() == before {
            return Err(ReminderError::Calendar(format!("no event with id {id}")));
        }
        self.store(&file).await
    }
}

// ============================================================================
// In-process notifier
// ============================================================================

/// Delivers alerts over a channel once they come due. The receiving end is
/// usually the terminal UI's status bar.
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<ReminderAlert>,
}

impl ChannelNotifier {
    pub fn new(sender: mpsc::UnboundedSender<ReminderAlert>) -> Self {
        Self { sender }
    }
}

impl Notifier for ChannelNotifier {
    fn schedule(&self, alert: ReminderAlert, at: DateTime<Utc>) -> Result<(), ReminderError> {
        if self.sender.is_closed() {
            return Err(ReminderError::Notification(
                "no one is listening for reminders".to_string(),
            ));
        }

        let delay = (at - Utc::now()).to_std().unwrap_or_default();
        let sender = self.sender.clone();
        debug!("Scheduling reminder alert in {:?}", delay);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(alert).is_err() {
                warn!("Reminder alert dropped: receiver gone");
            }
        });
        Ok(())
    }
}

/// Default calendar file: `~/.shelf/reminders.json`.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".shelf").join("reminders.json"))
}
