//! # Product Detail State
//!
//! One product, fetched by id, plus the image selection and the outcome of
//! the last reminder request.
//!
//! ```text
//!   Load(id) ──▶ loading ──Loaded(Ok)──▶ product shown
//!                   │                        │ RequestReminder
//!                   └──Loaded(Err)──▶ error  ▼
//!                         ▲   │         reminder_pending ──ReminderFinished──▶ notice
//!                         └───┘ Retry
//! ```

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::api::ApiError;
use crate::core::product::Product;
use crate::core::reminders::{ReminderError, ReminderReceipt};

pub const REMINDER_ADDED: &str = "Reminder added to your calendar and notifications!";
pub const REMINDER_CALENDAR_ONLY: &str =
    "Reminder added to your calendar, but the notification could not be scheduled.";
pub const REMINDER_PERMISSION_FAILED: &str =
    "Failed to add reminder. Please check your calendar permissions.";

/// User-facing outcome of a reminder request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    PartialSuccess(String),
    Failure(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::PartialSuccess(m) | Notice::Failure(m) => m,
        }
    }

    fn from_outcome(outcome: &Result<ReminderReceipt, ReminderError>) -> Self {
        match outcome {
            Ok(receipt) if receipt.notification_scheduled => {
                Notice::Success(REMINDER_ADDED.to_string())
            }
            Ok(_) => Notice::PartialSuccess(REMINDER_CALENDAR_ONLY.to_string()),
            Err(ReminderError::PermissionDenied(_)) => {
                Notice::Failure(REMINDER_PERMISSION_FAILED.to_string())
            }
            Err(e) => Notice::Failure(format!("Failed to add reminder: {e}")),
        }
    }
}

#[derive(Debug)]
pub enum DetailAction {
    Load(u64),
    Loaded {
        product_id: u64,
        result: Result<Product, ApiError>,
    },
    Retry,
    SelectImage(usize),
    NextImage,
    PreviousImage,
    /// `None` uses the service's default lead time.
    RequestReminder(Option<DateTime<Utc>>),
    ReminderFinished(Result<ReminderReceipt, ReminderError>),
    DismissNotice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEffect {
    None,
    FetchProduct(u64),
    AddReminder {
        product_title: String,
        when: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DetailState {
    pub product_id: u64,
    pub product: Option<Product>,
    pub loading: bool,
    pub error: Option<ApiError>,
    pub image_index: usize,
    pub reminder_pending: bool,
    pub notice: Option<Notice>,
}

impl DetailState {
    pub fn new(product_id: u64) -> Self {
        Self {
            product_id,
            ..Self::default()
        }
    }

    pub fn shows_error_view(&self) -> bool {
        !self.loading && self.error.is_some()
    }

    fn image_count(&self) -> usize {
        self.product.as_ref().map_or(0, |p| p.images.len())
    }

    /// The image to show: the selected one, else the thumbnail.
    pub fn current_image(&self) -> Option<&str> {
        self.product.as_ref()?.image_at(self.image_index)
    }

    fn begin_fetch(&mut self) -> DetailEffect {
        self.loading = true;
        self.error = None;
        DetailEffect::FetchProduct(self.product_id)
    }
}

pub fn update(state: &mut DetailState, action: DetailAction) -> DetailEffect {
    match action {
        DetailAction::Load(id) => {
            if id != state.product_id {
                *state = DetailState::new(id);
            }
            state.begin_fetch()
        }
        DetailAction::Retry => state.begin_fetch(),
        DetailAction::Loaded { product_id, result } => {
            if product_id != state.product_id {
                debug!(
                    "Ignoring product {} result while showing {}",
                    product_id, state.product_id
                );
                return DetailEffect::None;
            }
            state.loading = false;
            match result {
                Ok(product) => {
                    if state.image_index >= product.images.len() {
                        state.image_index = 0;
                    }
                    state.product = Some(product);
                    state.error = None;
                }
                Err(e) => {
                    warn!("Product {} failed to load: {}", product_id, e);
                    state.error = Some(e);
                }
            }
            DetailEffect::None
        }
        DetailAction::SelectImage(index) => {
            if index < state.image_count() {
                state.image_index = index;
            }
            DetailEffect::None
        }
        DetailAction::NextImage => {
            let count = state.image_count();
            if count > 0 {
                state.image_index = (state.image_index + 1) % count;
            }
            DetailEffect::None
        }
        DetailAction::PreviousImage => {
            let count = state.image_count();
            if count > 0 {
                state.image_index = (state.image_index + count - 1) % count;
            }
            DetailEffect::None
        }
        DetailAction::RequestReminder(when) => {
            let Some(product) = &state.product else {
                return DetailEffect::None;
            };
            if state.reminder_pending {
                return DetailEffect::None;
            }
            state.reminder_pending = true;
            state.notice = None;
            DetailEffect::AddReminder {
                product_title: product.title.clone(),
                when,
            }
        }
        DetailAction::ReminderFinished(outcome) => {
            state.reminder_pending = false;
            let notice = Notice::from_outcome(&outcome);
            info!("Reminder finished: {}", notice.message());
            state.notice = Some(notice);
            DetailEffect::None
        }
        DetailAction::DismissNotice => {
            state.notice = None;
            DetailEffect::None
        }
    }
}
