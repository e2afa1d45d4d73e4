//! Contact inbox - Messages sent through the public contact form and the admin dashboard counters.

use crate::{
    entities::{Agency, ContactMessage, agency, contact_message},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{debug, info};

/// Messages per page when the caller does not choose.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Number of messages shown on the dashboard.
pub const RECENT_MESSAGES: u64 = 5;

/// A message as submitted by a visitor.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Optional phone number; blank means none
    pub phone: Option<String>,
    /// Message subject
    pub subject: String,
    /// Message body
    pub message: String,
}

/// One page of the inbox, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct MessagePage {
    /// Messages on this page
    pub messages: Vec<contact_message::Model>,
    /// 1-based page number
    pub page: u64,
    /// Page size used
    pub per_page: u64,
    /// Messages in the whole inbox
    pub total_items: u64,
    /// Number of non-empty pages
    pub total_pages: u64,
}

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Agencies in the directory
    pub total_agencies: u64,
    /// Agencies listed publicly
    pub active_agencies: u64,
    /// Messages in the inbox
    pub total_messages: u64,
    /// Messages no admin has read yet
    pub unread_messages: u64,
    /// The most recent messages, newest first
    pub recent_messages: Vec<contact_message::Model>,
}

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("Contact {field} is required")));
    }
    Ok(value.to_string())
}

/// Stores a contact message as unread.
///
/// # Errors
/// Returns a validation error when name, email, subject or message is blank.
pub async fn submit_message(
    db: &DatabaseConnection,
    form: ContactForm,
) -> Result<contact_message::Model> {
    let name = required(&form.name, "name")?;
    let email = required(&form.email, "email")?;
    let subject = required(&form.subject, "subject")?;
    let body = required(&form.message, "message")?;
    let phone = form
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    let txn = db.begin().await?;
    let message = contact_message::ActiveModel {
        name: Set(name),
        email: Set(email),
        phone: Set(phone),
        subject: Set(subject),
        message: Set(body),
        created_at: Set(chrono::Utc::now().naive_utc()),
        is_read: Set(false),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!("Received contact message {} from {}", message.id, message.email);
    Ok(message)
}

/// Returns one page of messages, newest first.
///
/// Page numbers start at 1; page 0 is read as page 1 and a page size of 0 as
/// [`DEFAULT_PAGE_SIZE`]. A page past the end is empty.
pub async fn list_messages(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<MessagePage> {
    let page = page.max(1);
    let per_page = if per_page == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        per_page
    };

    let paginator = ContactMessage::find()
        .order_by_desc(contact_message::Column::CreatedAt)
        .order_by_desc(contact_message::Column::Id)
        .paginate(db, per_page);
    let counts = paginator.num_items_and_pages().await?;
    let messages = paginator.fetch_page(page - 1).await?;

    debug!(
        "Inbox page {}/{}: {} messages",
        page,
        counts.number_of_pages,
        messages.len()
    );
    Ok(MessagePage {
        messages,
        page,
        per_page,
        total_items: counts.number_of_items,
        total_pages: counts.number_of_pages,
    })
}

/// Marks a message as read. Marking twice is harmless.
pub async fn mark_read(db: &DatabaseConnection, message_id: i32) -> Result<contact_message::Model> {
    let txn = db.begin().await?;
    let message = ContactMessage::find_by_id(message_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "contact message",
            id: message_id,
        })?;

    let mut message: contact_message::ActiveModel = message.into();
    message.is_read = Set(true);
    let message = message.update(&txn).await?;
    txn.commit().await?;

    debug!("Marked contact message {} as read", message.id);
    Ok(message)
}

/// Collects the dashboard counters.
pub async fn dashboard_stats(db: &DatabaseConnection) -> Result<DashboardStats> {
    let total_agencies = Agency::find().count(db).await?;
    let active_agencies = Agency::find()
        .filter(agency::Column::IsActive.eq(true))
        .count(db)
        .await?;
    let total_messages = ContactMessage::find().count(db).await?;
    let unread_messages = ContactMessage::find()
        .filter(contact_message::Column::IsRead.eq(false))
        .count(db)
        .await?;
    let recent_messages = ContactMessage::find()
        .order_by_desc(contact_message::Column::CreatedAt)
        .order_by_desc(contact_message::Column::Id)
        .limit(RECENT_MESSAGES)
        .all(db)
        .await?;

    Ok(DashboardStats {
        total_agencies,
        active_agencies,
        total_messages,
        unread_messages,
        recent_messages,
    })
}
