// src/cli/inbox.rs — Read contact-form messages from the store

use crate::infra::config::StoreConfig;
use crate::memory::open_store;
use crate::util::preview;

pub fn run_inbox(
    config: &StoreConfig,
    unread_only: bool,
    mark_read: Option<i64>,
) -> anyhow::Result<()> {
    let store = open_store(config)?;

    if let Some(id) = mark_read {
        if store.mark_contact_read(id)? {
            println!("Marked message {id} as read.");
        } else {
            println!("No message with id {id}.");
        }
        return Ok(());
    }

    let messages = store.query_contact_messages(unread_only)?;
    if messages.is_empty() {
        println!("Inbox is empty.");
        return Ok(());
    }

    for m in &messages {
        let flag = if m.read { ' ' } else { '*' };
        println!("{flag} #{} {} <{}> {}", m.id, m.name, m.email, m.created_at);
        println!("    {}", m.subject);
        println!("    {}", preview(&m.message, 120));
    }
    println!();
    println!("{} message(s)", messages.len());
    Ok(())
}
