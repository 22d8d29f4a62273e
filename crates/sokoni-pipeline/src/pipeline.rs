// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The response pipeline: gates, generation, and bookkeeping for one
//! inbound message.
//!
//! Gates run strictly in order and short-circuit on first failure:
//! log inbound -> stop keywords -> rate window -> global breaker ->
//! quiet hours -> engagement/opt-out -> contact-reminder side effect ->
//! history -> generation -> typing delay -> send + bookkeeping.
//!
//! Only the rate-limit refusal is visible to the contact; every other gate
//! terminates silently. Generation failures become a generic fallback reply
//! rather than silence. Each inbound message is processed independently;
//! counter atomicity lives in the storage layer, not here.

use std::sync::Arc;

use sokoni_core::clock::{format_utc, Clock};
use sokoni_core::types::{
    Contact, ContactCard, Direction, HistoryTurn, InboundMessage, LogEntry, Presence,
    ReplyRequest,
};
use sokoni_core::{ResponderAdapter, SokoniError, StorageAdapter, TransportAdapter};
use tracing::{debug, error, info, warn};

use crate::breaker::GlobalCircuitBreaker;
use crate::limits::HISTORY_LIMIT;
use crate::{delay, engagement, keywords, rate_window, reminder};

/// Reply substituted when generation fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble answering right now. Please try again in a little while.";

/// Confirmation sent once when a contact opts out.
pub const OPT_OUT_CONFIRMATION: &str =
    "You won't receive any more automated messages from us. Our team still reads \
     every message at this number during business hours.";

/// Orchestrates the gate sequence for each inbound message.
pub struct ResponsePipeline {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    transport: Arc<dyn TransportAdapter + Send + Sync>,
    responder: Arc<dyn ResponderAdapter + Send + Sync>,
    clock: Arc<dyn Clock>,
    breaker: GlobalCircuitBreaker,
    /// vCard sent with the save-my-contact nudge.
    store_card: ContactCard,
    /// Disabled in tests to keep them fast; the computed delay is still
    /// recorded on the outbound log row.
    simulate_delay: bool,
}

impl ResponsePipeline {
    pub fn new(
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        transport: Arc<dyn TransportAdapter + Send + Sync>,
        responder: Arc<dyn ResponderAdapter + Send + Sync>,
        clock: Arc<dyn Clock>,
        store_card: ContactCard,
    ) -> Self {
        let breaker = GlobalCircuitBreaker::new(storage.clone(), clock.clone());
        Self {
            storage,
            transport,
            responder,
            clock,
            breaker,
            store_card,
            simulate_delay: true,
        }
    }

    /// Skips the typing-delay sleep. Test use only.
    pub fn without_simulated_delay(mut self) -> Self {
        self.simulate_delay = false;
        self
    }

    /// Processes one inbound message through the full gate sequence.
    ///
    /// Gate rejections are not errors; only storage failures propagate,
    /// aborting this message's processing with no retry.
    pub async fn handle_inbound(&self, msg: InboundMessage) -> Result<(), SokoniError> {
        let contact = self.resolve_or_register(&msg).await?;

        // 1. Log inbound -- always, regardless of downstream outcome.
        self.append_exchange(Some(&contact.id), Direction::Inbound, &msg.body, None, false)
            .await?;
        let now = format_utc(self.clock.now_utc());
        self.storage
            .touch_last_interaction(&contact.id, &now)
            .await?;

        // 2. Stop keywords -- compliance path, bypasses every other gate.
        if keywords::is_stop_request(&msg.body) {
            return self.handle_opt_out(&contact, &msg.address).await;
        }

        // 3. Per-contact rate window. The refusal notice is the only
        // user-visible gate rejection.
        let decision = rate_window::check(&contact, self.clock.today());
        if !decision.allowed {
            debug!(user_id = contact.id.as_str(), "daily rate limit reached");
            let notice = decision
                .notice
                .unwrap_or_else(|| "Daily limit reached, please try again tomorrow.".to_string());
            match self.transport.send_text(&msg.address, &notice).await {
                Ok(_) => {
                    self.append_exchange(
                        Some(&contact.id),
                        Direction::Outbound,
                        &notice,
                        None,
                        true,
                    )
                    .await?;
                }
                Err(e) => error!(error = %e, "failed to send rate-limit notice"),
            }
            return Ok(());
        }

        // 4. Global breaker -- silent: this protects the account, not the user.
        if !self.breaker.is_open().await? {
            info!("global daily send ceiling reached, dropping reply");
            return Ok(());
        }

        // 5. Quiet hours -- silent drop, never queued.
        let hour = self.clock.local_hour();
        if crate::quiet_hours::is_quiet(hour) {
            debug!(hour, "quiet hours, dropping reply");
            return Ok(());
        }

        // 6. Engagement / opt-out.
        if contact.opted_out {
            debug!(user_id = contact.id.as_str(), "contact opted out, dropping reply");
            return Ok(());
        }
        if !engagement::is_engaged(contact.engagement_score) {
            debug!(
                user_id = contact.id.as_str(),
                score = contact.engagement_score,
                "contact below engagement threshold, dropping reply"
            );
            return Ok(());
        }

        // 7. Contact-reminder side effect, independent of the response flow.
        if reminder::should_send(&contact, self.clock.today()) {
            self.send_contact_reminder(&contact, &msg.address).await;
        }

        // 8. Conversation history for the responder.
        let history = self
            .storage
            .recent_log_for_contact(&contact.id, HISTORY_LIMIT)
            .await?
            .into_iter()
            .map(|entry| HistoryTurn {
                direction: entry.direction,
                body: entry.body,
            })
            .collect();

        // 9. Generation; failures become the fallback reply, never silence.
        let request = ReplyRequest {
            contact_name: contact.display_name.clone(),
            history,
            body: msg.body.clone(),
            media: msg.media.clone(),
        };
        let reply = match self.responder.generate(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "reply generation failed, using fallback");
                FALLBACK_REPLY.to_string()
            }
        };

        // 10. Simulated typing delay, spent holding a presence signal.
        let typing_delay = delay::response_delay(reply.len());
        if self.simulate_delay {
            if let Err(e) = self
                .transport
                .set_presence(&msg.address, Presence::Composing)
                .await
            {
                debug!(error = %e, "failed to set typing presence");
            }
            tokio::time::sleep(typing_delay).await;
            if let Err(e) = self
                .transport
                .set_presence(&msg.address, Presence::Paused)
                .await
            {
                debug!(error = %e, "failed to clear typing presence");
            }
        }

        // 11. Send + bookkeeping. At-most-once: a failed send is logged
        // and never retried.
        match self.transport.send_text(&msg.address, &reply).await {
            Ok(_) => {
                let today = self.clock.today().format("%Y-%m-%d").to_string();
                self.storage
                    .record_outbound_sent(&contact.id, &today)
                    .await?;
                self.storage
                    .adjust_engagement(
                        &contact.id,
                        engagement::delta(engagement::Adjustment::Reply),
                    )
                    .await?;
                self.append_exchange(
                    Some(&contact.id),
                    Direction::Outbound,
                    &reply,
                    Some(typing_delay.as_millis() as i64),
                    false,
                )
                .await?;
                info!(
                    user_id = contact.id.as_str(),
                    delay_ms = typing_delay.as_millis() as u64,
                    "reply sent"
                );
            }
            Err(e) => error!(error = %e, "transport send failed, reply dropped"),
        }

        Ok(())
    }

    /// Looks up the contact by address, auto-registering unknown senders
    /// with a full engagement score.
    async fn resolve_or_register(
        &self,
        msg: &InboundMessage,
    ) -> Result<Contact, SokoniError> {
        if let Some(existing) = self.storage.find_contact_by_address(&msg.address).await? {
            return Ok(existing);
        }

        let contact = Contact {
            id: uuid::Uuid::new_v4().to_string(),
            address: msg.address.clone(),
            display_name: msg.push_name.clone(),
            daily_message_count: 0,
            last_message_date: None,
            engagement_score: 100,
            opted_out: false,
            contact_reminder_count: 0,
            // Stamped at registration so the first save-my-contact nudge
            // waits out the full spacing window instead of firing on the
            // very first exchange.
            last_contact_reminder_date: Some(self.clock.today().format("%Y-%m-%d").to_string()),
            last_interaction_at: None,
            created_at: format_utc(self.clock.now_utc()),
        };
        self.storage.create_contact(&contact).await?;
        info!(
            user_id = contact.id.as_str(),
            address = contact.address.as_str(),
            "registered new contact"
        );
        Ok(contact)
    }

    /// Terminal opt-out: set the flag, confirm once, log, stop.
    ///
    /// The confirmation bypasses the rate window, breaker, quiet hours, and
    /// engagement gates, and does not advance the rate counter -- it is a
    /// compliance action, not a marketing message. A repeated stop request
    /// from an already-opted-out contact gets no second confirmation.
    async fn handle_opt_out(
        &self,
        contact: &Contact,
        address: &str,
    ) -> Result<(), SokoniError> {
        if contact.opted_out {
            debug!(user_id = contact.id.as_str(), "repeat stop request, already opted out");
            return Ok(());
        }

        self.storage.mark_opted_out(&contact.id).await?;
        info!(user_id = contact.id.as_str(), "contact opted out");

        match self.transport.send_text(address, OPT_OUT_CONFIRMATION).await {
            Ok(_) => {
                self.append_exchange(
                    Some(&contact.id),
                    Direction::Outbound,
                    OPT_OUT_CONFIRMATION,
                    None,
                    false,
                )
                .await?;
            }
            Err(e) => error!(error = %e, "failed to send opt-out confirmation"),
        }
        Ok(())
    }

    /// Sends the save-my-contact nudge with the store's vCard.
    ///
    /// Failures here are logged and swallowed: the nudge must never block
    /// the reply it rides along with.
    async fn send_contact_reminder(&self, contact: &Contact, address: &str) {
        let nudge = format!(
            "Quick tip: save {} in your contacts so our replies always reach you!",
            self.store_card.display_name
        );

        if let Err(e) = self.transport.send_text(address, &nudge).await {
            warn!(error = %e, "failed to send contact-reminder nudge");
            return;
        }
        if let Err(e) = self
            .transport
            .send_contact_card(address, &self.store_card)
            .await
        {
            warn!(error = %e, "failed to send contact card");
        }

        let today = self.clock.today().format("%Y-%m-%d").to_string();
        if let Err(e) = self
            .storage
            .record_contact_reminder(&contact.id, &today)
            .await
        {
            error!(error = %e, "failed to record contact reminder");
            return;
        }
        if let Err(e) = self
            .append_exchange(Some(&contact.id), Direction::Outbound, &nudge, None, false)
            .await
        {
            error!(error = %e, "failed to log contact reminder");
        }
        debug!(user_id = contact.id.as_str(), "contact reminder sent");
    }

    /// Appends one immutable log row stamped with the pipeline clock.
    async fn append_exchange(
        &self,
        user_id: Option<&str>,
        direction: Direction,
        body: &str,
        response_delay_ms: Option<i64>,
        was_throttled: bool,
    ) -> Result<(), SokoniError> {
        let entry = LogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.map(String::from),
            direction,
            body: body.to_string(),
            created_at: format_utc(self.clock.now_utc()),
            response_delay_ms,
            was_throttled,
        };
        self.storage.append_log(&entry).await
    }
}
