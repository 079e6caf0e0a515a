//! Update handlers: the event router and authorization gate.
//!
//! Every inbound message or callback yields exactly one of: dropped with no
//! side effect, answered by the chat-id responder, or routed to the policy
//! evaluator / settings manager.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message, User},
};

use tracing::warn;

use vocebot_core::domain::{UserId, ANONYMOUS_ADMIN_USERNAME};

use crate::router::AppState;

mod callback;
mod message;

#[cfg(test)]
pub(crate) mod test_support;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    callback::handle_callback(q, state).await
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    message::handle_message(msg, state).await
}

/// Admin = creator/administrator in the group, or Telegram's anonymous-admin
/// identity. The anonymous identity is checked first because it never
/// resolves through a membership lookup.
pub(crate) async fn is_admin(state: &AppState, user: &User) -> bool {
    if user.username.as_deref() == Some(ANONYMOUS_ADMIN_USERNAME) {
        return true;
    }

    match state
        .messenger
        .member_status(state.group_id, UserId(user.id.0 as i64))
        .await
    {
        Ok(status) => status.is_admin(),
        Err(e) => {
            warn!(user_id = user.id.0, "membership lookup failed: {e}");
            false
        }
    }
}
