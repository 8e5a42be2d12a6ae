//! # Help Command

use anyhow::Result;

use crate::domain::traits::ChatProvider;
use crate::strings;

pub async fn handle_help(chat: &impl ChatProvider, prefix: char) -> Result<()> {
    chat.send_message(&strings::help::main_help(prefix))
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}
