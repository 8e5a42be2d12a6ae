//! # Bot State
//!
//! In-memory, per-room interaction state: the form a user is filling in and
//! the selection they were offered. Nothing here is ever written to disk;
//! every entry dies with the interaction it belongs to.

use std::collections::HashMap;

use crate::domain::forms::{Form, Selection};

/// State for a single chat room.
#[derive(Debug, Default)]
pub struct RoomState {
    /// Active create-repo form, if the user is mid-flow.
    pub form: Option<Form>,
    /// Pending repository pick offered by a keyword lookup.
    pub selection: Option<Selection>,
}

#[derive(Debug, Default)]
pub struct BotState {
    pub rooms: HashMap<String, RoomState>,
}

impl BotState {
    pub fn get_room_state(&mut self, room_id: &str) -> &mut RoomState {
        self.rooms.entry(room_id.to_string()).or_default()
    }
}
