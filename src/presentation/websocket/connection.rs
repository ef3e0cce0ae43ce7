//! WebSocket Connection State

use uuid::Uuid;

/// Per-connection gateway state
#[derive(Debug)]
pub struct ConnectionState {
    pub conn_id: Uuid,
    pub sequence: u64,
}

impl ConnectionState {
    pub fn new(conn_id: Uuid) -> Self {
        Self {
            conn_id,
            sequence: 0,
        }
    }

    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}
