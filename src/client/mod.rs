//! Chat client
//!
//! The client side of the relay protocol: [`ChatSession`] owns the conversation and
//! the visible transcript, [`RelayClient`] carries one turn to the proxy, and [`TurnRunner`] keeps
//! several turns in flight at once.

mod http;
mod runner;
mod session;

pub use http::{ClientError, RelayClient};
pub use runner::{OnResolved, TurnRunner};
pub use session::{ChatSession, Entry, EntryKind, PendingTurn, TurnId, PENDING_TEXT};
