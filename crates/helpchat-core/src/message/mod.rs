//! Chat messages, backend reply fragments, and the reconciliation between them.

pub mod fragment;
pub mod model;
pub mod reconcile;

pub use fragment::{CustomPayload, FragmentKind, NormalizedFragment, ProfileUpdate, ReplyFragment};
pub use model::{BOT_SENDER, Button, Invoice, Message, Sender};
pub use reconcile::{FALLBACK_TEXT, Reconciliation, SendOrigin, fallback_buttons, reconcile};
