//! Value objects - immutable types that represent domain concepts

mod history_policy;
mod ids;

pub use history_policy::{HistoryPolicy, HistoryPolicyParseError};
pub use ids::{HistoryId, IdParseError, MessageId, NotificationId, UserId};
