//! Domain services for the push platform.
//!
//! Services contain the dispatch and reconciliation logic and the traits of
//! the collaborators they depend on.

pub mod connector;
pub mod dispatcher;
pub mod memory;
pub mod push;
pub mod recipient;
pub mod reconciler;
pub mod statistics;
pub mod store;

pub use connector::{AckPolicy, MockPushConnector, PushConnector};
pub use dispatcher::{PushDispatcher, ADMIN_SENDER};
pub use memory::InMemoryPushStore;
pub use push::{AdminPushOutcome, PushService, ServerPushOutcome};
pub use recipient::{RecipientResolver, ResolvedRecipients};
pub use reconciler::{
    no_recipient_record, reconcile, DeliveryReconciler, PendingDelivery, Reconciliation,
    NO_DEVICES_REMARK, PUSH_SUCCEEDED_REMARK,
};
pub use statistics::{build_chart, StatisticsAggregator, EMPTY_WINDOW_DAYS};
pub use store::{ApplicationStore, DeliveryStore, MessageStore, StoreResult};
