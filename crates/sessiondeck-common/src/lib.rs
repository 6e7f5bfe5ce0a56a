pub mod errors;
pub mod events;
pub mod id;
pub mod notifications;
pub mod types;

pub use errors::{ConfigError, HostError, SessionDeckError, SessionError, StoreError};
pub use events::{Event, EventBus, Subscription};
pub use id::{is_valid_id, is_valid_name, new_id, MAX_ID_LENGTH, MAX_NAME_LENGTH};
pub use notifications::{NotificationLevel, Toast};
pub use types::{NavDirection, Rect, Side, WindowMetrics};

pub type Result<T> = std::result::Result<T, SessionDeckError>;
