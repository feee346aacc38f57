pub mod category;
pub mod error;
pub mod feature;
pub mod oracle;
pub mod snapshot;

pub use crate::error::PermissionError;
pub use crate::feature::{FeatureRequest, FeatureSettingState, NotificationFeature};
pub use crate::oracle::PermissionVerdict;
pub use crate::snapshot::{LegacySnapshot, ModernSnapshot, PermissionSnapshot};
