//! Version negotiation feature gates (spec §4.3, C4).
//!
//! The broker-client collaborator's `api_version(apiKey, maxVersion)`
//! already computes `min(clientMax, brokerMax)` (spec §1), so there is no
//! min-selection left for this module to do. What remains is gating
//! individual *features* that only exist from some version onward —
//! e.g. `CreateTopics` assignments only round-trip replica placement
//! correctly from v0 but `validate_only` needs v1+ — by comparing the
//! already-negotiated version against the version the feature requires
//! and raising [`AdminError::IncompatibleBrokerVersion`] when it's too low.

use crate::error::AdminError;
use crate::registry::{self, ApiKey};

/// Resolves the version actually used for `api_key`, by combining this
/// crate's registry ceiling with the broker client's own min-selection.
pub fn negotiate(broker: &dyn Fn(i16, i16) -> i16, api_key: ApiKey) -> i16 {
    let ceiling = registry::highest_supported(api_key);
    broker(api_key.wire_value(), ceiling)
}

/// Raises [`AdminError::IncompatibleBrokerVersion`] if `negotiated_version`
/// is lower than `required_version` for `feature` on `op`.
pub fn require_feature(
    op: &'static str,
    feature: &'static str,
    required_version: i16,
    negotiated_version: i16,
) -> Result<(), AdminError> {
    if negotiated_version < required_version {
        Err(AdminError::IncompatibleBrokerVersion {
            op,
            feature,
            required_version,
            negotiated_version,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiate_applies_broker_min_selection() {
        let version = negotiate(&|_key, max| max.min(1), ApiKey::CreateTopics);
        assert_eq!(version, 1);
    }

    #[test]
    fn require_feature_rejects_too_old_broker() {
        let err = require_feature("createTopics", "validateOnly", 1, 0).unwrap_err();
        assert!(matches!(err, AdminError::IncompatibleBrokerVersion { .. }));
    }

    #[test]
    fn require_feature_accepts_exact_match() {
        assert!(require_feature("createTopics", "validateOnly", 1, 1).is_ok());
    }
}
