//! Lock task feature mask computation

use lockdown_api::{ConfigurationSnapshot, FeatureMask};

/// Compute the lock task features to leave enabled for a configuration.
///
/// Each optional feature is enabled only when explicitly requested. The
/// power menu stays available unless the lock buttons flag is set, so a
/// kiosk device can still be powered off.
pub fn compute_feature_mask(snapshot: &ConfigurationSnapshot) -> FeatureMask {
    let requested = |flag: Option<bool>| flag == Some(true);

    let mut mask = FeatureMask::empty();
    mask.set(FeatureMask::HOME, requested(snapshot.kiosk_home));
    mask.set(FeatureMask::OVERVIEW, requested(snapshot.kiosk_recents));
    mask.set(
        FeatureMask::NOTIFICATIONS,
        requested(snapshot.kiosk_notifications),
    );
    mask.set(FeatureMask::SYSTEM_INFO, requested(snapshot.kiosk_system_info));
    mask.set(FeatureMask::KEYGUARD, requested(snapshot.kiosk_keyguard));
    mask.set(
        FeatureMask::GLOBAL_ACTIONS,
        !requested(snapshot.kiosk_lock_buttons),
    );
    mask
}
