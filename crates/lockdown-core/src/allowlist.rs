//! Lock task allow list computation

use lockdown_api::{AllowList, DeviceIdentity};
use lockdown_util::PackageId;

/// Build the packages permitted to run while locked.
///
/// The controller itself always comes first, then the kiosk app (when it is
/// a different package), then the settings app if requested.
pub fn compute_allow_list(
    identity: &DeviceIdentity,
    kiosk_app: Option<&PackageId>,
    include_settings: bool,
) -> AllowList {
    let mut allow_list = AllowList::starting_with(identity.self_package.clone());

    if let Some(app) = kiosk_app {
        allow_list.push(app.clone());
    }

    if include_settings {
        allow_list.push(identity.settings_package.clone());
    }

    allow_list
}
