//! Lockdown state machine
//!
//! Entering is fail-strict: any unmet precondition or platform fault leaves
//! the device unlocked and is reported as an error. Exiting is fail-soft:
//! the controller always ends up unlocked and reports cleanup faults as a
//! degraded outcome.

use lockdown_api::{
    AllowList, ConfigurationSnapshot, Degradation, DeviceIdentity, FeatureMask, LockdownOutcome,
    LockdownState,
};
use lockdown_host_api::{DevicePlatform, LaunchTarget};
use lockdown_store::{AuditEvent, AuditEventType, Store};
use lockdown_util::{LockdownError, LockdownResult, PackageId};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::{CapabilityGate, compute_allow_list, compute_feature_mask};

/// Drives the platform lock task on behalf of the host.
///
/// Callers serialize `enter`, `refresh` and `exit`; the controller does no
/// locking of its own.
pub struct LockdownController {
    platform: Arc<dyn DevicePlatform>,
    gate: CapabilityGate,
    identity: DeviceIdentity,
    store: Arc<dyn Store>,
    state: LockdownState,
    allow_list: Option<AllowList>,
    features: Option<FeatureMask>,
}

impl LockdownController {
    pub fn new(
        platform: Arc<dyn DevicePlatform>,
        identity: DeviceIdentity,
        store: Arc<dyn Store>,
    ) -> Self {
        info!(
            self_package = %identity.self_package,
            settings_package = %identity.settings_package,
            "Lockdown controller initialized"
        );

        Self {
            gate: CapabilityGate::new(platform.clone()),
            platform,
            identity,
            store,
            state: LockdownState::Unlocked,
            allow_list: None,
            features: None,
        }
    }

    pub fn state(&self) -> LockdownState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockdownState::Locked
    }

    /// Allow list most recently accepted by the policy authority
    pub fn allow_list(&self) -> Option<&AllowList> {
        self.allow_list.as_ref()
    }

    /// Feature mask most recently accepted by the policy authority
    pub fn feature_mask(&self) -> Option<FeatureMask> {
        self.features
    }

    pub fn gate(&self) -> &CapabilityGate {
        &self.gate
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Whether the configuration asks for kiosk mode and this device can honor it
    pub fn kiosk_mode_required(&self, snapshot: &ConfigurationSnapshot) -> bool {
        if !snapshot.kiosk_mode_enabled || !self.gate.platform_supports_lockdown() {
            return false;
        }
        if !self.gate.is_owner() {
            warn!("Kiosk mode requested but the controller is not device owner");
            return false;
        }
        true
    }

    /// Whether the configured main app is installed
    pub fn is_kiosk_app_installed(&self, snapshot: &ConfigurationSnapshot) -> bool {
        let Some(app) = snapshot.main_app() else {
            return false;
        };

        match self.platform.is_package_installed(app) {
            Ok(installed) => installed,
            Err(e) => {
                warn!(package = %app, error = %e, "Package query failed");
                false
            }
        }
    }

    /// Whether the platform reports any lock task, including ones the
    /// controller did not start
    pub fn platform_lock_active(&self) -> bool {
        match self.platform.lock_task_mode() {
            Ok(mode) => mode.is_active(),
            Err(e) => {
                debug!(error = %e, "Lock task mode query failed");
                false
            }
        }
    }

    /// Resolve the launch entry point of an app
    pub fn launch_target(&self, package: &PackageId) -> Option<LaunchTarget> {
        match self.platform.resolve_launch_target(package) {
            Ok(Some(target)) => Some(target),
            Ok(None) => {
                warn!(package = %package, "No launch entry point");
                None
            }
            Err(e) => {
                warn!(package = %package, error = %e, "Failed to resolve launch entry point");
                None
            }
        }
    }

    /// Engage lockdown and bring the kiosk app to the foreground.
    ///
    /// When already locked the allow list and features are resubmitted and
    /// the kiosk app relaunched; the lock task primitive is not engaged twice.
    pub fn enter(
        &mut self,
        kiosk_app: Option<&PackageId>,
        enable_settings: bool,
        snapshot: &ConfigurationSnapshot,
    ) -> LockdownResult<LockdownOutcome> {
        if self.is_locked() {
            debug!("Already locked, refreshing instead of engaging again");
            self.refresh(kiosk_app, enable_settings, snapshot)?;
            return Ok(self.launch_kiosk_app(kiosk_app));
        }

        if let Err(e) = self.check_preconditions() {
            warn!(error = %e, "Cannot enter lockdown");
            self.reject_enter(&e);
            return Err(e);
        }

        let allow_list = compute_allow_list(&self.identity, kiosk_app, enable_settings);
        if let Err(e) = self.platform.set_lock_task_packages(&allow_list) {
            let e = LockdownError::from(e);
            error!(error = %e, allow_list = %allow_list, "Failed to set lock task packages");
            self.reject_enter(&e);
            return Err(e);
        }
        debug!(allow_list = %allow_list, "Lock task packages set");
        self.allow_list = Some(allow_list.clone());

        if self.gate.platform_supports_feature_control() {
            self.submit_features(snapshot);
        } else {
            debug!("Lock task features not supported on this platform");
        }

        if let Err(e) = self.platform.start_lock_task() {
            let e = LockdownError::from(e);
            error!(error = %e, "Failed to start lock task");
            self.reject_enter(&e);
            return Err(e);
        }

        self.state = LockdownState::Locked;
        let kiosk_app = self.foreign_kiosk_app(kiosk_app);
        info!(
            allow_list = %allow_list,
            kiosk_app = kiosk_app.map(|a| a.as_str()),
            "Lockdown entered"
        );
        self.audit(AuditEventType::LockdownEntered {
            allow_list,
            kiosk_app: kiosk_app.cloned(),
        });

        Ok(self.launch_kiosk_app(kiosk_app))
    }

    /// Resubmit the allow list (and features where supported) without
    /// touching the lock task primitive
    pub fn refresh(
        &mut self,
        kiosk_app: Option<&PackageId>,
        enable_settings: bool,
        snapshot: &ConfigurationSnapshot,
    ) -> LockdownResult<()> {
        if let Err(e) = self.check_preconditions() {
            warn!(error = %e, "Cannot refresh lockdown");
            self.reject_refresh(&e);
            return Err(e);
        }

        if !self.is_locked() {
            debug!("Refreshing allow list while unlocked");
        }

        let allow_list = compute_allow_list(&self.identity, kiosk_app, enable_settings);
        if let Err(e) = self.platform.set_lock_task_packages(&allow_list) {
            let e = LockdownError::from(e);
            error!(error = %e, allow_list = %allow_list, "Failed to update lock task packages");
            self.reject_refresh(&e);
            return Err(e);
        }

        info!(allow_list = %allow_list, "Allow list refreshed");
        self.allow_list = Some(allow_list.clone());
        self.audit(AuditEventType::AllowListRefreshed { allow_list });

        if self.gate.platform_supports_feature_control() {
            self.submit_features(snapshot);
        }

        Ok(())
    }

    /// Resubmit only the feature mask. Returns whether it was accepted.
    pub fn update_features(&mut self, snapshot: &ConfigurationSnapshot) -> bool {
        if !self.gate.platform_supports_feature_control() {
            debug!("Lock task features not supported on this platform");
            return false;
        }
        if !self.gate.is_owner() {
            debug!("Not device owner, leaving lock task features alone");
            return false;
        }
        self.submit_features(snapshot)
    }

    /// Release lockdown. Never fails: the controller ends up unlocked and any
    /// cleanup fault is reported as a degraded outcome.
    pub fn exit(&mut self) -> LockdownOutcome {
        let mut faults = Vec::new();

        match self.platform.stop_lock_task() {
            Ok(()) => debug!("Lock task stopped"),
            Err(e) => {
                error!(error = %e, "Failed to stop lock task");
                faults.push(format!("stop lock task: {}", e));
            }
        }

        if self.gate.is_owner() {
            let empty = AllowList::empty();
            match self.platform.set_lock_task_packages(&empty) {
                Ok(()) => {
                    debug!("Lock task packages cleared");
                    self.allow_list = Some(empty);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to clear lock task packages");
                    faults.push(format!("clear lock task packages: {}", e));
                }
            }
        }

        self.state = LockdownState::Unlocked;

        if faults.is_empty() {
            info!("Lockdown exited");
            self.audit(AuditEventType::LockdownExited);
            return LockdownOutcome::Success;
        }

        warn!(faults = faults.len(), "Lockdown exited with incomplete cleanup");
        self.audit(AuditEventType::ExitCleanupFailed {
            message: faults.join("; "),
        });
        self.audit(AuditEventType::LockdownExited);
        LockdownOutcome::degraded(Degradation::CleanupIncomplete { faults })
    }

    /// Lockdown tier first, then ownership
    fn check_preconditions(&self) -> LockdownResult<()> {
        if !self.gate.platform_supports_lockdown() {
            return Err(LockdownError::unsupported("lock task mode"));
        }
        if !self.gate.is_owner() {
            return Err(LockdownError::privilege("device owner"));
        }
        Ok(())
    }

    /// Best effort: a rejected mask is logged and lockdown carries on
    fn submit_features(&mut self, snapshot: &ConfigurationSnapshot) -> bool {
        let features = compute_feature_mask(snapshot);
        match self.platform.set_lock_task_features(features) {
            Ok(()) => {
                debug!(features = features.bits(), "Lock task features set");
                self.features = Some(features);
                self.audit(AuditEventType::FeaturesUpdated { features });
                true
            }
            Err(e) => {
                warn!(error = %e, features = features.bits(), "Failed to set lock task features");
                self.audit(AuditEventType::FeatureUpdateFailed {
                    message: e.to_string(),
                });
                false
            }
        }
    }

    /// The kiosk app, unless the controller itself plays that role
    fn foreign_kiosk_app<'a>(&self, kiosk_app: Option<&'a PackageId>) -> Option<&'a PackageId> {
        kiosk_app.filter(|app| **app != self.identity.self_package)
    }

    fn launch_kiosk_app(&self, kiosk_app: Option<&PackageId>) -> LockdownOutcome {
        let Some(package) = self.foreign_kiosk_app(kiosk_app) else {
            debug!("Controller is the kiosk app, nothing to launch");
            return LockdownOutcome::Success;
        };

        let Some(target) = self.launch_target(package) else {
            self.audit(AuditEventType::LaunchTargetMissing {
                package: package.clone(),
            });
            return LockdownOutcome::degraded(Degradation::LaunchTargetMissing {
                package: package.clone(),
            });
        };

        match self.platform.launch(&target) {
            Ok(()) => {
                info!(package = %package, component = %target.component, "Kiosk app launched");
                self.audit(AuditEventType::KioskAppLaunched {
                    package: package.clone(),
                });
                LockdownOutcome::Success
            }
            Err(e) => {
                let e = LockdownError::from(e);
                warn!(package = %package, error = %e, "Failed to launch kiosk app");
                self.audit(AuditEventType::LaunchFailed {
                    package: package.clone(),
                    message: e.to_string(),
                });
                LockdownOutcome::degraded(Degradation::LaunchFailed {
                    package: package.clone(),
                    kind: e.kind(),
                    message: e.to_string(),
                })
            }
        }
    }

    fn reject_enter(&self, e: &LockdownError) {
        self.audit(AuditEventType::LockdownRejected {
            kind: e.kind(),
            message: e.to_string(),
        });
    }

    fn reject_refresh(&self, e: &LockdownError) {
        self.audit(AuditEventType::RefreshRejected {
            kind: e.kind(),
            message: e.to_string(),
        });
    }

    fn audit(&self, event: AuditEventType) {
        if let Err(e) = self.store.append_audit(AuditEvent::new(event)) {
            warn!(error = %e, "Failed to append audit event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockdown_host_api::{LockTaskMode, MockPlatform, PlatformCall, PlatformError};
    use lockdown_store::SqliteStore;
    use lockdown_util::ErrorKind;

    const SELF: &str = "com.hmdm.launcher";
    const KIOSK: &str = "com.example.kiosk";

    struct Fixture {
        platform: Arc<MockPlatform>,
        store: Arc<SqliteStore>,
        controller: LockdownController,
    }

    fn fixture(platform: MockPlatform) -> Fixture {
        let platform = Arc::new(platform);
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let controller = LockdownController::new(
            platform.clone(),
            DeviceIdentity::new(SELF),
            store.clone(),
        );
        Fixture {
            platform,
            store,
            controller,
        }
    }

    fn kiosk() -> PackageId {
        PackageId::new(KIOSK)
    }

    fn audit_types(store: &SqliteStore) -> Vec<AuditEventType> {
        let mut events: Vec<_> = store
            .get_recent_audits(100)
            .unwrap()
            .into_iter()
            .map(|e| e.event)
            .collect();
        events.reverse();
        events
    }

    #[test]
    fn enter_locks_and_launches() {
        let mut f = fixture(MockPlatform::new().with_app(KIOSK));
        let snapshot = ConfigurationSnapshot::kiosk(KIOSK);

        let outcome = f
            .controller
            .enter(Some(&kiosk()), false, &snapshot)
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(f.controller.state(), LockdownState::Locked);
        assert_eq!(f.platform.current_mode(), LockTaskMode::Locked);
        assert_eq!(f.platform.launched(), vec![kiosk()]);
        assert_eq!(
            f.controller.allow_list().unwrap().packages(),
            &[PackageId::new(SELF), kiosk()]
        );
        assert_eq!(
            f.controller.feature_mask(),
            Some(FeatureMask::GLOBAL_ACTIONS)
        );
    }

    #[test]
    fn enter_submits_in_order() {
        let mut f = fixture(MockPlatform::new().with_app(KIOSK));
        f.controller
            .enter(Some(&kiosk()), true, &ConfigurationSnapshot::kiosk(KIOSK))
            .unwrap();

        let calls = f.platform.privileged_calls();
        assert!(matches!(calls[0], PlatformCall::SetLockTaskPackages(_)));
        assert!(matches!(calls[1], PlatformCall::SetLockTaskFeatures(_)));
        assert_eq!(calls[2], PlatformCall::StartLockTask);
        assert_eq!(calls[3], PlatformCall::ResolveLaunchTarget(kiosk()));
        assert!(matches!(calls[4], PlatformCall::Launch(_)));
    }

    #[test]
    fn enter_without_kiosk_app_launches_nothing() {
        let mut f = fixture(MockPlatform::new());

        let outcome = f
            .controller
            .enter(None, false, &ConfigurationSnapshot::default())
            .unwrap();

        assert!(outcome.is_success());
        assert!(f.controller.is_locked());
        assert!(f.platform.launched().is_empty());
        assert_eq!(
            f.controller.allow_list().unwrap().packages(),
            &[PackageId::new(SELF)]
        );
    }

    #[test]
    fn enter_with_self_as_kiosk_app_launches_nothing() {
        let mut f = fixture(MockPlatform::new());
        let me = PackageId::new(SELF);

        let outcome = f
            .controller
            .enter(Some(&me), false, &ConfigurationSnapshot::kiosk(SELF))
            .unwrap();

        assert!(outcome.is_success());
        assert!(!f.platform.calls().contains(&PlatformCall::ResolveLaunchTarget(me)));
    }

    #[test]
    fn unsupported_tier_rejected_first() {
        let mut f = fixture(MockPlatform::new().with_api_level(19).with_owner(false));

        let err = f
            .controller
            .enter(Some(&kiosk()), false, &ConfigurationSnapshot::kiosk(KIOSK))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PlatformUnsupported);
        assert_eq!(f.controller.state(), LockdownState::Unlocked);
        assert!(f.platform.privileged_calls().is_empty());
    }

    #[test]
    fn not_owner_is_privilege_denied() {
        let mut f = fixture(MockPlatform::new().with_owner(false));

        let err = f
            .controller
            .enter(Some(&kiosk()), false, &ConfigurationSnapshot::kiosk(KIOSK))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PrivilegeDenied);
        assert!(f.platform.privileged_calls().is_empty());
        assert!(matches!(
            audit_types(&f.store).last(),
            Some(AuditEventType::LockdownRejected {
                kind: ErrorKind::PrivilegeDenied,
                ..
            })
        ));
    }

    #[test]
    fn security_fault_keeps_unlocked() {
        let mut f = fixture(MockPlatform::new().with_app(KIOSK));
        f.platform
            .fail_start_lock_task(Some(PlatformError::SecurityViolation(
                "not allowlisted".into(),
            )));

        let err = f
            .controller
            .enter(Some(&kiosk()), false, &ConfigurationSnapshot::kiosk(KIOSK))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PlatformSecurityViolation);
        assert_eq!(f.controller.state(), LockdownState::Unlocked);
        assert!(f.platform.launched().is_empty());
    }

    #[test]
    fn rejected_allow_list_aborts_enter() {
        let mut f = fixture(MockPlatform::new());
        f.platform
            .fail_set_packages(Some(PlatformError::Internal("binder died".into())));

        let err = f
            .controller
            .enter(None, false, &ConfigurationSnapshot::default())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnknownPlatformFault);
        assert!(!f.controller.is_locked());
        assert!(!f.platform.calls().contains(&PlatformCall::StartLockTask));
        assert!(f.controller.allow_list().is_none());
    }

    #[test]
    fn rejected_features_do_not_block_enter() {
        let mut f = fixture(MockPlatform::new());
        f.platform
            .fail_set_features(Some(PlatformError::Internal("unsupported".into())));

        let outcome = f
            .controller
            .enter(None, false, &ConfigurationSnapshot::default())
            .unwrap();

        assert!(outcome.is_success());
        assert!(f.controller.is_locked());
        assert_eq!(f.controller.feature_mask(), None);
        assert!(audit_types(&f.store)
            .iter()
            .any(|e| matches!(e, AuditEventType::FeatureUpdateFailed { .. })));
    }

    #[test]
    fn missing_launch_target_is_degraded() {
        let mut f = fixture(MockPlatform::new().with_headless_app(KIOSK));

        let outcome = f
            .controller
            .enter(Some(&kiosk()), false, &ConfigurationSnapshot::kiosk(KIOSK))
            .unwrap();

        assert_eq!(
            outcome.degradation(),
            Some(&Degradation::LaunchTargetMissing { package: kiosk() })
        );
        assert!(f.controller.is_locked());
    }

    #[test]
    fn launch_fault_is_degraded() {
        let mut f = fixture(MockPlatform::new().with_app(KIOSK));
        f.platform
            .fail_launch(Some(PlatformError::SecurityViolation("background start".into())));

        let outcome = f
            .controller
            .enter(Some(&kiosk()), false, &ConfigurationSnapshot::kiosk(KIOSK))
            .unwrap();

        assert!(matches!(
            outcome.degradation(),
            Some(Degradation::LaunchFailed {
                kind: ErrorKind::PlatformSecurityViolation,
                ..
            })
        ));
        assert!(f.controller.is_locked());
    }

    #[test]
    fn enter_while_locked_does_not_restart_lock_task() {
        let mut f = fixture(MockPlatform::new().with_app(KIOSK));
        let snapshot = ConfigurationSnapshot::kiosk(KIOSK);

        f.controller.enter(Some(&kiosk()), false, &snapshot).unwrap();
        f.platform.clear_calls();

        let outcome = f.controller.enter(Some(&kiosk()), true, &snapshot).unwrap();

        assert!(outcome.is_success());
        assert!(!f.platform.calls().contains(&PlatformCall::StartLockTask));
        assert_eq!(f.controller.allow_list().unwrap().len(), 3);
        assert_eq!(f.platform.launched(), vec![kiosk()]);
    }

    #[test]
    fn exit_clears_allow_list() {
        let mut f = fixture(MockPlatform::new());
        f.controller
            .enter(None, false, &ConfigurationSnapshot::default())
            .unwrap();

        let outcome = f.controller.exit();

        assert!(outcome.is_success());
        assert_eq!(f.controller.state(), LockdownState::Unlocked);
        assert_eq!(f.platform.current_mode(), LockTaskMode::None);
        assert_eq!(
            f.platform.submitted_allow_lists().last(),
            Some(&AllowList::empty())
        );
        assert_eq!(audit_types(&f.store).last(), Some(&AuditEventType::LockdownExited));
    }

    #[test]
    fn exit_is_fail_soft() {
        let mut f = fixture(MockPlatform::new());
        f.controller
            .enter(None, false, &ConfigurationSnapshot::default())
            .unwrap();
        f.platform
            .fail_stop_lock_task(Some(PlatformError::Internal("not in lock task".into())));
        f.platform
            .fail_set_packages(Some(PlatformError::SecurityViolation("revoked".into())));

        let outcome = f.controller.exit();

        assert_eq!(f.controller.state(), LockdownState::Unlocked);
        match outcome.degradation() {
            Some(Degradation::CleanupIncomplete { faults }) => assert_eq!(faults.len(), 2),
            other => panic!("unexpected outcome: {:?}", other),
        }
        // Last accepted list is still the one from enter
        assert_eq!(f.controller.allow_list().unwrap().len(), 1);
    }

    #[test]
    fn exit_without_ownership_skips_clear() {
        let mut f = fixture(MockPlatform::new().with_owner(false));

        let outcome = f.controller.exit();

        assert!(outcome.is_success());
        assert_eq!(f.platform.privileged_calls(), vec![PlatformCall::StopLockTask]);
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut f = fixture(MockPlatform::new());
        let snapshot = ConfigurationSnapshot {
            kiosk_home: Some(true),
            ..ConfigurationSnapshot::kiosk(KIOSK)
        };

        f.controller.refresh(Some(&kiosk()), true, &snapshot).unwrap();
        f.controller.refresh(Some(&kiosk()), true, &snapshot).unwrap();

        let lists = f.platform.submitted_allow_lists();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0], lists[1]);

        let features = f.platform.submitted_features();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0], features[1]);
        assert!(!f.platform.calls().contains(&PlatformCall::StartLockTask));
    }

    #[test]
    fn refresh_rejected_without_ownership() {
        let mut f = fixture(MockPlatform::new().with_owner(false));

        let err = f
            .controller
            .refresh(None, false, &ConfigurationSnapshot::default())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PrivilegeDenied);
        assert!(f.platform.privileged_calls().is_empty());
    }

    #[test]
    fn refresh_keeps_lock_state() {
        let mut f = fixture(MockPlatform::new().with_app(KIOSK));
        let snapshot = ConfigurationSnapshot::kiosk(KIOSK);
        f.controller.enter(Some(&kiosk()), false, &snapshot).unwrap();

        f.controller.refresh(None, true, &snapshot).unwrap();

        assert!(f.controller.is_locked());
        assert_eq!(
            f.controller.allow_list().unwrap().packages(),
            &[PackageId::new(SELF), PackageId::new("com.android.settings")]
        );
    }

    #[test]
    fn update_features_requires_tier_and_ownership() {
        let snapshot = ConfigurationSnapshot {
            kiosk_notifications: Some(true),
            ..Default::default()
        };

        let mut f = fixture(MockPlatform::new().with_api_level(27));
        assert!(!f.controller.update_features(&snapshot));
        assert!(f.platform.submitted_features().is_empty());

        let mut f = fixture(MockPlatform::new().with_owner(false));
        assert!(!f.controller.update_features(&snapshot));
        assert!(f.platform.submitted_features().is_empty());

        let mut f = fixture(MockPlatform::new());
        assert!(f.controller.update_features(&snapshot));
        assert_eq!(
            f.platform.submitted_features(),
            vec![FeatureMask::NOTIFICATIONS | FeatureMask::GLOBAL_ACTIONS]
        );
    }

    #[test]
    fn kiosk_mode_required_checks_capabilities() {
        let f = fixture(MockPlatform::new());
        assert!(f.controller.kiosk_mode_required(&ConfigurationSnapshot::kiosk(KIOSK)));
        assert!(!f.controller.kiosk_mode_required(&ConfigurationSnapshot::default()));

        f.platform.set_owner(false);
        assert!(!f.controller.kiosk_mode_required(&ConfigurationSnapshot::kiosk(KIOSK)));

        f.platform.set_owner(true);
        f.platform.set_api_level(20);
        assert!(!f.controller.kiosk_mode_required(&ConfigurationSnapshot::kiosk(KIOSK)));
    }

    #[test]
    fn kiosk_app_installation() {
        let f = fixture(MockPlatform::new().with_headless_app(KIOSK));
        assert!(f.controller.is_kiosk_app_installed(&ConfigurationSnapshot::kiosk(KIOSK)));
        assert!(!f
            .controller
            .is_kiosk_app_installed(&ConfigurationSnapshot::kiosk("com.example.other")));
        assert!(!f.controller.is_kiosk_app_installed(&ConfigurationSnapshot::default()));
    }

    #[test]
    fn platform_lock_reflects_external_pinning() {
        let f = fixture(MockPlatform::new());
        assert!(!f.controller.platform_lock_active());

        f.platform.set_lock_task_mode(LockTaskMode::Pinned);
        assert!(f.controller.platform_lock_active());
        assert_eq!(f.controller.state(), LockdownState::Unlocked);

        f.platform
            .fail_queries(Some(PlatformError::ServiceUnavailable("activity manager".into())));
        assert!(!f.controller.platform_lock_active());
    }

    #[test]
    fn enter_is_audited() {
        let mut f = fixture(MockPlatform::new().with_app(KIOSK));
        f.controller
            .enter(Some(&kiosk()), false, &ConfigurationSnapshot::kiosk(KIOSK))
            .unwrap();

        let events = audit_types(&f.store);
        assert!(matches!(events[0], AuditEventType::FeaturesUpdated { .. }));
        assert_eq!(
            events[1],
            AuditEventType::LockdownEntered {
                allow_list: f.controller.allow_list().unwrap().clone(),
                kiosk_app: Some(kiosk()),
            }
        );
        assert_eq!(events[2], AuditEventType::KioskAppLaunched { package: kiosk() });
    }
}
