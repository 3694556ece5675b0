//! Mock platform and window service for testing

use lockdown_api::{AllowList, FeatureMask, OverlayGeometry};
use lockdown_util::PackageId;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    DevicePlatform, LaunchTarget, LockTaskMode, PlatformError, PlatformResult, SurfaceToken,
    WindowService,
};

/// API level used by the mock unless configured otherwise
pub const MOCK_DEFAULT_API_LEVEL: u32 = 33;

/// Every call the controller made against the mock platform, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    ApiLevel,
    IsDeviceOwner,
    CanDrawOverlays,
    SetLockTaskPackages(AllowList),
    SetLockTaskFeatures(FeatureMask),
    StartLockTask,
    StopLockTask,
    LockTaskMode,
    IsPackageInstalled(PackageId),
    ResolveLaunchTarget(PackageId),
    Launch(LaunchTarget),
}

impl PlatformCall {
    /// Capability queries are read-only and never change platform state
    pub fn is_capability_query(&self) -> bool {
        matches!(
            self,
            PlatformCall::ApiLevel | PlatformCall::IsDeviceOwner | PlatformCall::CanDrawOverlays
        )
    }
}

/// Installed app as known by the mock
#[derive(Debug, Clone)]
struct MockPackage {
    launchable: bool,
}

#[derive(Debug, Default)]
struct Failures {
    queries: Option<PlatformError>,
    set_packages: Option<PlatformError>,
    set_features: Option<PlatformError>,
    start_lock_task: Option<PlatformError>,
    stop_lock_task: Option<PlatformError>,
    launch: Option<PlatformError>,
}

/// Mock device platform for unit/integration testing
pub struct MockPlatform {
    api_level: Mutex<u32>,
    owner: Mutex<bool>,
    overlay_permission: Mutex<bool>,
    mode: Mutex<LockTaskMode>,
    packages: Mutex<HashMap<PackageId, MockPackage>>,
    failures: Mutex<Failures>,
    calls: Mutex<Vec<PlatformCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockPlatform {
    /// A device-owner platform on a recent API level with overlay permission
    pub fn new() -> Self {
        Self {
            api_level: Mutex::new(MOCK_DEFAULT_API_LEVEL),
            owner: Mutex::new(true),
            overlay_permission: Mutex::new(true),
            mode: Mutex::new(LockTaskMode::None),
            packages: Mutex::new(HashMap::new()),
            failures: Mutex::new(Failures::default()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_api_level(self, level: u32) -> Self {
        self.set_api_level(level);
        self
    }

    pub fn with_owner(self, owner: bool) -> Self {
        self.set_owner(owner);
        self
    }

    pub fn with_overlay_permission(self, granted: bool) -> Self {
        self.set_overlay_permission(granted);
        self
    }

    /// Register an installed app with a launch entry point
    pub fn with_app(self, package: impl Into<PackageId>) -> Self {
        lock(&self.packages).insert(package.into(), MockPackage { launchable: true });
        self
    }

    /// Register an installed app without a launch entry point
    pub fn with_headless_app(self, package: impl Into<PackageId>) -> Self {
        lock(&self.packages).insert(package.into(), MockPackage { launchable: false });
        self
    }

    pub fn set_api_level(&self, level: u32) {
        *lock(&self.api_level) = level;
    }

    pub fn set_owner(&self, owner: bool) {
        *lock(&self.owner) = owner;
    }

    pub fn set_overlay_permission(&self, granted: bool) {
        *lock(&self.overlay_permission) = granted;
    }

    /// Simulate a lock task started outside the controller (e.g. pinning)
    pub fn set_lock_task_mode(&self, mode: LockTaskMode) {
        *lock(&self.mode) = mode;
    }

    /// Make every capability query fail
    pub fn fail_queries(&self, error: Option<PlatformError>) {
        lock(&self.failures).queries = error;
    }

    pub fn fail_set_packages(&self, error: Option<PlatformError>) {
        lock(&self.failures).set_packages = error;
    }

    pub fn fail_set_features(&self, error: Option<PlatformError>) {
        lock(&self.failures).set_features = error;
    }

    pub fn fail_start_lock_task(&self, error: Option<PlatformError>) {
        lock(&self.failures).start_lock_task = error;
    }

    pub fn fail_stop_lock_task(&self, error: Option<PlatformError>) {
        lock(&self.failures).stop_lock_task = error;
    }

    pub fn fail_launch(&self, error: Option<PlatformError>) {
        lock(&self.failures).launch = error;
    }

    /// All recorded calls
    pub fn calls(&self) -> Vec<PlatformCall> {
        lock(&self.calls).clone()
    }

    /// Recorded calls other than capability queries
    pub fn privileged_calls(&self) -> Vec<PlatformCall> {
        lock(&self.calls)
            .iter()
            .filter(|c| !c.is_capability_query())
            .cloned()
            .collect()
    }

    /// Allow lists accepted by the policy authority, oldest first
    pub fn submitted_allow_lists(&self) -> Vec<AllowList> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                PlatformCall::SetLockTaskPackages(list) => Some(list.clone()),
                _ => None,
            })
            .collect()
    }

    /// Feature masks accepted by the policy authority, oldest first
    pub fn submitted_features(&self) -> Vec<FeatureMask> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                PlatformCall::SetLockTaskFeatures(mask) => Some(*mask),
                _ => None,
            })
            .collect()
    }

    /// Apps brought to the foreground
    pub fn launched(&self) -> Vec<PackageId> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                PlatformCall::Launch(target) => Some(target.package.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    pub fn current_mode(&self) -> LockTaskMode {
        *lock(&self.mode)
    }

    fn record(&self, call: PlatformCall) {
        lock(&self.calls).push(call);
    }

    fn query_failure(&self) -> PlatformResult<()> {
        let configured = lock(&self.failures).queries.clone();
        configured.map_or(Ok(()), Err)
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl DevicePlatform for MockPlatform {
    fn api_level(&self) -> PlatformResult<u32> {
        self.record(PlatformCall::ApiLevel);
        self.query_failure()?;
        Ok(*lock(&self.api_level))
    }

    fn is_device_owner(&self) -> PlatformResult<bool> {
        self.record(PlatformCall::IsDeviceOwner);
        self.query_failure()?;
        Ok(*lock(&self.owner))
    }

    fn can_draw_overlays(&self) -> PlatformResult<bool> {
        self.record(PlatformCall::CanDrawOverlays);
        self.query_failure()?;
        Ok(*lock(&self.overlay_permission))
    }

    fn set_lock_task_packages(&self, packages: &AllowList) -> PlatformResult<()> {
        if let Some(e) = lock(&self.failures).set_packages.clone() {
            return Err(e);
        }
        self.record(PlatformCall::SetLockTaskPackages(packages.clone()));
        Ok(())
    }

    fn set_lock_task_features(&self, features: FeatureMask) -> PlatformResult<()> {
        if let Some(e) = lock(&self.failures).set_features.clone() {
            return Err(e);
        }
        self.record(PlatformCall::SetLockTaskFeatures(features));
        Ok(())
    }

    fn start_lock_task(&self) -> PlatformResult<()> {
        self.record(PlatformCall::StartLockTask);
        if let Some(e) = lock(&self.failures).start_lock_task.clone() {
            return Err(e);
        }
        *lock(&self.mode) = LockTaskMode::Locked;
        Ok(())
    }

    fn stop_lock_task(&self) -> PlatformResult<()> {
        self.record(PlatformCall::StopLockTask);
        if let Some(e) = lock(&self.failures).stop_lock_task.clone() {
            return Err(e);
        }
        *lock(&self.mode) = LockTaskMode::None;
        Ok(())
    }

    fn lock_task_mode(&self) -> PlatformResult<LockTaskMode> {
        self.record(PlatformCall::LockTaskMode);
        self.query_failure()?;
        Ok(*lock(&self.mode))
    }

    fn is_package_installed(&self, package: &PackageId) -> PlatformResult<bool> {
        self.record(PlatformCall::IsPackageInstalled(package.clone()));
        Ok(lock(&self.packages).contains_key(package))
    }

    fn resolve_launch_target(&self, package: &PackageId) -> PlatformResult<Option<LaunchTarget>> {
        self.record(PlatformCall::ResolveLaunchTarget(package.clone()));
        let target = lock(&self.packages)
            .get(package)
            .filter(|p| p.launchable)
            .map(|_| LaunchTarget::new(package.clone(), format!("{}/.MainActivity", package)));
        Ok(target)
    }

    fn launch(&self, target: &LaunchTarget) -> PlatformResult<()> {
        if let Some(e) = lock(&self.failures).launch.clone() {
            return Err(e);
        }
        self.record(PlatformCall::Launch(target.clone()));
        Ok(())
    }
}

/// Mock window service; single-threaded like the real one
pub struct MockWindowService {
    status_bar_height: Cell<Option<u32>>,
    density: Cell<f32>,
    fail_add: RefCell<Option<PlatformError>>,
    next_token: Cell<u64>,
    active: RefCell<HashMap<SurfaceToken, OverlayGeometry>>,
    removed: RefCell<Vec<SurfaceToken>>,
}

impl MockWindowService {
    /// A 2.625x density display with a 63px status bar
    pub fn new() -> Self {
        Self {
            status_bar_height: Cell::new(Some(63)),
            density: Cell::new(2.625),
            fail_add: RefCell::new(None),
            next_token: Cell::new(1),
            active: RefCell::new(HashMap::new()),
            removed: RefCell::new(Vec::new()),
        }
    }

    pub fn with_status_bar_height(self, height: Option<u32>) -> Self {
        self.status_bar_height.set(height);
        self
    }

    pub fn with_density(self, density: f32) -> Self {
        self.density.set(density);
        self
    }

    pub fn fail_add(&self, error: Option<PlatformError>) {
        *self.fail_add.borrow_mut() = error;
    }

    /// Geometries of surfaces currently on screen
    pub fn active_surfaces(&self) -> Vec<OverlayGeometry> {
        self.active.borrow().values().copied().collect()
    }

    pub fn active_count(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn removed_tokens(&self) -> Vec<SurfaceToken> {
        self.removed.borrow().clone()
    }
}

impl Default for MockWindowService {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowService for MockWindowService {
    fn status_bar_height(&self) -> Option<u32> {
        self.status_bar_height.get()
    }

    fn density(&self) -> f32 {
        self.density.get()
    }

    fn add_surface(&self, geometry: &OverlayGeometry) -> PlatformResult<SurfaceToken> {
        if let Some(e) = self.fail_add.borrow().as_ref() {
            return Err(e.clone());
        }

        let token = SurfaceToken::new(self.next_token.get());
        self.next_token.set(token.raw() + 1);
        self.active.borrow_mut().insert(token, *geometry);
        Ok(token)
    }

    fn remove_surface(&self, token: SurfaceToken) -> PlatformResult<()> {
        if self.active.borrow_mut().remove(&token).is_none() {
            return Err(PlatformError::Internal(format!("{} is not attached", token)));
        }
        self.removed.borrow_mut().push(token);
        Ok(())
    }
}
