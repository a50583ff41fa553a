//! The per-request gate: identity, tier, flags, quota.

use std::sync::Arc;

use super::GateError;
use crate::domain::flags::{Flag, FlagResolver, FlagSet, PartialFlags};
use crate::domain::foundation::{MonthKey, UserId};
use crate::domain::membership::{Tier, TierLimits};
use crate::domain::usage::UsageLedger;
use crate::ports::{TierDirectory, TierDirectoryError};

/// What an endpoint demands of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateOptions {
    pub required_flag: Option<Flag>,
    pub require_auth: bool,
    pub enforce_usage_limits: bool,
}

impl GateOptions {
    /// Endpoint that needs `flag` on.
    pub fn requiring(flag: Flag) -> Self {
        Self {
            required_flag: Some(flag),
            ..Self::default()
        }
    }

    pub fn authenticated(mut self) -> Self {
        self.require_auth = true;
        self
    }

    pub fn metered(mut self) -> Self {
        self.enforce_usage_limits = true;
        self
    }
}

/// What the gate knows about the caller.
#[derive(Debug, Clone, Default)]
pub struct GateRequest {
    pub user_id: Option<UserId>,
    /// Decoded debug override, if the transport carried one.
    pub overrides: Option<PartialFlags>,
}

impl GateRequest {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            overrides: None,
        }
    }

    pub fn with_overrides(mut self, overrides: Option<PartialFlags>) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Outcome of a passed gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateContext {
    pub user_id: Option<UserId>,
    /// `None` for anonymous callers.
    pub tier: Option<Tier>,
    pub flags: FlagSet,
}

/// A signed-in user's tier as the gate sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierStanding {
    /// A recognised tier. Also the lowest tier when none is assigned or
    /// the directory could not be read.
    Known(Tier),
    /// A stored tier name this build does not recognise.
    Unrecognised(String),
}

impl TierStanding {
    /// Tier whose limits apply. Unrecognised names are metered as the lowest tier.
    pub fn billing_tier(&self) -> Tier {
        match self {
            Self::Known(tier) => *tier,
            Self::Unrecognised(_) => Tier::lowest(),
        }
    }

    /// Tier whose flag preset applies, `None` for an unrecognised name.
    pub fn preset_tier(&self) -> Option<Tier> {
        match self {
            Self::Known(tier) => Some(*tier),
            Self::Unrecognised(_) => None,
        }
    }
}

/// Decides whether a request may proceed. Never records usage.
#[derive(Clone)]
pub struct ApiGate {
    resolver: Arc<FlagResolver>,
    tiers: Arc<dyn TierDirectory>,
    usage: UsageLedger,
}

impl ApiGate {
    pub fn new(resolver: Arc<FlagResolver>, tiers: Arc<dyn TierDirectory>, usage: UsageLedger) -> Self {
        Self {
            resolver,
            tiers,
            usage,
        }
    }

    pub fn resolver(&self) -> &Arc<FlagResolver> {
        &self.resolver
    }

    pub fn usage(&self) -> &UsageLedger {
        &self.usage
    }

    /// Runs the checks in order, stopping at the first refusal:
    ///
    /// 1. `require_auth` without identity → 401, nothing else consulted
    /// 2. tier lookup (lowest tier when missing or failing)
    /// 3. flag resolution, with no preset for an unrecognised tier name
    /// 4. global `auth` flag without identity → 401
    /// 5. required flag off → 403 `feature_disabled`
    /// 6. metered endpoint, `usageLimits` on, finite quota exhausted → 403 `limit_exceeded`
    pub async fn check(
        &self,
        request: &GateRequest,
        options: GateOptions,
    ) -> Result<GateContext, GateError> {
        if options.require_auth && request.user_id.is_none() {
            return Err(GateError::AuthenticationRequired);
        }

        let standing = match &request.user_id {
            Some(user_id) => Some(self.standing_of(user_id).await),
            None => None,
        };

        let flags = self.resolve_flags(standing.as_ref(), request.overrides.as_ref());
        let tier = standing.as_ref().map(TierStanding::billing_tier);

        if flags.auth && request.user_id.is_none() {
            return Err(GateError::AuthenticationRequired);
        }

        if let Some(flag) = options.required_flag {
            if !flags.get(flag) {
                tracing::debug!(feature = %flag, "Gate refused: feature disabled");
                return Err(GateError::FeatureDisabled { feature: flag });
            }
        }

        if options.enforce_usage_limits && flags.usage_limits {
            if let (Some(user_id), Some(tier)) = (&request.user_id, tier) {
                self.check_quota(user_id, tier).await?;
            }
        }

        Ok(GateContext {
            user_id: request.user_id.clone(),
            tier,
            flags,
        })
    }

    /// Flags for a caller whose tier standing is already known.
    pub fn resolve_flags(
        &self,
        standing: Option<&TierStanding>,
        overrides: Option<&PartialFlags>,
    ) -> FlagSet {
        match standing {
            Some(TierStanding::Unrecognised(name)) => {
                self.resolver.resolve_named(Some(name.as_str()), overrides)
            }
            Some(TierStanding::Known(tier)) => self.resolver.resolve(Some(*tier), overrides),
            None => self.resolver.resolve(None, overrides),
        }
    }

    /// Looks up the user's tier. Missing or unreadable entries count as the lowest tier.
    pub async fn standing_of(&self, user_id: &UserId) -> TierStanding {
        match self.tiers.tier_for(user_id).await {
            Ok(Some(tier)) => TierStanding::Known(tier),
            Ok(None) => TierStanding::Known(Tier::lowest()),
            Err(TierDirectoryError::UnknownTier { value, .. }) => TierStanding::Unrecognised(value),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Tier lookup failed, assuming lowest tier");
                TierStanding::Known(Tier::lowest())
            }
        }
    }

    /// The tier whose limits apply to the user.
    pub async fn tier_of(&self, user_id: &UserId) -> Tier {
        self.standing_of(user_id).await.billing_tier()
    }

    async fn check_quota(&self, user_id: &UserId, tier: Tier) -> Result<(), GateError> {
        let limits = TierLimits::for_tier(tier);
        let Some(limit) = limits.monthly_analyses else {
            return Ok(());
        };

        let used = self.usage.count(user_id, MonthKey::current()).await;
        if limits.analysis_limit_reached(used) {
            tracing::info!(user_id = %user_id, tier = %tier, used, limit, "Gate refused: monthly limit reached");
            return Err(GateError::LimitExceeded { tier, limit, used });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tiers::InMemoryTierDirectory;
    use crate::adapters::usage::InMemoryUsageStore;
    use crate::domain::flags::OverrideCodec;
    use async_trait::async_trait;

    struct Fixture {
        tiers: Arc<InMemoryTierDirectory>,
        store: Arc<InMemoryUsageStore>,
        gate: ApiGate,
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn fixture_with(defaults: FlagSet) -> Fixture {
        let tiers = Arc::new(InMemoryTierDirectory::new());
        let store = Arc::new(InMemoryUsageStore::new());
        let resolver = FlagResolver::new(defaults).with_overrides(OverrideCodec::unsigned());
        let gate = ApiGate::new(
            Arc::new(resolver),
            tiers.clone(),
            UsageLedger::new(store.clone()),
        );
        Fixture { tiers, store, gate }
    }

    fn fixture() -> Fixture {
        fixture_with(FlagSet::baseline())
    }

    // ══════════════════════════════════════════════════════════════
    // Authentication
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn require_auth_short_circuits_before_any_lookup() {
        let fx = fixture();
        let options = GateOptions::requiring(Flag::BidAnalysis).authenticated().metered();

        let result = fx.gate.check(&GateRequest::anonymous(), options).await;

        assert_eq!(result, Err(GateError::AuthenticationRequired));
        assert_eq!(fx.tiers.lookup_count(), 0);
        assert_eq!(fx.store.read_count(), 0);
    }

    #[tokio::test]
    async fn global_auth_flag_refuses_anonymous_callers() {
        let fx = fixture();

        let result = fx
            .gate
            .check(&GateRequest::anonymous(), GateOptions::default())
            .await;

        assert_eq!(result, Err(GateError::AuthenticationRequired));
    }

    #[tokio::test]
    async fn anonymous_allowed_when_auth_flag_off() {
        let mut defaults = FlagSet::baseline();
        defaults.auth = false;
        let fx = fixture_with(defaults);

        let context = fx
            .gate
            .check(&GateRequest::anonymous(), GateOptions::requiring(Flag::BidAnalysis).metered())
            .await
            .unwrap();

        assert_eq!(context.user_id, None);
        assert_eq!(context.tier, None);
        assert_eq!(fx.tiers.lookup_count(), 0);
        assert_eq!(fx.store.read_count(), 0);
    }

    #[tokio::test]
    async fn override_can_lift_global_auth() {
        let fx = fixture();
        let request = GateRequest::anonymous()
            .with_overrides(Some(PartialFlags::default().with(Flag::Auth, false)));

        assert!(fx.gate.check(&request, GateOptions::default()).await.is_ok());
    }

    // ══════════════════════════════════════════════════════════════
    // Tiers and flags
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn pro_user_may_export_leveling() {
        let fx = fixture();
        fx.tiers.set_tier(&user(), Tier::Pro).await.unwrap();

        let context = fx
            .gate
            .check(
                &GateRequest::for_user(user()),
                GateOptions::requiring(Flag::ExportBidLeveling),
            )
            .await
            .unwrap();

        assert_eq!(context.tier, Some(Tier::Pro));
        assert!(context.flags.export_bid_leveling);
    }

    #[tokio::test]
    async fn user_without_tier_gets_starter() {
        let fx = fixture();

        let result = fx
            .gate
            .check(
                &GateRequest::for_user(user()),
                GateOptions::requiring(Flag::ExportBidLeveling),
            )
            .await;

        assert_eq!(
            result,
            Err(GateError::FeatureDisabled {
                feature: Flag::ExportBidLeveling
            })
        );
    }

    #[tokio::test]
    async fn failing_tier_lookup_falls_back_to_starter() {
        let fx = fixture();
        fx.tiers.set_failing(true);

        let context = fx
            .gate
            .check(&GateRequest::for_user(user()), GateOptions::default())
            .await
            .unwrap();

        assert_eq!(context.tier, Some(Tier::Starter));
    }

    /// Directory holding a tier name written by a newer billing setup.
    struct StaleNameDirectory(&'static str);

    #[async_trait]
    impl TierDirectory for StaleNameDirectory {
        async fn tier_for(&self, user_id: &UserId) -> Result<Option<Tier>, TierDirectoryError> {
            Err(TierDirectoryError::UnknownTier {
                user_id: user_id.to_string(),
                value: self.0.to_string(),
            })
        }

        async fn set_tier(&self, _user_id: &UserId, _tier: Tier) -> Result<(), TierDirectoryError> {
            Ok(())
        }
    }

    fn gate_over_stale_name(defaults: FlagSet, store: Arc<InMemoryUsageStore>) -> ApiGate {
        ApiGate::new(
            Arc::new(FlagResolver::new(defaults)),
            Arc::new(StaleNameDirectory("platinum")),
            UsageLedger::new(store),
        )
    }

    #[tokio::test]
    async fn unrecognised_tier_keeps_configured_defaults() {
        let mut defaults = FlagSet::baseline();
        defaults.ai_summary = true;
        let gate = gate_over_stale_name(defaults, Arc::new(InMemoryUsageStore::new()));

        let context = gate
            .check(&GateRequest::for_user(user()), GateOptions::requiring(Flag::AiSummary))
            .await
            .unwrap();

        assert!(context.flags.ai_summary);
        assert_eq!(context.tier, Some(Tier::Starter));
        assert_eq!(
            gate.standing_of(&user()).await,
            TierStanding::Unrecognised("platinum".to_string())
        );
    }

    #[tokio::test]
    async fn unrecognised_tier_is_metered_as_lowest() {
        let store = Arc::new(InMemoryUsageStore::new());
        let gate = gate_over_stale_name(FlagSet::baseline(), store);
        for _ in 0..3 {
            gate.usage().increment(&user()).await;
        }

        let result = gate
            .check(&GateRequest::for_user(user()), GateOptions::default().metered())
            .await;

        assert_eq!(
            result,
            Err(GateError::LimitExceeded {
                tier: Tier::Starter,
                limit: 3,
                used: 3
            })
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Usage limits
    // ══════════════════════════════════════════════════════════════

    async fn use_up(fx: &Fixture, times: usize) {
        for _ in 0..times {
            fx.gate.usage().increment(&user()).await;
        }
    }

    #[tokio::test]
    async fn exhausted_starter_is_blocked() {
        let fx = fixture();
        use_up(&fx, 3).await;

        let result = fx
            .gate
            .check(
                &GateRequest::for_user(user()),
                GateOptions::requiring(Flag::BidAnalysis).metered(),
            )
            .await;

        assert_eq!(
            result,
            Err(GateError::LimitExceeded {
                tier: Tier::Starter,
                limit: 3,
                used: 3
            })
        );
    }

    #[tokio::test]
    async fn quota_not_checked_on_unmetered_endpoints() {
        let fx = fixture();
        use_up(&fx, 3).await;

        let result = fx
            .gate
            .check(&GateRequest::for_user(user()), GateOptions::requiring(Flag::BidAnalysis))
            .await;

        assert!(result.is_ok());
        assert_eq!(fx.store.read_count(), 0);
    }

    #[tokio::test]
    async fn quota_not_checked_when_usage_limits_flag_off() {
        let mut defaults = FlagSet::baseline();
        defaults.usage_limits = false;
        let fx = fixture_with(defaults);
        use_up(&fx, 10).await;

        let result = fx
            .gate
            .check(&GateRequest::for_user(user()), GateOptions::default().metered())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn enterprise_quota_never_read() {
        let fx = fixture();
        fx.tiers.set_tier(&user(), Tier::Enterprise).await.unwrap();

        fx.gate
            .check(&GateRequest::for_user(user()), GateOptions::default().metered())
            .await
            .unwrap();

        assert_eq!(fx.store.read_count(), 0);
    }

    #[tokio::test]
    async fn usage_store_outage_fails_open() {
        let fx = fixture();
        use_up(&fx, 3).await;
        fx.store.set_failing(true);

        let result = fx
            .gate
            .check(&GateRequest::for_user(user()), GateOptions::default().metered())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn gate_never_increments() {
        let fx = fixture();

        fx.gate
            .check(&GateRequest::for_user(user()), GateOptions::default().metered())
            .await
            .unwrap();

        assert_eq!(fx.gate.usage().count(&user(), MonthKey::current()).await, 0);
    }

    #[tokio::test]
    async fn feature_check_precedes_quota_check() {
        let fx = fixture();
        use_up(&fx, 3).await;

        let result = fx
            .gate
            .check(
                &GateRequest::for_user(user()),
                GateOptions::requiring(Flag::AiSummary).metered(),
            )
            .await;

        assert_eq!(
            result,
            Err(GateError::FeatureDisabled {
                feature: Flag::AiSummary
            })
        );
        assert_eq!(fx.store.read_count(), 0);
    }
}
