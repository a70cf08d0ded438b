//! Configuration structures for stride-core.
//!
//! This module defines explicit configuration objects supplied by the
//! surrounding CRUD layer: completion-cooldown policy and per-tier
//! composition limits.
//!
//! The core crate itself does not read environment variables or account
//! records. All configuration must be provided explicitly by the caller so
//! that every engine operation stays a deterministic function of its inputs.

use time::Duration;

use crate::errors::{EngineError, EngineResult};

/// Global configuration container.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub cooldown: CooldownConfig,
    pub limits: LimitsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cooldown: CooldownConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Completion-cooldown policy.
///
/// The two durations are deliberately separate named values: product intent
/// on whether first-time completion and recurring re-completion share a
/// cooldown is still unconfirmed, so neither is hard-coded anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownConfig {
    /// Minimum time after creation (or un-completion) before a goal or a
    /// first-time habit may be marked complete.
    pub goal_completion: Duration,
    /// Minimum time after the previous completion before a recurring habit
    /// may be completed again.
    pub habit_recompletion: Duration,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            goal_completion: Duration::hours(24),
            habit_recompletion: Duration::hours(20),
        }
    }
}

/// Account tiers that supply numeric caps to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountTier {
    Free,
    Premium,
}

impl AccountTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
        }
    }
}

/// Composition-size limits per account tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitsConfig {
    pub free_max_items: usize,
    pub premium_max_items: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            free_max_items: 10,
            premium_max_items: 50,
        }
    }
}

impl LimitsConfig {
    /// Maximum number of composition items for a tier.
    pub fn max_items(&self, tier: AccountTier) -> usize {
        match tier {
            AccountTier::Free => self.free_max_items,
            AccountTier::Premium => self.premium_max_items,
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &EngineConfig) -> EngineResult<()> {
    if cfg.cooldown.goal_completion.is_negative() {
        return Err(EngineError::invariant(
            "goal completion cooldown must not be negative",
        ));
    }

    if cfg.cooldown.habit_recompletion.is_negative() {
        return Err(EngineError::invariant(
            "habit recompletion cooldown must not be negative",
        ));
    }

    if cfg.limits.free_max_items == 0 || cfg.limits.premium_max_items == 0 {
        return Err(EngineError::invariant(
            "composition limits must be greater than zero",
        ));
    }

    if cfg.limits.premium_max_items < cfg.limits.free_max_items {
        return Err(EngineError::invariant(
            "premium limit must not be below the free limit",
        ));
    }

    Ok(())
}
