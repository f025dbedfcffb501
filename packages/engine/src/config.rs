//! The configuration aggregate.
//!
//! One `Config` is a fully resolved, immutable snapshot: the branch set,
//! every call's policy (bound at build time, never looked up per call), and
//! the scalar options. Reconfiguration builds a fresh `Config` and swaps it
//! into the [`ConfigHandle`](crate::ConfigHandle); nothing here is ever
//! mutated after `build()`.

use std::collections::HashMap;
use std::str::FromStr;

use libc::c_int;
use mosaicfs_branch::BranchSet;
use mosaicfs_policy::{registry, Category, FsCall, PolicyRef};

/// Errors raised while binding a configuration.
///
/// All of these happen at mount or reconfiguration time; a running call can
/// never observe a half-bound config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no branches configured")]
    NoBranches,

    #[error("unknown policy '{name}'")]
    UnknownPolicy { name: String },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("unknown category '{name}'")]
    UnknownCategory { name: String },

    #[error("policy '{policy}' cannot be used for {category} calls")]
    CategoryMismatch {
        policy: &'static str,
        category: Category,
    },
}

/// Runtime control of extended attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XattrMode {
    /// Pass xattr calls through to the branch filesystems.
    #[default]
    Passthrough,
    /// Respond as if no attribute exists (ENODATA).
    NoAttr,
    /// Respond as if xattrs are unsupported (ENOSYS).
    NoSys,
}

impl XattrMode {
    /// The errno short-circuited xattr calls return; 0 means passthrough.
    pub fn errno(&self) -> c_int {
        match self {
            XattrMode::Passthrough => 0,
            XattrMode::NoAttr => libc::ENODATA,
            XattrMode::NoSys => libc::ENOSYS,
        }
    }
}

impl FromStr for XattrMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passthrough" => Ok(XattrMode::Passthrough),
            "noattr" => Ok(XattrMode::NoAttr),
            "nosys" => Ok(XattrMode::NoSys),
            _ => Err(()),
        }
    }
}

/// Which branches a statfs aggregation considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatfsScope {
    /// Every configured branch, irrespective of path.
    #[default]
    Base,
    /// Only branches on which the queried path exists.
    Full,
}

impl FromStr for StatfsScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(StatfsScope::Base),
            "full" => Ok(StatfsScope::Full),
            _ => Err(()),
        }
    }
}

/// Which branch classes are excluded from free/available totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatfsIgnore {
    /// Include everything.
    #[default]
    None,
    /// Exclude read-only and no-create branches (and branches whose
    /// underlying filesystem is mounted read-only).
    Ro,
    /// Exclude no-create branches.
    Nc,
}

impl FromStr for StatfsIgnore {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(StatfsIgnore::None),
            "ro" => Ok(StatfsIgnore::Ro),
            "nc" => Ok(StatfsIgnore::Nc),
            _ => Err(()),
        }
    }
}

/// Default global free-space floor: 4 GiB.
pub const DEFAULT_MIN_FREE_SPACE: u64 = 4 * (1 << 30);

/// Default symlinkify staleness timeout, in seconds.
pub const DEFAULT_SYMLINKIFY_TIMEOUT: u64 = 3600;

/// The immutable configuration snapshot every in-flight call borrows.
#[derive(Clone)]
pub struct Config {
    branches: BranchSet,
    policies: Vec<PolicyRef>,
    category_defaults: [PolicyRef; 3],

    pub min_free_space: u64,
    pub move_on_enospc: bool,
    pub drop_cache_on_close: bool,
    pub symlinkify: bool,
    pub symlinkify_timeout: u64,
    pub nullrw: bool,
    pub ignore_pp_on_rename: bool,
    pub security_capability: bool,
    pub link_cow: bool,
    pub xattr: XattrMode,
    pub statfs: StatfsScope,
    pub statfs_ignore: StatfsIgnore,
    pub hard_remove: bool,
    pub direct_io: bool,
    pub kernel_cache: bool,
    pub auto_cache: bool,
    pub entry_timeout: f64,
    pub negative_timeout: f64,
    pub attr_timeout: f64,
    pub ac_attr_timeout: f64,
}

impl Config {
    /// Start building a config.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The branch snapshot.
    pub fn branches(&self) -> &BranchSet {
        &self.branches
    }

    /// The policy bound to `call`. Resolution happened at build time, so
    /// this is a plain table lookup.
    pub fn policy_for(&self, call: FsCall) -> PolicyRef {
        self.policies[call as usize]
    }

    /// The effective default policy for a category.
    pub fn category_default(&self, category: Category) -> PolicyRef {
        self.category_defaults[category as usize]
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("branches", &self.branches)
            .field("min_free_space", &self.min_free_space)
            .field("statfs", &self.statfs)
            .field("statfs_ignore", &self.statfs_ignore)
            .field("symlinkify", &self.symlinkify)
            .finish_non_exhaustive()
    }
}

/// Accumulates branch and option state, then binds policies in `build()`.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    branches: Option<BranchSet>,
    func_bindings: HashMap<FsCall, String>,
    category_bindings: HashMap<Category, String>,

    pub min_free_space: Option<u64>,
    pub move_on_enospc: bool,
    pub drop_cache_on_close: bool,
    pub symlinkify: bool,
    pub symlinkify_timeout: Option<u64>,
    pub nullrw: bool,
    pub ignore_pp_on_rename: bool,
    pub security_capability: Option<bool>,
    pub link_cow: bool,
    pub xattr: XattrMode,
    pub statfs: StatfsScope,
    pub statfs_ignore: StatfsIgnore,
    pub hard_remove: bool,
    pub direct_io: bool,
    pub kernel_cache: bool,
    pub auto_cache: bool,
    pub entry_timeout: Option<f64>,
    pub negative_timeout: Option<f64>,
    pub attr_timeout: Option<f64>,
    pub ac_attr_timeout: Option<f64>,
}

impl ConfigBuilder {
    /// Install the branch set.
    pub fn branches(mut self, branches: BranchSet) -> Self {
        self.branches = Some(branches);
        self
    }

    /// Bind one function to a policy (`func.<name>=<policy>`). The function
    /// name is validated immediately; the policy name at `build()`.
    pub fn set_func_policy(&mut self, func: &str, policy: &str) -> Result<(), ConfigError> {
        let call = FsCall::from_str(func).map_err(|_| ConfigError::UnknownFunction {
            name: func.to_string(),
        })?;
        self.func_bindings.insert(call, policy.to_string());
        Ok(())
    }

    /// Bind a whole category to a policy (`category.<name>=<policy>`).
    pub fn set_category_policy(&mut self, category: &str, policy: &str) -> Result<(), ConfigError> {
        let category = Category::from_str(category).map_err(|_| ConfigError::UnknownCategory {
            name: category.to_string(),
        })?;
        self.category_bindings.insert(category, policy.to_string());
        Ok(())
    }

    /// Resolve every binding and produce the immutable snapshot.
    ///
    /// Unknown policy names and category-incompatible bindings fail here,
    /// at bind time - never at call time.
    pub fn build(self) -> Result<Config, ConfigError> {
        let branches = self.branches.ok_or(ConfigError::NoBranches)?;

        let mut category_defaults: [PolicyRef; 3] = [
            registry::default_for(Category::Search),
            registry::default_for(Category::Create),
            registry::default_for(Category::Action),
        ];
        for category in Category::ALL {
            if let Some(name) = self.category_bindings.get(&category) {
                category_defaults[category as usize] = resolve(name, category)?;
            }
        }

        let mut policies = Vec::with_capacity(FsCall::ALL.len());
        for call in FsCall::ALL {
            let policy = match self.func_bindings.get(&call) {
                Some(name) => resolve(name, call.category())?,
                None => category_defaults[call.category() as usize],
            };
            policies.push(policy);
        }

        Ok(Config {
            branches,
            policies,
            category_defaults,
            min_free_space: self.min_free_space.unwrap_or(DEFAULT_MIN_FREE_SPACE),
            move_on_enospc: self.move_on_enospc,
            drop_cache_on_close: self.drop_cache_on_close,
            symlinkify: self.symlinkify,
            symlinkify_timeout: self.symlinkify_timeout.unwrap_or(DEFAULT_SYMLINKIFY_TIMEOUT),
            nullrw: self.nullrw,
            ignore_pp_on_rename: self.ignore_pp_on_rename,
            security_capability: self.security_capability.unwrap_or(true),
            link_cow: self.link_cow,
            xattr: self.xattr,
            statfs: self.statfs,
            statfs_ignore: self.statfs_ignore,
            hard_remove: self.hard_remove,
            direct_io: self.direct_io,
            kernel_cache: self.kernel_cache,
            auto_cache: self.auto_cache,
            entry_timeout: self.entry_timeout.unwrap_or(1.0),
            negative_timeout: self.negative_timeout.unwrap_or(0.0),
            attr_timeout: self.attr_timeout.unwrap_or(1.0),
            ac_attr_timeout: self.ac_attr_timeout.unwrap_or(0.0),
        })
    }
}

fn resolve(name: &str, category: Category) -> Result<PolicyRef, ConfigError> {
    let policy = registry::lookup(name).ok_or_else(|| ConfigError::UnknownPolicy {
        name: name.to_string(),
    })?;
    if !policy.supports(category) {
        return Err(ConfigError::CategoryMismatch {
            policy: policy.name(),
            category,
        });
    }
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaicfs_branch::{Branch, BranchMode};

    fn branches() -> BranchSet {
        BranchSet::new(vec![Branch::new("/b0", BranchMode::ReadWrite)]).unwrap()
    }

    #[test]
    fn defaults_bind_per_category() {
        let config = Config::builder().branches(branches()).build().unwrap();
        assert_eq!(config.policy_for(FsCall::Open).name(), "ff");
        assert_eq!(config.policy_for(FsCall::Create).name(), "mfs");
        assert_eq!(config.policy_for(FsCall::Rename).name(), "epall");
        assert_eq!(config.min_free_space, DEFAULT_MIN_FREE_SPACE);
        assert!(config.security_capability);
    }

    #[test]
    fn function_override_beats_category_default() {
        let mut builder = Config::builder().branches(branches());
        builder.set_category_policy("action", "epall").unwrap();
        builder.set_func_policy("rename", "epff").unwrap();
        let config = builder.build().unwrap();
        assert_eq!(config.policy_for(FsCall::Rename).name(), "epff");
        assert_eq!(config.policy_for(FsCall::Unlink).name(), "epall");
    }

    #[test]
    fn category_override_applies_to_all_members() {
        let mut builder = Config::builder().branches(branches());
        builder.set_category_policy("search", "epff").unwrap();
        let config = builder.build().unwrap();
        assert_eq!(config.policy_for(FsCall::Open).name(), "epff");
        assert_eq!(config.policy_for(FsCall::Getattr).name(), "epff");
        // Other categories untouched.
        assert_eq!(config.policy_for(FsCall::Create).name(), "mfs");
    }

    #[test]
    fn unknown_names_fail_at_bind_time() {
        let mut builder = Config::builder().branches(branches());
        assert!(matches!(
            builder.set_func_policy("frobnicate", "ff"),
            Err(ConfigError::UnknownFunction { .. })
        ));
        assert!(matches!(
            builder.set_category_policy("write", "ff"),
            Err(ConfigError::UnknownCategory { .. })
        ));

        builder.set_func_policy("open", "nosuch").unwrap();
        assert!(matches!(
            builder.build(),
            Err(ConfigError::UnknownPolicy { .. })
        ));
    }

    #[test]
    fn category_mismatch_fails_at_bind_time() {
        // mfs is create-only; binding it to a search call must fail.
        let mut builder = Config::builder().branches(branches());
        builder.set_func_policy("open", "mfs").unwrap();
        assert!(matches!(
            builder.build(),
            Err(ConfigError::CategoryMismatch { .. })
        ));
    }

    #[test]
    fn missing_branches_rejected() {
        assert!(matches!(
            Config::builder().build(),
            Err(ConfigError::NoBranches)
        ));
    }

    #[test]
    fn xattr_mode_errnos() {
        assert_eq!(XattrMode::Passthrough.errno(), 0);
        assert_eq!(XattrMode::NoAttr.errno(), libc::ENODATA);
        assert_eq!(XattrMode::NoSys.errno(), libc::ENOSYS);
    }
}
