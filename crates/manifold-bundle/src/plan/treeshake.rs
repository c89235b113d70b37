//! Tree-shake policy selection.

use manifold_config::Platform;

/// Side-effect relaxations applied when tree-shaking is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeShakeOptions {
    /// Treat property reads as side-effect free.
    pub property_read_side_effects: bool,
    /// Deoptimize code inside try/catch.
    pub try_catch_deoptimization: bool,
}

impl TreeShakeOptions {
    /// Both pessimizations off: maximal shaking.
    pub fn relaxed() -> Self {
        Self {
            property_read_side_effects: false,
            try_catch_deoptimization: false,
        }
    }
}

/// Tree-shake policy for one target. Either fully disabled or enabled
/// with explicit relaxations - there is no partial hybrid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeShake {
    Disabled,
    Enabled(TreeShakeOptions),
}

impl TreeShake {
    pub fn is_enabled(&self) -> bool {
        matches!(self, TreeShake::Enabled(_))
    }
}

/// Pure function of (platform, dev mode, explicit disable).
///
/// Hydrate output is always maximally shaken regardless of other
/// settings. Every other platform shakes only in production builds the
/// caller has not opted out of.
pub fn tree_shake_policy(platform: Platform, dev_mode: bool, explicit_disable: bool) -> TreeShake {
    if platform.is_hydrate() {
        return TreeShake::Enabled(TreeShakeOptions::relaxed());
    }

    if dev_mode || explicit_disable {
        TreeShake::Disabled
    } else {
        TreeShake::Enabled(TreeShakeOptions::relaxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hydrate_is_always_relaxed_but_enabled() {
        for dev_mode in [false, true] {
            for explicit_disable in [false, true] {
                let policy = tree_shake_policy(Platform::Hydrate, dev_mode, explicit_disable);
                assert_eq!(policy, TreeShake::Enabled(TreeShakeOptions::relaxed()));
            }
        }
    }

    #[test]
    fn other_platforms_disable_in_dev_or_on_request() {
        for platform in [
            Platform::BrowserLazy,
            Platform::BrowserEager,
            Platform::Worker,
            Platform::CustomElementsLoader,
        ] {
            assert_eq!(
                tree_shake_policy(platform, true, false),
                TreeShake::Disabled
            );
            assert_eq!(
                tree_shake_policy(platform, false, true),
                TreeShake::Disabled
            );
            assert_eq!(
                tree_shake_policy(platform, true, true),
                TreeShake::Disabled
            );
            assert_eq!(
                tree_shake_policy(platform, false, false),
                TreeShake::Enabled(TreeShakeOptions::relaxed())
            );
        }
    }

    #[test]
    fn relaxed_options_disable_both_pessimizations() {
        let options = TreeShakeOptions::relaxed();
        assert!(!options.property_read_side_effects);
        assert!(!options.try_catch_deoptimization);
    }
}
