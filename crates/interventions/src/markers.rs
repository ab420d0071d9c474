//! Declarative markers deciding which variants a test runs under

use std::fmt;

use crate::config::{Interventions, Platform, Variant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    /// Run with interventions enabled
    pub with_interventions: bool,
    /// Run with interventions disabled
    pub without_interventions: bool,
    pub skip_platforms: Vec<Platform>,
}

impl Markers {
    /// Why `variant` is excluded, or `None` when the test should run.
    ///
    /// A test carrying neither intervention marker runs in both states.
    pub fn skip_reason(&self, variant: &Variant) -> Option<String> {
        if self.skip_platforms.contains(&variant.platform) {
            return Some(format!("skipped on {}", variant.platform));
        }

        let wanted = match variant.interventions {
            Interventions::Enabled => self.with_interventions,
            Interventions::Disabled => self.without_interventions,
        };
        let unmarked = !self.with_interventions && !self.without_interventions;
        if wanted || unmarked {
            None
        } else {
            Some(format!("not run with interventions {}", variant.interventions))
        }
    }
}

/// Intervention states followed by any skipped platforms, e.g. `enabled  skip: android`
impl fmt::Display for Markers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states = match (self.with_interventions, self.without_interventions) {
            (true, false) => "enabled",
            (false, true) => "disabled",
            _ => "both",
        };
        f.write_str(states)?;

        if !self.skip_platforms.is_empty() {
            let platforms: Vec<String> = self.skip_platforms.iter().map(Platform::to_string).collect();
            write!(f, "  skip: {}", platforms.join(","))?;
        }
        Ok(())
    }
}
