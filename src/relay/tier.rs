//! Priority tier classification for inbound notifications.
//!
//! Gotify priorities are open-ended integers. The relay recognizes four
//! tiers and renders everything else as plain content:
//! - NORMAL (0): no icon, gray embed
//! - INFO (1-3): information, sky blue embed
//! - NOTICE (4-7): should be seen, orange embed
//! - CRITICAL (8-10): needs attention now, red embed
//! - OTHER (negative or >10): free-form content, no embed

/// Priority tier for an inbound notification.
///
/// Classification never fails: a priority outside the recognized ranges is
/// `Other`, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PriorityTier {
    Normal,
    Info,
    Notice,
    Critical,
    Other,
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PriorityTier {
    /// Classify a raw priority value. Ordered range checks, first match wins.
    pub fn from_priority(priority: i64) -> Self {
        match priority {
            0 => PriorityTier::Normal,
            1..=3 => PriorityTier::Info,
            4..=7 => PriorityTier::Notice,
            8..=10 => PriorityTier::Critical,
            _ => PriorityTier::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::Normal => "NORMAL",
            PriorityTier::Info => "INFO",
            PriorityTier::Notice => "NOTICE",
            PriorityTier::Critical => "CRITICAL",
            PriorityTier::Other => "OTHER",
        }
    }

    /// Icon glyph prefixed to the embed title. `None` for tiers whose title
    /// is passed through unchanged.
    pub fn icon(&self) -> Option<&'static str> {
        match self {
            PriorityTier::Normal => None,
            PriorityTier::Info => Some("ℹ️"),
            PriorityTier::Notice => Some("🔔"),
            PriorityTier::Critical => Some("🚨"),
            PriorityTier::Other => None,
        }
    }

    /// Fixed 24-bit embed color. `None` exactly for `Other`, which renders
    /// as plain content instead of an embed.
    pub fn color(&self) -> Option<u32> {
        match self {
            PriorityTier::Normal => Some(0x808080),
            PriorityTier::Info => Some(0x00BFFF),
            PriorityTier::Notice => Some(0xFFA500),
            PriorityTier::Critical => Some(0xFF0000),
            PriorityTier::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_priority_boundaries() {
        assert_eq!(PriorityTier::from_priority(0), PriorityTier::Normal);
        assert_eq!(PriorityTier::from_priority(1), PriorityTier::Info);
        assert_eq!(PriorityTier::from_priority(3), PriorityTier::Info);
        assert_eq!(PriorityTier::from_priority(4), PriorityTier::Notice);
        assert_eq!(PriorityTier::from_priority(7), PriorityTier::Notice);
        assert_eq!(PriorityTier::from_priority(8), PriorityTier::Critical);
        assert_eq!(PriorityTier::from_priority(10), PriorityTier::Critical);
    }

    #[test]
    fn test_from_priority_other() {
        // Out-of-range values classify, they never error
        assert_eq!(PriorityTier::from_priority(-1), PriorityTier::Other);
        assert_eq!(PriorityTier::from_priority(11), PriorityTier::Other);
        assert_eq!(PriorityTier::from_priority(42), PriorityTier::Other);
        assert_eq!(PriorityTier::from_priority(i64::MIN), PriorityTier::Other);
        assert_eq!(PriorityTier::from_priority(i64::MAX), PriorityTier::Other);
    }

    #[test]
    fn test_colors_per_tier() {
        assert_eq!(PriorityTier::Normal.color(), Some(0x808080));
        assert_eq!(PriorityTier::Info.color(), Some(0x00BFFF));
        assert_eq!(PriorityTier::Notice.color(), Some(0xFFA500));
        assert_eq!(PriorityTier::Critical.color(), Some(0xFF0000));
        assert_eq!(PriorityTier::Other.color(), None);
    }

    #[test]
    fn test_icons_per_tier() {
        assert_eq!(PriorityTier::Normal.icon(), None);
        assert_eq!(PriorityTier::Info.icon(), Some("ℹ️"));
        assert_eq!(PriorityTier::Notice.icon(), Some("🔔"));
        assert_eq!(PriorityTier::Critical.icon(), Some("🚨"));
        assert_eq!(PriorityTier::Other.icon(), None);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(format!("{}", PriorityTier::Normal), "NORMAL");
        assert_eq!(format!("{}", PriorityTier::Critical), "CRITICAL");
        assert_eq!(PriorityTier::Other.as_str(), "OTHER");
    }
}
