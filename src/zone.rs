//! Proximity zones
//!
//! Maps a distance to the zone shown on the LEDs, buzzer and display.
//!
//! # Zones
//! | Distance     | Zone  | Red | Green | Blue | Buzzer | Blink |
//! |--------------|-------|-----|-------|------|--------|-------|
//! | >= 20cm      | Clear |     |       |      |        |       |
//! | 16..20cm     | Far   |  x  |       |      |        |       |
//! | 11..16cm     | Near  |  x  |   x   |      |        |       |
//! | 6..11cm      | Close |  x  |   x   |  x   |        |       |
//! | <= 5cm       | Stop  |  x  |   x   |  x   |   x    |   x   |

/// Blink phase length of the Stop zone
pub const STOP_BLINK_MS: u64 = 500;

/// Banner shown on the display while in the Stop zone
pub const STOP_BANNER: &str = "STOP";

/// Distance band with its own indication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProximityZone {
    Clear,
    Far,
    Near,
    Close,
    Stop,
}

/// Output state for one zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Indication {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
    pub buzzer: bool,
    /// LEDs alternate on and off every [`STOP_BLINK_MS`]
    pub blink: bool,
}

impl ProximityZone {
    /// Zone of a distance in whole centimeters
    pub const fn from_distance(distance_cm: u16) -> Self {
        match distance_cm {
            20.. => ProximityZone::Clear,
            16..=19 => ProximityZone::Far,
            11..=15 => ProximityZone::Near,
            6..=10 => ProximityZone::Close,
            _ => ProximityZone::Stop,
        }
    }

    /// LED and buzzer state for this zone
    pub const fn indication(self) -> Indication {
        let (red, green, blue, buzzer) = match self {
            ProximityZone::Clear => (false, false, false, false),
            ProximityZone::Far => (true, false, false, false),
            ProximityZone::Near => (true, true, false, false),
            ProximityZone::Close => (true, true, true, false),
            ProximityZone::Stop => (true, true, true, true),
        };
        Indication {
            red,
            green,
            blue,
            buzzer,
            blink: matches!(self, ProximityZone::Stop),
        }
    }

    /// Text for the second display line
    pub const fn banner(self) -> &'static str {
        match self {
            ProximityZone::Stop => STOP_BANNER,
            _ => "",
        }
    }
}

/// Collaborator applying an indication to real outputs
pub trait ProximityIndicator {
    type Error;

    fn show(&mut self, indication: Indication) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_boundaries() {
        let cases = [
            (0, ProximityZone::Stop),
            (5, ProximityZone::Stop),
            (6, ProximityZone::Close),
            (10, ProximityZone::Close),
            (11, ProximityZone::Near),
            (15, ProximityZone::Near),
            (16, ProximityZone::Far),
            (19, ProximityZone::Far),
            (20, ProximityZone::Clear),
            (u16::MAX, ProximityZone::Clear),
        ];
        for (distance, zone) in cases {
            assert_eq!(ProximityZone::from_distance(distance), zone, "{distance}cm");
        }
    }

    #[test]
    fn test_indications() {
        assert_eq!(ProximityZone::Clear.indication(), Indication::default());
        let far = ProximityZone::Far.indication();
        assert!(far.red && !far.green && !far.blue && !far.buzzer);

        let stop = ProximityZone::Stop.indication();
        assert!(stop.red && stop.green && stop.blue && stop.buzzer && stop.blink);
        assert!(!ProximityZone::Close.indication().blink);
    }

    #[test]
    fn test_banner_only_when_stopping() {
        assert_eq!(ProximityZone::Stop.banner(), "STOP");
        assert_eq!(ProximityZone::Near.banner(), "");
    }
}
