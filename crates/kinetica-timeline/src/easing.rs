use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Timing curve applied to a playback fraction.
///
/// The eased curves are quadratic approximations of the CSS keywords.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    /// Maps `t` in `[0, 1]` onto the curve. Input is clamped first.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear    => "linear",
            Easing::EaseIn    => "ease-in",
            Easing::EaseOut   => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown easing `{0}` (expected linear, ease-in, ease-out or ease-in-out)")]
pub struct ParseEasingError(pub String);

impl FromStr for Easing {
    type Err = ParseEasingError;

    /// Accepts CSS spelling (`ease-in-out`) and camel case (`easeInOut`).
    /// CSS `ease` maps to [`Easing::EaseInOut`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "linear" => Ok(Easing::Linear),
            "easein" => Ok(Easing::EaseIn),
            "easeout" => Ok(Easing::EaseOut),
            "easeinout" | "ease" => Ok(Easing::EaseInOut),
            _ => Err(ParseEasingError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curve_pins_endpoints() {
        for e in Easing::ALL {
            assert_eq!(e.apply(0.0), 0.0, "{e}");
            assert_eq!(e.apply(1.0), 1.0, "{e}");
        }
    }

    #[test]
    fn curve_shapes() {
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
        assert_eq!(Easing::EaseIn.apply(0.5), 0.25);
        assert_eq!(Easing::EaseOut.apply(0.5), 0.75);
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        assert!(Easing::EaseInOut.apply(0.25) < 0.25);
        assert!(Easing::EaseInOut.apply(0.75) > 0.75);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(Easing::EaseIn.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseOut.apply(3.0), 1.0);
    }

    #[test]
    fn parses_css_and_camel_case() {
        assert_eq!("ease-in".parse::<Easing>().unwrap(), Easing::EaseIn);
        assert_eq!("easeOut".parse::<Easing>().unwrap(), Easing::EaseOut);
        assert_eq!("ease".parse::<Easing>().unwrap(), Easing::EaseInOut);
        assert_eq!("LINEAR".parse::<Easing>().unwrap(), Easing::Linear);
        assert!("bounce".parse::<Easing>().is_err());
    }
}
