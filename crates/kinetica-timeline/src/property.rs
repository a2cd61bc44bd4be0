use std::fmt;
use std::ops::{Index, IndexMut, RangeInclusive};
use std::str::FromStr;

use crate::error::TimelineError;

/// An animatable property of the preview box.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Property {
    X,
    Y,
    Scale,
    Rotate,
    Opacity,
}

impl Property {
    pub const COUNT: usize = 5;

    /// Every property, in editor display order.
    pub const ALL: [Property; Self::COUNT] = [
        Property::X,
        Property::Y,
        Property::Scale,
        Property::Rotate,
        Property::Opacity,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Property::X       => "x",
            Property::Y       => "y",
            Property::Scale   => "scale",
            Property::Rotate  => "rotate",
            Property::Opacity => "opacity",
        }
    }

    /// Legal editing range.
    ///
    /// The model stores values outside this range unchanged; clamping is
    /// left to the editing surface (see [`Property::clamp`]).
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            Property::Opacity => 0.0..=1.0,
            Property::Scale   => 0.5..=3.0,
            Property::X | Property::Y | Property::Rotate => -200.0..=200.0,
        }
    }

    /// Slider increment used by the editor.
    pub fn step(self) -> f32 {
        match self {
            Property::Opacity | Property::Scale => 0.1,
            Property::X | Property::Y | Property::Rotate => 1.0,
        }
    }

    /// Value carried by a fresh timeline's first step.
    pub fn default_value(self) -> f32 {
        match self {
            Property::Scale | Property::Opacity => 1.0,
            Property::X | Property::Y | Property::Rotate => 0.0,
        }
    }

    /// Clamps `value` into [`Property::range`].
    pub fn clamp(self, value: f32) -> f32 {
        let r = self.range();
        value.clamp(*r.start(), *r.end())
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TimelineError::UnknownProperty(s.to_string()))
    }
}

/// A complete set of property values.
///
/// Every [`Property`] always has a value; partial sets cannot be expressed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PropertySet {
    values: [f32; Property::COUNT],
}

impl PropertySet {
    pub fn new(x: f32, y: f32, scale: f32, rotate: f32, opacity: f32) -> Self {
        Self { values: [x, y, scale, rotate, opacity] }
    }

    pub fn get(&self, property: Property) -> f32 {
        self.values[property.slot()]
    }

    pub fn set(&mut self, property: Property, value: f32) {
        self.values[property.slot()] = value;
    }

    /// Builder-style [`PropertySet::set`].
    pub fn with(mut self, property: Property, value: f32) -> Self {
        self.set(property, value);
        self
    }

    /// `(property, value)` pairs in [`Property::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Property, f32)> + '_ {
        Property::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// Linear blend towards `other`; `t = 0` yields `self`, `t = 1` yields `other`.
    pub fn lerp(&self, other: &PropertySet, t: f32) -> PropertySet {
        let mut out = *self;
        for (slot, v) in out.values.iter_mut().enumerate() {
            *v += (other.values[slot] - *v) * t;
        }
        out
    }
}

impl Default for PropertySet {
    fn default() -> Self {
        let mut values = [0.0; Property::COUNT];
        for p in Property::ALL {
            values[p.slot()] = p.default_value();
        }
        Self { values }
    }
}

impl Index<Property> for PropertySet {
    type Output = f32;

    fn index(&self, property: Property) -> &f32 {
        &self.values[property.slot()]
    }
}

impl IndexMut<Property> for PropertySet {
    fn index_mut(&mut self, property: Property) -> &mut f32 {
        &mut self.values[property.slot()]
    }
}

impl fmt::Display for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (p, v) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{p}={v:.2}")?;
        }
        Ok(())
    }
}
