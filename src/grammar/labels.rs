//! Plot titles, axis titles and legend titles.

use super::aes::Channel;

/// Text labels attached to a plot. Unset fields fall back to column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels {
    /// Plot title.
    pub title: Option<String>,
    /// Line below the title.
    pub subtitle: Option<String>,
    /// Small text in the bottom-right corner.
    pub caption: Option<String>,
    /// X axis title.
    pub x: Option<String>,
    /// Y axis title.
    pub y: Option<String>,
    /// Color legend title.
    pub color: Option<String>,
    /// Fill legend title.
    pub fill: Option<String>,
    /// Shape legend title.
    pub shape: Option<String>,
    /// Size legend title.
    pub size: Option<String>,
    /// Alpha legend title.
    pub alpha: Option<String>,
}

macro_rules! label_setter {
    ($($field:ident),* $(,)?) => {
        $(
            #[doc = concat!("Set the `", stringify!($field), "` label.")]
            #[must_use]
            pub fn $field(mut self, text: impl Into<String>) -> Self {
                self.$field = Some(text.into());
                self
            }
        )*
    };
}

impl Labels {
    /// No labels set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    label_setter!(title, subtitle, caption, x, y, color, fill, shape, size, alpha);

    /// Label for a channel, if set.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> Option<&str> {
        let slot = match channel {
            Channel::X => &self.x,
            Channel::Y => &self.y,
            Channel::Color => &self.color,
            Channel::Fill => &self.fill,
            Channel::Shape => &self.shape,
            Channel::Size => &self.size,
            Channel::Alpha => &self.alpha,
            Channel::Group | Channel::Ymin | Channel::Ymax => return None,
        };
        slot.as_deref()
    }

    /// Overlay `other` on `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: Labels) -> Labels {
        Labels {
            title: other.title.or(self.title),
            subtitle: other.subtitle.or(self.subtitle),
            caption: other.caption.or(self.caption),
            x: other.x.or(self.x),
            y: other.y.or(self.y),
            color: other.color.or(self.color),
            fill: other.fill.or(self.fill),
            shape: other.shape.or(self.shape),
            size: other.size.or(self.size),
            alpha: other.alpha.or(self.alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_and_lookup() {
        let labs = Labels::new().title("Salaries").color("Rank").x("Years");
        assert_eq!(labs.title.as_deref(), Some("Salaries"));
        assert_eq!(labs.channel(Channel::Color), Some("Rank"));
        assert_eq!(labs.channel(Channel::X), Some("Years"));
        assert_eq!(labs.channel(Channel::Group), None);
    }

    #[test]
    fn test_merge_prefers_later() {
        let merged = Labels::new().title("a").y("y").merge(Labels::new().title("b"));
        assert_eq!(merged.title.as_deref(), Some("b"));
        assert_eq!(merged.y.as_deref(), Some("y"));
    }
}
