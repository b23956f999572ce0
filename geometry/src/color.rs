use serde::Deserialize;

/// A linear RGBA color.
///
/// Deserializes from `[r, g, b]` or `[r, g, b, a]`.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
#[serde(try_from = "Vec<f32>")]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

impl TryFrom<Vec<f32>> for Color {
    type Error = String;

    fn try_from(components: Vec<f32>) -> Result<Self, Self::Error> {
        match components[..] {
            [r, g, b] => Ok(Self::rgb(r, g, b)),
            [r, g, b, a] => Ok(Self::new(r, g, b, a)),
            _ => Err(format!(
                "a color needs 3 or 4 components, got {}",
                components.len()
            )),
        }
    }
}

impl From<(f32, f32, f32)> for Color {
    fn from((r, g, b): (f32, f32, f32)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<Color> for (f32, f32, f32, f32) {
    fn from(c: Color) -> Self {
        (c.red, c.green, c.blue, c.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn converts_from_component_lists() {
        assert_eq!(
            Color::try_from(vec![0.5, 0.5, 0.5]),
            Ok(Color::rgb(0.5, 0.5, 0.5))
        );
        assert_eq!(
            Color::try_from(vec![0.1, 0.2, 0.3, 0.4]),
            Ok(Color::new(0.1, 0.2, 0.3, 0.4))
        );
        assert!(Color::try_from(vec![1.0]).is_err());
    }
}
