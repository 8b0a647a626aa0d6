#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const OPAQUE_BLACK: Colour = Colour {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    #[must_use]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Opaque colour from hue in degrees and saturation/value in `[0, 1]`,
    /// using the 60° sector decomposition.
    #[must_use]
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let hue = hue.rem_euclid(360.0);
        let chroma = value * saturation;
        let sector = hue / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let m = value - chroma;

        let (r, g, b) = match sector as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        Self {
            r: channel_to_u8(r + m),
            g: channel_to_u8(g + m),
            b: channel_to_u8(b + m),
            a: 255,
        }
    }
}

fn channel_to_u8(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(Colour::from_hsv(0.0, 1.0, 1.0).to_rgba(), [255, 0, 0, 255]);
        assert_eq!(Colour::from_hsv(120.0, 1.0, 1.0).to_rgba(), [0, 255, 0, 255]);
        assert_eq!(Colour::from_hsv(240.0, 1.0, 1.0).to_rgba(), [0, 0, 255, 255]);
    }

    #[test]
    fn test_secondary_hues() {
        assert_eq!(Colour::from_hsv(60.0, 1.0, 1.0).to_rgba(), [255, 255, 0, 255]);
        assert_eq!(Colour::from_hsv(180.0, 1.0, 1.0).to_rgba(), [0, 255, 255, 255]);
        assert_eq!(Colour::from_hsv(300.0, 1.0, 1.0).to_rgba(), [255, 0, 255, 255]);
    }

    #[test]
    fn test_zero_saturation_is_grey() {
        let grey = Colour::from_hsv(123.0, 0.0, 0.5);
        assert_eq!(grey.r, grey.g);
        assert_eq!(grey.g, grey.b);
        assert_eq!(grey.r, 128);
    }

    #[test]
    fn test_hue_wraps_around() {
        assert_eq!(Colour::from_hsv(360.0, 1.0, 1.0), Colour::from_hsv(0.0, 1.0, 1.0));
        assert_eq!(Colour::from_hsv(-120.0, 1.0, 1.0), Colour::from_hsv(240.0, 1.0, 1.0));
    }

    #[test]
    fn test_always_opaque() {
        assert_eq!(Colour::from_hsv(77.0, 0.85, 0.6).a, 255);
    }
}
