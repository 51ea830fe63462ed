/// Surface material, colors and the directional light
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SceneError;

/// Fraction of the base color visible on surfaces facing away from the light.
const AMBIENT: f32 = 0.08;

/// Light intensity that maps to unit direct radiance.
const REFERENCE_INTENSITY: f32 = 4.0;

/// 8-bit sRGB color, written as `#rrggbb` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale each channel by `intensity` (clamped to [0, 1]).
    pub fn scaled(self, intensity: f32) -> Self {
        let k = intensity.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * k).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Rotate the hue by `degrees`, keeping saturation and value.
    pub fn rotate_hue(self, degrees: f32) -> Self {
        let mut hsv = self.to_hsv();
        hsv.h = (hsv.h + degrees).rem_euclid(360.0);
        hsv.to_rgb()
    }

    pub fn to_hsv(self) -> Hsv {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };
        Hsv { h, s, v: max }
    }
}

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0);
        let s = self.s.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0);
        let c = v * s;
        let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let channel = |f: f32| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(r), channel(g), channel(b))
    }
}

impl FromStr for Rgb {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SceneError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = SceneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Flat-shaded physical-ish material shared by all orbiting meshes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Rgb::new(0x3c, 0x94, 0xd7),
            metalness: 0.86,
            roughness: 0.37,
        }
    }
}

/// Light arriving from `position` towards the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Point3<f32>,
}

impl DirectionalLight {
    /// Unit vector from a surface towards the light.
    pub fn direction(&self) -> Vector3<f32> {
        self.position
            .coords
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::y)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            intensity: 4.0,
            position: Point3::new(0.5, 1.0, 0.0),
        }
    }
}

/// Brightness in [0, 1] of a surface with `normal`, seen along `to_eye`.
///
/// Faces are lit from both sides: the normal is flipped to face the viewer.
pub fn shade(
    material: &Material,
    light: &DirectionalLight,
    normal: &Vector3<f32>,
    to_eye: &Vector3<f32>,
) -> f32 {
    let normal = if normal.dot(to_eye) < 0.0 {
        -normal
    } else {
        *normal
    };
    let to_light = light.direction();

    let diffuse = normal.dot(&to_light).max(0.0);

    let half = (to_light + to_eye).try_normalize(1e-12).unwrap_or(to_light);
    let shininess = (1.0 - material.roughness.clamp(0.0, 1.0)) * 64.0 + 1.0;
    let specular = normal.dot(&half).max(0.0).powf(shininess);

    let metalness = material.metalness.clamp(0.0, 1.0);
    let direct = (1.0 - metalness) * diffuse + metalness * (0.35 * diffuse + specular);
    let radiance = light.intensity / REFERENCE_INTENSITY;

    (AMBIENT + radiance * direct).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_hex() {
        let color: Rgb = "#3c94d7".parse().unwrap();
        assert_eq!(color, Rgb::new(0x3c, 0x94, 0xd7));
        assert_eq!(color.to_string(), "#3c94d7");
        assert_eq!("#FFFFFF".parse::<Rgb>().unwrap(), Rgb::WHITE);
    }

    #[test]
    fn test_reject_malformed_hex() {
        for bad in ["3c94d7", "#3c94d", "#3c94d7ff", "#zz94d7", "#ñ94d7"] {
            assert!(matches!(
                bad.parse::<Rgb>(),
                Err(SceneError::InvalidColor(_))
            ));
        }
    }

    #[test]
    fn test_hue_rotation_round_trip() {
        let color = Material::default().color;
        let rotated = color.rotate_hue(120.0);
        assert_ne!(rotated, color);
        let back = rotated.rotate_hue(240.0);
        for (a, b) in [(back.r, color.r), (back.g, color.g), (back.b, color.b)] {
            assert!((a as i16 - b as i16).abs() <= 1);
        }
        assert_eq!(Rgb::new(255, 0, 0).rotate_hue(120.0), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_hsv_of_grey_and_primaries() {
        let grey = Rgb::new(128, 128, 128).to_hsv();
        assert_eq!((grey.h, grey.s), (0.0, 0.0));
        assert!((grey.v - 128.0 / 255.0).abs() < 1e-6);

        let blue = Rgb::new(0, 0, 255).to_hsv();
        assert_eq!((blue.h, blue.s, blue.v), (240.0, 1.0, 1.0));
        assert_eq!(blue.to_rgb(), Rgb::new(0, 0, 255));

        let out_of_range = Hsv { h: -120.0, s: 2.0, v: 1.0 };
        assert_eq!(out_of_range.to_rgb(), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_scaled_clamps() {
        let color = Rgb::new(200, 100, 50);
        assert_eq!(color.scaled(0.5), Rgb::new(100, 50, 25));
        assert_eq!(color.scaled(2.0), color);
        assert_eq!(color.scaled(-1.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_shade_is_brighter_facing_the_light() {
        let material = Material::default();
        let light = DirectionalLight::default();
        let eye = Vector3::z();
        let lit = shade(&material, &light, &light.direction(), &eye);
        let unlit = shade(&material, &light, &-Vector3::y(), &-Vector3::y());
        assert!(lit > unlit);
        assert!((0.0..=1.0).contains(&lit));
        assert!((unlit - AMBIENT).abs() < 1e-6);
    }

    #[test]
    fn test_shade_is_two_sided() {
        let material = Material::default();
        let light = DirectionalLight::default();
        let eye = Vector3::new(0.0, 1.0, 1.0).normalize();
        let front = shade(&material, &light, &Vector3::y(), &eye);
        let back = shade(&material, &light, &-Vector3::y(), &eye);
        assert!((front - back).abs() < 1e-6);
    }
}
