//! Directional light shared by the GPU shader uniforms and the CPU shader.

use nalgebra::Vector3;

/// A single directional light plus an ambient term, in eye space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub ambient: [f32; 3],
    pub color: [f32; 3],
    /// Direction towards the light. Normalized on use.
    pub direction: [f32; 3],
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            ambient: [0.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0],
            direction: [0.0, 0.0, 1.0],
        }
    }
}

impl DirectionalLight {
    /// Unit direction towards the light, or +Z for a zero vector.
    pub fn unit_direction(&self) -> Vector3<f32> {
        let dir = Vector3::from(self.direction);
        dir.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::z)
    }

    /// Per-channel light factor for an eye-space surface normal:
    /// `ambient + color * max(n . l, 0)`.
    pub fn intensity(&self, normal: &Vector3<f32>) -> [f32; 3] {
        let n = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
        let diffuse = n.dot(&self.unit_direction()).max(0.0);
        [
            self.ambient[0] + self.color[0] * diffuse,
            self.ambient[1] + self.color[1] * diffuse,
            self.ambient[2] + self.color[2] * diffuse,
        ]
    }

    /// Light factor with lighting switched on or off; unlit surfaces keep
    /// their full colour.
    pub fn shade(&self, normal: &Vector3<f32>, enabled: bool) -> [f32; 3] {
        if enabled {
            self.intensity(normal)
        } else {
            [1.0, 1.0, 1.0]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_light_is_fully_lit() {
        let light = DirectionalLight::default();
        assert_eq!(light.intensity(&Vector3::z()), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_facing_away_gets_ambient_only() {
        let light = DirectionalLight {
            ambient: [0.2, 0.3, 0.4],
            ..DirectionalLight::default()
        };
        assert_eq!(light.intensity(&-Vector3::z()), [0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_oblique_normal() {
        let light = DirectionalLight::default();
        let [r, _, _] = light.intensity(&Vector3::new(1.0, 0.0, 1.0));
        assert!((r - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_lighting_is_neutral() {
        let light = DirectionalLight::default();
        assert_eq!(light.shade(&-Vector3::z(), false), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_zero_direction_defaults_to_z() {
        let light = DirectionalLight {
            direction: [0.0; 3],
            ..DirectionalLight::default()
        };
        assert_eq!(light.unit_direction(), Vector3::z());
    }
}
