/// A height-field plotted by the surface mesh.
///
/// Any `Fn(x, z, time) -> height` closure is a surface.
pub trait Surface {
    /// Returns the height at `(x, z)` at the given time.
    ///
    /// Heights in `[0, 1]` fill the vertical span of the plot.
    fn height(&self, x: f32, z: f32, time: f32) -> f32;
}

impl<F> Surface for F
where
    F: Fn(f32, f32, f32) -> f32,
{
    #[inline]
    fn height(&self, x: f32, z: f32, time: f32) -> f32 {
        self(x, z, time)
    }
}

#[derive(Copy, Clone, Debug, Default)]
/// A bump drifting around the plot along an ellipse.
///
/// The bump is narrow along X and wide along Z, with a flat plane elsewhere.
/// Its top reaches height 1 at `(2 sin t + 4, 6 cos t + 8)`.
pub struct MovingBump;

impl MovingBump {
    /// Falloff profile `clamp(1 - |scaled distance|^power, 0, 1)`.
    #[inline]
    fn falloff(distance: f32, scale: f32, power: f32) -> f32 {
        (1.0 - (2.0 * distance * scale).abs().powf(power)).clamp(0.0, 1.0)
    }
}

impl Surface for MovingBump {
    fn height(&self, x: f32, z: f32, time: f32) -> f32 {
        let x_offset = 2.0f32.mul_add(time.sin(), 4.0);
        let z_offset = 6.0f32.mul_add(time.cos(), 8.0);

        let hx = Self::falloff(x - x_offset, 16.0 / 9.0 / 5.0, 3.0);
        let hz = Self::falloff(z - z_offset, 9.0 / 16.0 / 2.0, 1.5);

        hx.powf(1.0 / 3.0) * hz.powf(1.0 / 1.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_follows_time() {
        let bump = MovingBump;
        assert!((bump.height(4.0, 14.0, 0.0) - 1.0).abs() < 1e-6);

        let t = std::f32::consts::FRAC_PI_2;
        assert!((bump.height(6.0, 8.0, t) - 1.0).abs() < 1e-5);
        assert!(bump.height(4.0, 14.0, t) < 1.0);
    }

    #[test]
    fn flat_far_from_the_bump() {
        let bump = MovingBump;
        assert_eq!(bump.height(0.0, 0.0, 0.0), 0.0);
        assert_eq!(bump.height(9.0, 14.0, 0.0), 0.0);
    }

    #[test]
    fn heights_stay_normalized() {
        let bump = MovingBump;
        for i in 0..=90 {
            for j in 0..=160 {
                #[allow(clippy::cast_precision_loss)]
                let h = bump.height(i as f32 / 10.0, j as f32 / 10.0, 1.3);
                assert!((0.0..=1.0).contains(&h), "height {h} out of range");
            }
        }
    }

    #[test]
    fn closures_are_surfaces() {
        let plane = |x: f32, z: f32, _t: f32| (x + z) / 10.0;
        assert!((plane.height(2.0, 3.0, 0.0) - 0.5).abs() < f32::EPSILON);
    }
}
